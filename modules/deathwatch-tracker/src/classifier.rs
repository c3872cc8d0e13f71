//! Killer classification.
//!
//! The page never labels killers as players or creatures, but creature
//! names are always written with a leading article ("a dragon", "an orc
//! warrior", "the swamp troll") while character names never are. The
//! article check is purely lexical: a character whose name happens to
//! start with one of those tokens will be misclassified, and that is an
//! accepted limitation of the heuristic.

const CREATURE_ARTICLE_PREFIXES: [&str; 3] = ["a ", "an ", "the "];

/// Whether the killer text denotes a player character rather than a
/// creature or environmental cause.
pub fn is_player_kill(killer_raw: &str) -> bool {
    let killer = killer_raw.trim().to_lowercase();
    !CREATURE_ARTICLE_PREFIXES
        .iter()
        .any(|prefix| killer.starts_with(prefix))
}

/// Split a multi-killer string into individual names. The page joins
/// killers either with a conjunction or with commas; both collapse to the
/// same separator here. Only meaningful for player kills.
pub fn split_killers(killer_raw: &str) -> Vec<String> {
    killer_raw
        .replace(" and ", ", ")
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

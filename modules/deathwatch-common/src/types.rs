/// Killer text used when a death description carries no "by" clause.
pub const UNKNOWN_KILLER: &str = "Unknown";

/// One parsed occurrence of a character's death, produced fresh each poll
/// from the kill log page. Never mutated after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeathEvent {
    /// Timestamp column of the kill log row, kept as page text.
    pub timestamp: String,
    /// Character that died.
    pub victim: String,
    /// Level at death; `"?"` when the description had no level phrase.
    pub level: String,
    /// Killer text as it appeared on the page. May name several killers
    /// joined by a conjunction or commas; splitting happens downstream.
    pub killer_raw: String,
    /// Exact description cell text the fields above were parsed from.
    pub description: String,
}

impl DeathEvent {
    /// Identity of the underlying real-world event, used to suppress
    /// re-announcements. Derived from the timestamp and the raw row text
    /// rather than the parsed fields, so two polls that observe the same
    /// row always agree on the key even if parsing changes.
    pub fn dedup_key(&self) -> String {
        format!("{}{}", self.timestamp, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestamp: &str, description: &str) -> DeathEvent {
        DeathEvent {
            timestamp: timestamp.to_string(),
            victim: "Agnieszka".to_string(),
            level: "50".to_string(),
            killer_raw: "a dragon".to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn dedup_key_depends_only_on_timestamp_and_row_text() {
        let a = event("07.08.2026, 21:33:03", "Agnieszka died at level 50 by a dragon");
        let mut b = a.clone();
        // Parsed fields differing must not change the key.
        b.victim = "someone else".to_string();
        b.level = "?".to_string();
        b.killer_raw = UNKNOWN_KILLER.to_string();
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn dedup_key_distinguishes_rows() {
        let a = event("07.08.2026, 21:33:03", "Agnieszka died at level 50 by a dragon");
        let b = event("07.08.2026, 21:35:11", "Agnieszka died at level 50 by a dragon");
        let c = event("07.08.2026, 21:33:03", "Agnieszka died at level 49 by a dragon");
        assert_ne!(a.dedup_key(), b.dedup_key());
        assert_ne!(a.dedup_key(), c.dedup_key());
    }
}

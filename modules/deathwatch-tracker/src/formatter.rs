use deathwatch_common::DeathEvent;

use crate::classifier::{is_player_kill, split_killers};

/// Renders a new death event into the alert text posted to the channel.
///
/// Pure string work, no I/O. Character names become markdown links to the
/// game's profile page; the URL is wrapped in angle brackets so the chat
/// client renders a named link without expanding a preview card (the sink
/// additionally suppresses embeds at send time).
pub struct MessageFormatter {
    profile_base_url: String,
}

impl MessageFormatter {
    pub fn new(profile_base_url: &str) -> Self {
        Self {
            profile_base_url: profile_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Profile page URL for a character, name escaped into the fixed
    /// query-string template.
    pub fn profile_url(&self, name: &str) -> String {
        format!(
            "{}/?subtopic=characters&name={}",
            self.profile_base_url,
            urlencoding::encode(name)
        )
    }

    fn character_link(&self, name: &str) -> String {
        format!("[**{}**](<{}>)", name, self.profile_url(name))
    }

    /// One alert per event: timestamp marker line, then the death line.
    /// Player killers each get their own profile link, in page order;
    /// creature killers appear verbatim.
    pub fn format_alert(&self, event: &DeathEvent) -> String {
        let mut msg = format!(
            "🕒 {}\n🟢 {} died at level {} by ",
            event.timestamp,
            self.character_link(&event.victim),
            event.level
        );

        if is_player_kill(&event.killer_raw) {
            let links: Vec<String> = split_killers(&event.killer_raw)
                .iter()
                .map(|killer| format!("🔴 {}", self.character_link(killer)))
                .collect();
            msg.push_str(&links.join(", "));
        } else {
            msg.push_str(&event.killer_raw);
        }

        msg
    }
}

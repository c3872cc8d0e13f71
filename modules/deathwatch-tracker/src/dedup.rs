use std::collections::{HashSet, VecDeque};

use deathwatch_common::DeathEvent;

/// Default bound on remembered announcement keys. The page shows far fewer
/// rows than this, so a key is only ever evicted long after its row has
/// scrolled off the page.
pub const SEEN_CAP: usize = 300;

/// Bounded record of already-announced event keys.
///
/// Insertion-ordered with FIFO eviction: when the cap is exceeded the
/// oldest keys are dropped, one at a time, never the whole set.
pub struct SeenSet {
    order: VecDeque<String>,
    keys: HashSet<String>,
    cap: usize,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::with_cap(SEEN_CAP)
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(cap),
            keys: HashSet::with_capacity(cap),
            cap,
        }
    }

    /// Whether this event has not been announced yet.
    pub fn is_new(&self, event: &DeathEvent) -> bool {
        !self.keys.contains(&event.dedup_key())
    }

    /// Record an event as announced, evicting the oldest keys beyond the
    /// cap. Inserting an already-known key changes nothing.
    pub fn mark_seen(&mut self, event: &DeathEvent) {
        let key = event.dedup_key();
        if !self.keys.insert(key.clone()) {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.cap {
            if let Some(oldest) = self.order.pop_front() {
                self.keys.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for SeenSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(n: usize) -> DeathEvent {
        DeathEvent {
            timestamp: format!("07.08.2026, 21:{:02}:00", n % 60),
            victim: "Agnieszka".to_string(),
            level: "50".to_string(),
            killer_raw: "a dragon".to_string(),
            description: format!("row number {n}"),
        }
    }

    #[test]
    fn new_until_marked() {
        let mut seen = SeenSet::new();
        let e = event(1);
        assert!(seen.is_new(&e));
        seen.mark_seen(&e);
        assert!(!seen.is_new(&e));
    }

    #[test]
    fn marking_twice_does_not_grow() {
        let mut seen = SeenSet::new();
        let e = event(1);
        seen.mark_seen(&e);
        seen.mark_seen(&e);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut seen = SeenSet::with_cap(3);
        for n in 0..4 {
            seen.mark_seen(&event(n));
        }
        assert_eq!(seen.len(), 3);
        // The oldest key fell out; the newest three remain.
        assert!(seen.is_new(&event(0)));
        assert!(!seen.is_new(&event(1)));
        assert!(!seen.is_new(&event(3)));
    }

    #[test]
    fn size_never_exceeds_default_cap() {
        let mut seen = SeenSet::new();
        for n in 0..(SEEN_CAP + 50) {
            seen.mark_seen(&event(n));
            assert!(seen.len() <= SEEN_CAP);
        }
        assert_eq!(seen.len(), SEEN_CAP);
    }
}

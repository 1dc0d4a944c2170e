use std::collections::{HashMap, VecDeque};

pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 500;

/// Maps a notification id to the page it opens when clicked.
///
/// Bounded FIFO: once full, recording a new id forgets the oldest one.
#[derive(Debug)]
pub struct NotificationTracker {
    targets: HashMap<String, String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for NotificationTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_NOTIFICATION_CAPACITY)
    }
}

impl NotificationTracker {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            targets: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, id: String, url: String) {
        if let Some(existing) = self.targets.get_mut(&id) {
            *existing = url;
            return;
        }
        self.order.push_back(id.clone());
        self.targets.insert(id, url);
        self.evict();
    }

    /// Shrinking drops the oldest entries right away.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.evict();
    }

    fn evict(&mut self) {
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.targets.remove(&oldest);
            }
        }
    }

    pub fn resolve(&self, id: &str) -> Option<String> {
        self.targets.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_recorded_target() {
        let mut tracker = NotificationTracker::default();
        tracker.record("n1".into(), "https://www.twitch.tv/a".into());
        assert_eq!(
            tracker.resolve("n1").as_deref(),
            Some("https://www.twitch.tv/a")
        );
        assert!(tracker.resolve("n2").is_none());
    }

    #[test]
    fn oldest_entry_is_evicted_when_full() {
        let mut tracker = NotificationTracker::with_capacity(2);
        tracker.record("n1".into(), "u1".into());
        tracker.record("n2".into(), "u2".into());
        tracker.record("n3".into(), "u3".into());

        assert_eq!(tracker.len(), 2);
        assert!(tracker.resolve("n1").is_none());
        assert_eq!(tracker.resolve("n3").as_deref(), Some("u3"));
    }

    #[test]
    fn shrinking_capacity_evicts_oldest() {
        let mut tracker = NotificationTracker::with_capacity(3);
        tracker.record("n1".into(), "u1".into());
        tracker.record("n2".into(), "u2".into());
        tracker.record("n3".into(), "u3".into());

        tracker.set_capacity(1);

        assert_eq!(tracker.len(), 1);
        assert!(tracker.resolve("n2").is_none());
        assert_eq!(tracker.resolve("n3").as_deref(), Some("u3"));
    }

    #[test]
    fn re_recording_updates_without_growing() {
        let mut tracker = NotificationTracker::with_capacity(2);
        tracker.record("n1".into(), "old".into());
        tracker.record("n1".into(), "new".into());
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.resolve("n1").as_deref(), Some("new"));
    }
}

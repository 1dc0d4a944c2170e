use std::collections::{HashSet, VecDeque};

/// Most recent live-session ids kept between cycles.
pub const SESSION_LOG_CAPACITY: usize = 10_000;

/// Ids of live sessions that were already surfaced, in discovery order.
///
/// Inserting never evicts; [`SessionLog::trim`] drops the oldest entries
/// once a cycle is done so that ids discovered during the cycle stay
/// visible until then.
#[derive(Debug)]
pub struct SessionLog {
    ids: HashSet<String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::with_capacity(SESSION_LOG_CAPACITY)
    }
}

impl SessionLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: HashSet::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns false when `id` was already present.
    pub fn insert(&mut self, id: String) -> bool {
        if !self.ids.insert(id.clone()) {
            return false;
        }
        self.order.push_back(id);
        true
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, ids: I) {
        for id in ids {
            self.insert(id);
        }
    }

    /// Drop the oldest ids until at most `capacity` remain.
    pub fn trim(&mut self) {
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
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
    fn duplicate_insert_is_ignored() {
        let mut log = SessionLog::default();
        assert!(log.insert("a".into()));
        assert!(!log.insert("a".into()));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn trim_drops_oldest_first() {
        let mut log = SessionLog::with_capacity(2);
        log.extend(["a", "b", "c"].map(String::from));
        assert_eq!(log.len(), 3);

        log.trim();
        assert_eq!(log.len(), 2);
        assert!(!log.contains("a"));
        assert!(log.contains("b"));
        assert!(log.contains("c"));
    }

    #[test]
    fn default_capacity_holds_ten_thousand() {
        let mut log = SessionLog::default();
        log.extend((0..10_050).map(|i| i.to_string()));
        log.trim();
        assert_eq!(log.len(), SESSION_LOG_CAPACITY);
        assert!(!log.contains("49"));
        assert!(log.contains("50"));
        assert!(log.contains("10049"));
    }
}

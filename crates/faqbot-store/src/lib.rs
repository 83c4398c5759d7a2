//! Faqbot Conversation Storage
//!
//! Implements the `ConversationStore` trait with an in-process log.
//!
//! The log is ephemeral and advisory: it lives for the process lifetime, is
//! shared by every caller, and is never read back to make routing decisions.
//!
//! # Examples
//!
//! ```
//! use faqbot_domain::ConversationTurn;
//! use faqbot_domain::traits::ConversationStore;
//! use faqbot_store::InMemoryConversationStore;
//!
//! let store = InMemoryConversationStore::new();
//! store.append(ConversationTurn::user("where is the SLC?")).unwrap();
//! assert_eq!(store.len().unwrap(), 1);
//! ```

#![warn(missing_docs)]

use faqbot_domain::traits::ConversationStore;
use faqbot_domain::ConversationTurn;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A writer panicked while holding the log lock
    #[error("Conversation log lock poisoned")]
    Poisoned,
}

/// Mutex-guarded conversation log
///
/// Unbounded by default. With a capacity it behaves as a ring buffer and
/// evicts the oldest turn on overflow.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    turns: Mutex<VecDeque<ConversationTurn>>,
    capacity: Option<usize>,
}

impl InMemoryConversationStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store retaining at most `capacity` turns
    pub fn bounded(capacity: usize) -> Self {
        Self {
            turns: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: Some(capacity),
        }
    }

    /// Maximum retained turns, if bounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn lock(&self) -> Result<MutexGuard<'_, VecDeque<ConversationTurn>>, StoreError> {
        self.turns.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ConversationStore for InMemoryConversationStore {
    type Error = StoreError;

    fn append(&self, turn: ConversationTurn) -> Result<(), Self::Error> {
        let mut turns = self.lock()?;
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return Ok(());
            }
            while turns.len() >= capacity {
                turns.pop_front();
            }
        }
        turns.push_back(turn);
        Ok(())
    }

    fn recent(&self, n: usize) -> Result<Vec<ConversationTurn>, Self::Error> {
        let turns = self.lock()?;
        let skip = turns.len().saturating_sub(n);
        Ok(turns.iter().skip(skip).cloned().collect())
    }

    fn all(&self) -> Result<Vec<ConversationTurn>, Self::Error> {
        Ok(self.lock()?.iter().cloned().collect())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        self.lock()?.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, Self::Error> {
        Ok(self.lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn contents(turns: &[ConversationTurn]) -> Vec<&str> {
        turns.iter().map(|t| t.content.as_str()).collect()
    }

    #[test]
    fn test_append_and_recent() {
        let store = InMemoryConversationStore::new();
        for i in 0..5 {
            store.append(ConversationTurn::user(format!("m{}", i))).unwrap();
        }
        assert_eq!(contents(&store.recent(2).unwrap()), ["m3", "m4"]);
        assert_eq!(store.recent(10).unwrap().len(), 5);
        assert!(store.recent(0).unwrap().is_empty());
        assert_eq!(contents(&store.all().unwrap()), ["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn test_clear_then_all_is_empty() {
        let store = InMemoryConversationStore::new();
        store.append(ConversationTurn::user("hi")).unwrap();
        store.append(ConversationTurn::bot("hello")).unwrap();
        store.clear().unwrap();
        assert!(store.all().unwrap().is_empty());
        assert!(store.is_empty().unwrap());

        // Clearing twice is harmless
        store.clear().unwrap();
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn test_bounded_evicts_oldest() {
        let store = InMemoryConversationStore::bounded(3);
        for i in 0..5 {
            store.append(ConversationTurn::user(format!("m{}", i))).unwrap();
        }
        assert_eq!(store.capacity(), Some(3));
        assert_eq!(contents(&store.all().unwrap()), ["m2", "m3", "m4"]);
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let store = InMemoryConversationStore::bounded(0);
        store.append(ConversationTurn::user("dropped")).unwrap();
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        store
                            .append(ConversationTurn::user(format!("{}-{}", t, i)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len().unwrap(), 400);

        // Each writer's own turns keep their relative order
        let all = store.all().unwrap();
        let mine: Vec<_> = all.iter().filter(|t| t.content.starts_with("3-")).collect();
        for (i, turn) in mine.iter().enumerate() {
            assert_eq!(turn.content, format!("3-{}", i));
        }
    }

    #[test]
    fn test_poisoned_lock_is_error() {
        let store = Arc::new(InMemoryConversationStore::new());
        let poisoner = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _guard = poisoner.turns.lock().unwrap();
            panic!("poison the log");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::Poisoned)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: recent(n) is always the tail of all()
        #[test]
        fn test_recent_is_suffix(count in 0usize..40, n in 0usize..50, cap in proptest::option::of(1usize..20)) {
            let store = match cap {
                Some(cap) => InMemoryConversationStore::bounded(cap),
                None => InMemoryConversationStore::new(),
            };
            for i in 0..count {
                store.append(ConversationTurn::user(i.to_string())).unwrap();
            }
            let all = store.all().unwrap();
            let recent = store.recent(n).unwrap();
            prop_assert_eq!(recent.len(), n.min(all.len()));
            prop_assert_eq!(&all[all.len() - recent.len()..], &recent[..]);
            if let Some(cap) = cap {
                prop_assert!(all.len() <= cap);
            }
        }
    }
}

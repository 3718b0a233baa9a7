//! Storage Contract
//!
//! The core performs no I/O of its own: reading messages and persisting
//! results is delegated to this collaborator. `MemoryStore` is the
//! reference implementation used by tests; the application supplies the
//! real backend.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::feedback::{FeedbackRecord, MisclassificationLogEntry};
use super::message::Message;

// ============================================================================
// STORAGE ERROR
// ============================================================================

/// Failure in the storage collaborator. Retryable by design: per-message
/// processing is idempotent at a given classifier version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No message with this id
    NotFound(u64),
    /// Backend-specific failure, stringly surfaced
    Backend(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(id) => write!(f, "message {} not found", id),
            StorageError::Backend(msg) => write!(f, "storage backend error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

// ============================================================================
// STORE CONTRACT
// ============================================================================

/// Logical store contract, independent of any query language.
pub trait MessageStore: Send + Sync {
    /// Messages whose stored version is behind `version` or whose
    /// verdicts are not settled, newest first, at most `limit`.
    fn load_pending(&self, version: u32, limit: usize) -> Result<Vec<Message>, StorageError>;

    fn get(&self, id: u64) -> Result<Option<Message>, StorageError>;

    /// Atomic upsert of one message's full row, verdicts and version
    /// stamp included.
    fn save(&self, message: &Message) -> Result<(), StorageError>;

    fn mark_reviewed(&self, id: u64) -> Result<(), StorageError>;

    fn append_feedback(&self, record: &FeedbackRecord) -> Result<(), StorageError>;

    fn append_misclassification(
        &self,
        entry: &MisclassificationLogEntry,
    ) -> Result<(), StorageError>;

    /// Bulk clear; the only way misclassification entries go away
    fn clear_misclassifications(&self) -> Result<(), StorageError>;
}

// ============================================================================
// IN-MEMORY REFERENCE STORE
// ============================================================================

/// Thread-safe in-memory store for tests and embedding without a backend.
#[derive(Default)]
pub struct MemoryStore {
    messages: RwLock<BTreeMap<u64, Message>>,
    feedback: RwLock<Vec<FeedbackRecord>>,
    misclassifications: RwLock<Vec<MisclassificationLogEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, message: Message) {
        self.messages.write().insert(message.id, message);
    }

    pub fn message_count(&self) -> usize {
        self.messages.read().len()
    }

    pub fn otp_count(&self) -> usize {
        self.messages
            .read()
            .values()
            .filter(|m| m.otp == super::message::Verdict::Positive)
            .count()
    }

    pub fn phishing_count(&self) -> usize {
        self.messages
            .read()
            .values()
            .filter(|m| m.phishing == super::message::Verdict::Positive)
            .count()
    }

    /// Messages sitting in the review queue at `version`
    pub fn needs_review_count(&self, version: u32) -> usize {
        self.messages
            .read()
            .values()
            .filter(|m| super::review::needs_review(m, version))
            .count()
    }

    /// General correspondence: neither OTP nor phishing positive
    pub fn general_count(&self) -> usize {
        self.messages
            .read()
            .values()
            .filter(|m| {
                m.otp != super::message::Verdict::Positive
                    && m.phishing != super::message::Verdict::Positive
            })
            .count()
    }

    /// The review queue itself, newest first
    pub fn review_queue(&self, version: u32) -> Vec<Message> {
        let mut queue: Vec<Message> = self
            .messages
            .read()
            .values()
            .filter(|m| super::review::needs_review(m, version))
            .cloned()
            .collect();
        queue.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        queue
    }

    pub fn feedback_records(&self) -> Vec<FeedbackRecord> {
        self.feedback.read().clone()
    }

    pub fn misclassification_entries(&self) -> Vec<MisclassificationLogEntry> {
        self.misclassifications.read().clone()
    }
}

impl MessageStore for MemoryStore {
    fn load_pending(&self, version: u32, limit: usize) -> Result<Vec<Message>, StorageError> {
        let mut pending: Vec<Message> = self
            .messages
            .read()
            .values()
            .filter(|m| m.version < version || !m.is_settled())
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        pending.truncate(limit);
        Ok(pending)
    }

    fn get(&self, id: u64) -> Result<Option<Message>, StorageError> {
        Ok(self.messages.read().get(&id).cloned())
    }

    fn save(&self, message: &Message) -> Result<(), StorageError> {
        self.messages.write().insert(message.id, message.clone());
        Ok(())
    }

    fn mark_reviewed(&self, id: u64) -> Result<(), StorageError> {
        match self.messages.write().get_mut(&id) {
            Some(message) => {
                message.reviewed = true;
                Ok(())
            }
            None => Err(StorageError::NotFound(id)),
        }
    }

    fn append_feedback(&self, record: &FeedbackRecord) -> Result<(), StorageError> {
        self.feedback.write().push(record.clone());
        Ok(())
    }

    fn append_misclassification(
        &self,
        entry: &MisclassificationLogEntry,
    ) -> Result<(), StorageError> {
        self.misclassifications.write().push(entry.clone());
        Ok(())
    }

    fn clear_misclassifications(&self) -> Result<(), StorageError> {
        self.misclassifications.write().clear();
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::message::Verdict;
    use super::*;
    use chrono::{Duration, Utc};

    fn message(id: u64, version: u32, settled: bool) -> Message {
        let mut m = Message::new(id, "S", "body 1234", Utc::now() + Duration::seconds(id as i64), 0);
        m.version = version;
        if settled {
            m.otp = Verdict::Negative;
            m.phishing = Verdict::Negative;
            m.phish_score = Some(0.0);
        }
        m
    }

    #[test]
    fn test_load_pending_filters_and_orders() {
        let store = MemoryStore::new();
        store.insert(message(1, 1, true)); // settled at current: not pending
        store.insert(message(2, 0, false)); // never classified: pending
        store.insert(message(3, 1, false)); // unsettled at current: pending
        store.insert(message(4, 2, true)); // ahead of current: not pending

        let pending = store.load_pending(1, 10).unwrap();
        let ids: Vec<u64> = pending.iter().map(|m| m.id).collect();
        // Newest first (higher id = later received_at in this fixture)
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_load_pending_respects_limit() {
        let store = MemoryStore::new();
        for id in 0..10 {
            store.insert(message(id, 0, false));
        }
        assert_eq!(store.load_pending(1, 3).unwrap().len(), 3);
    }

    #[test]
    fn test_save_is_upsert() {
        let store = MemoryStore::new();
        let mut m = message(1, 0, false);
        store.save(&m).unwrap();
        m.version = 3;
        store.save(&m).unwrap();
        assert_eq!(store.message_count(), 1);
        assert_eq!(store.get(1).unwrap().unwrap().version, 3);
    }

    #[test]
    fn test_mark_reviewed() {
        let store = MemoryStore::new();
        store.insert(message(1, 1, true));
        store.mark_reviewed(1).unwrap();
        assert!(store.get(1).unwrap().unwrap().reviewed);
        assert_eq!(store.mark_reviewed(99), Err(StorageError::NotFound(99)));
    }

    #[test]
    fn test_misclassification_clear_is_bulk_only() {
        let store = MemoryStore::new();
        let m = message(1, 1, true);
        let (_, entry) = super::super::feedback::record_feedback(
            &m,
            super::super::feedback::Correction::phishing(true),
        );
        store.append_misclassification(&entry.unwrap()).unwrap();
        assert_eq!(store.misclassification_entries().len(), 1);
        store.clear_misclassifications().unwrap();
        assert!(store.misclassification_entries().is_empty());
    }
}

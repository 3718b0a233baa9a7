//! Review Queue - state machine over classification completeness
//!
//! State is derived, never stored: it falls out of the version stamp, the
//! verdicts, and the reviewed flag. Only the reviewed flag is written,
//! and only on explicit human action.

use serde::{Deserialize, Serialize};

use super::message::Message;
use super::storage::{MessageStore, StorageError};

/// Where a message stands relative to the current classifier version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewState {
    /// Version stamp absent or stale
    Unclassified,
    /// Current version, but a verdict is unknown or the score is missing
    PendingReview,
    /// Current version, both verdicts settled, awaiting no one
    Settled,
    /// Explicit human confirmation on top of settled verdicts
    Reviewed,
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewState::Unclassified => "unclassified",
            ReviewState::PendingReview => "pending-review",
            ReviewState::Settled => "settled",
            ReviewState::Reviewed => "reviewed",
        }
    }
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the review state of a message at `current_version`
pub fn state_of(message: &Message, current_version: u32) -> ReviewState {
    if message.version == 0 || message.version < current_version {
        return ReviewState::Unclassified;
    }
    if !message.otp.is_settled() || !message.phishing.is_settled() || message.phish_score.is_none()
    {
        return ReviewState::PendingReview;
    }
    if message.reviewed {
        ReviewState::Reviewed
    } else {
        ReviewState::Settled
    }
}

/// Is the message waiting on a human?
pub fn needs_review(message: &Message, current_version: u32) -> bool {
    state_of(message, current_version) == ReviewState::PendingReview
}

/// Record human confirmation. The only state transition this module
/// writes; everything else is a side effect of classification.
pub fn mark_reviewed(store: &dyn MessageStore, id: u64) -> Result<(), StorageError> {
    store.mark_reviewed(id)?;
    log::info!("message {} marked reviewed", id);
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::message::Verdict;
    use super::super::storage::MemoryStore;
    use super::*;
    use chrono::Utc;

    fn message_at(version: u32) -> Message {
        let mut m = Message::new(1, "S", "body", Utc::now(), 0);
        m.version = version;
        m
    }

    #[test]
    fn test_version_zero_is_unclassified() {
        assert_eq!(state_of(&message_at(0), 1), ReviewState::Unclassified);
    }

    #[test]
    fn test_stale_version_is_unclassified_even_if_settled() {
        let mut m = message_at(1);
        m.otp = Verdict::Negative;
        m.phishing = Verdict::Negative;
        m.phish_score = Some(0.0);
        m.reviewed = true;
        assert_eq!(state_of(&m, 2), ReviewState::Unclassified);
    }

    #[test]
    fn test_unknown_verdict_is_pending_review() {
        let mut m = message_at(1);
        m.otp = Verdict::Unknown;
        m.phishing = Verdict::Negative;
        m.phish_score = Some(0.0);
        assert_eq!(state_of(&m, 1), ReviewState::PendingReview);
    }

    #[test]
    fn test_missing_score_is_pending_review() {
        // Extraction failure leaves settled-looking nothing: both unknown,
        // no score
        let m = message_at(1);
        assert_eq!(state_of(&m, 1), ReviewState::PendingReview);
    }

    #[test]
    fn test_settled_then_reviewed() {
        let mut m = message_at(1);
        m.otp = Verdict::Positive;
        m.phishing = Verdict::Negative;
        m.phish_score = Some(0.05);
        assert_eq!(state_of(&m, 1), ReviewState::Settled);
        m.reviewed = true;
        assert_eq!(state_of(&m, 1), ReviewState::Reviewed);
    }

    #[test]
    fn test_mark_reviewed_via_store() {
        let store = MemoryStore::new();
        let mut m = message_at(1);
        m.otp = Verdict::Negative;
        m.phishing = Verdict::Negative;
        m.phish_score = Some(0.0);
        store.insert(m);
        mark_reviewed(&store, 1).unwrap();
        let m = store.get(1).unwrap().unwrap();
        assert_eq!(state_of(&m, 1), ReviewState::Reviewed);
    }
}

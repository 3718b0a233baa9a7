//! Feedback Recorder
//!
//! A correction pairs the user's labels with what the pipeline believed
//! at that moment. The snapshot is frozen so later re-classification
//! cannot rewrite history under the correction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::message::{Message, Verdict};
use crate::logic::otp::OtpIntent;
use crate::logic::storage::{MessageStore, StorageError};

use super::misclassification::{diverges, MisclassificationLogEntry};

// ============================================================================
// SNAPSHOT
// ============================================================================

/// The verdicts as stored at correction time. Immutable once taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerdictSnapshot {
    pub otp: Verdict,
    pub otp_intent: Option<OtpIntent>,
    pub phishing: Verdict,
    pub phish_score: Option<f32>,
}

impl VerdictSnapshot {
    pub fn of(message: &Message) -> Self {
        Self {
            otp: message.otp,
            otp_intent: message.otp_intent,
            phishing: message.phishing,
            phish_score: message.phish_score,
        }
    }
}

// ============================================================================
// CORRECTION
// ============================================================================

/// The user's corrected labels. Unset fields mean "no opinion".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub is_otp: Option<bool>,
    pub otp_intent: Option<OtpIntent>,
    pub is_phishing: Option<bool>,
    pub note: Option<String>,
}

impl Correction {
    pub fn otp(value: bool) -> Self {
        Self { is_otp: Some(value), ..Self::default() }
    }

    pub fn phishing(value: bool) -> Self {
        Self { is_phishing: Some(value), ..Self::default() }
    }

    pub fn with_intent(mut self, intent: OtpIntent) -> Self {
        self.otp_intent = Some(intent);
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

// ============================================================================
// FEEDBACK RECORD
// ============================================================================

/// One explicit user correction. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub message_id: u64,
    pub snapshot: VerdictSnapshot,
    pub correction: Correction,
    pub created_at: DateTime<Utc>,
}

/// Capture a correction against the message's current verdicts.
///
/// Returns the record plus, when the correction disagrees with the
/// snapshot on OTP verdict, OTP intent, or phishing verdict, the
/// misclassification entry to append. The message itself is untouched.
pub fn record_feedback(
    message: &Message,
    correction: Correction,
) -> (FeedbackRecord, Option<MisclassificationLogEntry>) {
    let record = FeedbackRecord {
        id: Uuid::new_v4(),
        message_id: message.id,
        snapshot: VerdictSnapshot::of(message),
        correction,
        created_at: Utc::now(),
    };
    let entry = if diverges(&record.snapshot, &record.correction) {
        Some(MisclassificationLogEntry::from_correction(message, &record))
    } else {
        None
    };
    (record, entry)
}

/// Capture a correction and persist both the record and, on divergence,
/// the misclassification entry.
pub fn record_and_store(
    store: &dyn MessageStore,
    message: &Message,
    correction: Correction,
) -> Result<FeedbackRecord, StorageError> {
    let (record, entry) = record_feedback(message, correction);
    store.append_feedback(&record)?;
    if let Some(entry) = entry {
        log::info!(
            "correction for message {} disagrees with stored verdicts; logging misclassification",
            message.id
        );
        store.append_misclassification(&entry)?;
    }
    Ok(record)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn classified_message() -> Message {
        let mut m = Message::new(9, "AX-NOTIFY", "Your OTP is 482913", Utc::now(), 0);
        m.otp = Verdict::Positive;
        m.otp_intent = Some(OtpIntent::Login);
        m.phishing = Verdict::Negative;
        m.phish_score = Some(0.0);
        m.version = 1;
        m
    }

    #[test]
    fn test_agreeing_correction_logs_nothing() {
        let message = classified_message();
        let (record, entry) = record_feedback(&message, Correction::otp(true));
        assert!(entry.is_none());
        assert_eq!(record.message_id, message.id);
        assert_eq!(record.snapshot.otp, Verdict::Positive);
    }

    #[test]
    fn test_disagreeing_correction_logs_misclassification() {
        let message = classified_message();
        let (record, entry) = record_feedback(&message, Correction::phishing(true));
        let entry = entry.expect("phishing disagreement must be logged");
        assert_eq!(entry.message_id, message.id);
        assert_eq!(entry.predicted_phishing, Verdict::Negative);
        assert_eq!(entry.sender, message.sender);
        assert_eq!(record.correction.is_phishing, Some(true));
    }

    #[test]
    fn test_intent_disagreement_is_divergence() {
        let message = classified_message();
        let correction = Correction::otp(true).with_intent(OtpIntent::DeliveryCode);
        let (_, entry) = record_feedback(&message, correction);
        assert!(entry.is_some());
    }

    #[test]
    fn test_recording_never_mutates_the_message() {
        let message = classified_message();
        let before = message.clone();
        let _ = record_feedback(&message, Correction::phishing(true).with_note("looks fine"));
        assert_eq!(message, before);
    }

    #[test]
    fn test_snapshot_freezes_current_state() {
        let mut message = classified_message();
        let (record, _) = record_feedback(&message, Correction::otp(false));
        // Later pipeline changes do not reach into the record
        message.otp = Verdict::Negative;
        assert_eq!(record.snapshot.otp, Verdict::Positive);
    }
}

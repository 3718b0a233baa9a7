//! Misclassification Log
//!
//! Append-only audit of predictions the user disagreed with; raw material
//! for the next (external) training run. Entries are immutable and only
//! removable in bulk via the store's clear operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::message::{Message, Verdict};
use crate::logic::otp::OtpIntent;

use super::recorder::{Correction, FeedbackRecord, VerdictSnapshot};

/// One logged divergence between prediction and correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MisclassificationLogEntry {
    pub id: Uuid,
    pub message_id: u64,
    pub sender: String,
    pub body: String,
    pub predicted_otp: Verdict,
    pub predicted_intent: Option<OtpIntent>,
    pub predicted_phishing: Verdict,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl MisclassificationLogEntry {
    /// Build the entry for a diverging correction. The predicted labels
    /// come from the record's frozen snapshot, not the live message.
    pub fn from_correction(message: &Message, record: &FeedbackRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            message_id: message.id,
            sender: message.sender.clone(),
            body: message.body.clone(),
            predicted_otp: record.snapshot.otp,
            predicted_intent: record.snapshot.otp_intent,
            predicted_phishing: record.snapshot.phishing,
            created_at: Utc::now(),
            note: record.correction.note.clone(),
        }
    }
}

/// Does the correction disagree with the snapshot on OTP verdict, OTP
/// intent, or phishing verdict? The phishing score is explanatory and
/// never compared.
pub fn diverges(snapshot: &VerdictSnapshot, correction: &Correction) -> bool {
    if let Some(corrected) = correction.is_otp {
        if snapshot.otp != Verdict::from_bool(corrected) {
            return true;
        }
    }
    if let Some(corrected_intent) = correction.otp_intent {
        if snapshot.otp_intent != Some(corrected_intent) {
            return true;
        }
    }
    if let Some(corrected) = correction.is_phishing {
        if snapshot.phishing != Verdict::from_bool(corrected) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> VerdictSnapshot {
        VerdictSnapshot {
            otp: Verdict::Positive,
            otp_intent: Some(OtpIntent::Login),
            phishing: Verdict::Negative,
            phish_score: Some(0.1),
        }
    }

    #[test]
    fn test_empty_correction_never_diverges() {
        assert!(!diverges(&snapshot(), &Correction::default()));
    }

    #[test]
    fn test_each_axis_diverges_independently() {
        assert!(diverges(&snapshot(), &Correction::otp(false)));
        assert!(diverges(&snapshot(), &Correction::phishing(true)));
        assert!(diverges(
            &snapshot(),
            &Correction::default().with_intent(OtpIntent::DeliveryCode)
        ));
    }

    #[test]
    fn test_agreement_on_every_axis() {
        let correction = Correction {
            is_otp: Some(true),
            otp_intent: Some(OtpIntent::Login),
            is_phishing: Some(false),
            note: None,
        };
        assert!(!diverges(&snapshot(), &correction));
    }

    #[test]
    fn test_unknown_prediction_corrected_is_divergence() {
        // Correcting an unknown verdict is exactly the signal retraining
        // wants
        let s = VerdictSnapshot {
            otp: Verdict::Unknown,
            otp_intent: None,
            phishing: Verdict::Unknown,
            phish_score: Some(0.4),
        };
        assert!(diverges(&s, &Correction::otp(true)));
        assert!(diverges(&s, &Correction::phishing(false)));
    }
}

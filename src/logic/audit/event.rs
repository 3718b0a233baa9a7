//! Pipeline Event Types
//!
//! Immutable, timestamped records for the audit trail. One JSON object
//! per line in the log files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::feedback::{FeedbackRecord, MisclassificationLogEntry};
use crate::logic::message::Message;
use crate::logic::pipeline::SweepReport;

/// Categories of pipeline events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineEventKind {
    /// Both classifiers ran and results were committed
    MessageClassified,
    /// The extractor refused the input; message routed to review
    ExtractionFailed,
    /// A user correction was captured
    FeedbackRecorded,
    /// A correction disagreed with the stored verdicts
    MisclassificationLogged,
    /// A batch sweep completed
    SweepFinished,
}

impl PipelineEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineEventKind::MessageClassified => "message_classified",
            PipelineEventKind::ExtractionFailed => "extraction_failed",
            PipelineEventKind::FeedbackRecorded => "feedback_recorded",
            PipelineEventKind::MisclassificationLogged => "misclassification_logged",
            PipelineEventKind::SweepFinished => "sweep_finished",
        }
    }
}

/// One audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub kind: PipelineEventKind,
    pub message_id: Option<u64>,
    pub classifier_version: Option<u32>,
    pub detail: serde_json::Value,
}

impl PipelineEvent {
    pub fn new(kind: PipelineEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            kind,
            message_id: None,
            classifier_version: None,
            detail: serde_json::Value::Null,
        }
    }

    pub fn with_message(mut self, message_id: u64) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.classifier_version = Some(version);
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = detail;
        self
    }

    pub fn message_classified(message: &Message) -> Self {
        Self::new(PipelineEventKind::MessageClassified)
            .with_message(message.id)
            .with_version(message.version)
            .with_detail(serde_json::json!({
                "otp": message.otp.as_str(),
                "otp_intent": message.otp_intent.map(|i| i.tag()),
                "phishing": message.phishing.as_str(),
                "phish_score": message.phish_score,
            }))
    }

    pub fn extraction_failed(message_id: u64, version: u32) -> Self {
        Self::new(PipelineEventKind::ExtractionFailed)
            .with_message(message_id)
            .with_version(version)
    }

    pub fn feedback_recorded(record: &FeedbackRecord) -> Self {
        Self::new(PipelineEventKind::FeedbackRecorded)
            .with_message(record.message_id)
            .with_detail(serde_json::json!({ "feedback_id": record.id }))
    }

    pub fn misclassification_logged(entry: &MisclassificationLogEntry) -> Self {
        Self::new(PipelineEventKind::MisclassificationLogged)
            .with_message(entry.message_id)
            .with_detail(serde_json::json!({
                "entry_id": entry.id,
                "predicted_otp": entry.predicted_otp.as_str(),
                "predicted_phishing": entry.predicted_phishing.as_str(),
            }))
    }

    pub fn sweep_finished(version: u32, report: &SweepReport) -> Self {
        Self::new(PipelineEventKind::SweepFinished)
            .with_version(version)
            .with_detail(serde_json::to_value(report).unwrap_or(serde_json::Value::Null))
    }

    /// One line of JSONL
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::message::Verdict;
    use chrono::Utc;

    #[test]
    fn test_event_round_trips_through_jsonl() {
        let mut message = Message::new(11, "S", "body 1234", Utc::now(), 0);
        message.otp = Verdict::Negative;
        message.phishing = Verdict::Negative;
        message.phish_score = Some(0.0);
        message.version = 2;

        let event = PipelineEvent::message_classified(&message);
        let line = event.to_jsonl();
        let parsed: PipelineEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(parsed.message_id, Some(11));
        assert_eq!(parsed.classifier_version, Some(2));
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(PipelineEventKind::SweepFinished.as_str(), "sweep_finished");
        assert_eq!(PipelineEventKind::ExtractionFailed.as_str(), "extraction_failed");
    }
}

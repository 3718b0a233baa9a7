//! Message & Verdict Types
//!
//! Core data structures shared by both classifiers and the pipeline.
//! No classification logic here - only data and derived display state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::features::FeatureVector;
use super::otp::OtpIntent;

// ============================================================================
// VERDICT (TRI-STATE)
// ============================================================================

/// Tri-state classifier verdict for one decision axis.
///
/// Replaces the nullable booleans of the legacy row shape: `Unknown` is an
/// explicit state, not a missing value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Not yet decided, or in the ambiguous band between thresholds
    #[default]
    Unknown,
    /// Decided: not a member of the class
    Negative,
    /// Decided: member of the class
    Positive,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Unknown => "unknown",
            Verdict::Negative => "negative",
            Verdict::Positive => "positive",
        }
    }

    /// A verdict is settled once it is no longer `Unknown`
    pub fn is_settled(&self) -> bool {
        !matches!(self, Verdict::Unknown)
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            Verdict::Positive
        } else {
            Verdict::Negative
        }
    }

    /// Boolean view; `None` for `Unknown`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Verdict::Unknown => None,
            Verdict::Negative => Some(false),
            Verdict::Positive => Some(true),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// REASON CODES
// ============================================================================

/// Stable tag identifying which signal contributed to a verdict.
///
/// Used for user-facing explanation chips; the tag strings are part of the
/// stored row format and must not change once shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonCode {
    // OTP signals
    NumericCode,
    CodeAtStart,
    OtpKeyword,
    OtpPhrase,
    SecurityWarning,
    ValidityWindow,
    OtpSender,
    // Phishing signals
    SuspiciousLink,
    UrlShortener,
    UrgencyLanguage,
    RewardBait,
    CredentialLure,
    SenderSpoofing,
    ExcessivePunctuation,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::NumericCode => "numeric-code",
            ReasonCode::CodeAtStart => "code-at-start",
            ReasonCode::OtpKeyword => "otp-keyword",
            ReasonCode::OtpPhrase => "otp-phrase",
            ReasonCode::SecurityWarning => "security-warning",
            ReasonCode::ValidityWindow => "validity-window",
            ReasonCode::OtpSender => "otp-sender",
            ReasonCode::SuspiciousLink => "suspicious-link",
            ReasonCode::UrlShortener => "url-shortener",
            ReasonCode::UrgencyLanguage => "urgency-language",
            ReasonCode::RewardBait => "reward-bait",
            ReasonCode::CredentialLure => "credential-lure",
            ReasonCode::SenderSpoofing => "sender-spoofing",
            ReasonCode::ExcessivePunctuation => "excessive-punctuation",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CLASSIFICATION VERDICT
// ============================================================================

/// The paired output of one classifier run: tri-state verdict, optional
/// continuous score, reasons ordered by descending contribution.
///
/// Immutable once produced; a re-run replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    pub verdict: Verdict,
    pub score: Option<f32>,
    pub reasons: Vec<ReasonCode>,
}

impl ClassificationVerdict {
    /// The degraded result used when a classifier could not run at all
    pub fn unknown() -> Self {
        Self::default()
    }
}

// ============================================================================
// DISPLAY BANDINGS
// ============================================================================

/// Risk band shown on a message row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Phishing,
    Suspicious,
    Safe,
}

/// How carefully the user should treat an OTP code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sensitivity {
    /// Financial-grade code, never to be shared with anyone
    DoNotShare,
    /// Delivery code, meant to be read to the courier only
    CourierOnly,
    /// Informational code
    Info,
    /// Not an OTP message
    None,
}

/// Risk-band cut points (match the shipped display thresholds)
pub const RISK_SUSPICIOUS_MIN: f32 = 0.3;
pub const RISK_PHISHING_MIN: f32 = 0.6;

// ============================================================================
// MESSAGE
// ============================================================================

/// The unit of classification.
///
/// Transport metadata (read/seen/type/status) is owned by the messaging
/// transport and deliberately absent here; the store keeps those columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub sender: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
    /// Conversation identity; inert metadata, never consulted by classifiers
    pub thread_id: u64,
    pub language: Option<String>,
    /// Present only after extraction has run; recomputed whole, never patched
    pub features: Option<FeatureVector>,
    pub otp: Verdict,
    /// Present only when `otp` is `Positive`
    pub otp_intent: Option<OtpIntent>,
    pub phishing: Verdict,
    /// Present iff the phishing classifier ran at the stamped version
    pub phish_score: Option<f32>,
    /// Phishing explanation, ordered by descending contribution
    pub reasons: Vec<ReasonCode>,
    pub reviewed: bool,
    /// Classifier version stamp; 0 = never visited by the pipeline
    pub version: u32,
}

impl Message {
    /// A message as it first enters the pipeline: verdict fields unset,
    /// version 0.
    pub fn new(id: u64, sender: &str, body: &str, received_at: DateTime<Utc>, thread_id: u64) -> Self {
        Self {
            id,
            sender: sender.to_string(),
            body: body.to_string(),
            received_at,
            thread_id,
            language: None,
            features: None,
            otp: Verdict::Unknown,
            otp_intent: None,
            phishing: Verdict::Unknown,
            phish_score: None,
            reasons: Vec::new(),
            reviewed: false,
            version: 0,
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Both verdict axes decided
    pub fn is_settled(&self) -> bool {
        self.otp.is_settled() && self.phishing.is_settled()
    }

    /// Risk band for display, combining verdict and score
    pub fn risk_band(&self) -> RiskBand {
        let score = self.phish_score.unwrap_or(0.0);
        if self.phishing == Verdict::Positive || score >= RISK_PHISHING_MIN {
            RiskBand::Phishing
        } else if score >= RISK_SUSPICIOUS_MIN {
            RiskBand::Suspicious
        } else {
            RiskBand::Safe
        }
    }

    /// OTP handling guidance derived from the intent subtype
    pub fn sensitivity(&self) -> Sensitivity {
        if self.otp != Verdict::Positive {
            return Sensitivity::None;
        }
        match self.otp_intent {
            Some(OtpIntent::PaymentConfirmation) => Sensitivity::DoNotShare,
            Some(OtpIntent::DeliveryCode) => Sensitivity::CourierOnly,
            _ => Sensitivity::Info,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn message(phishing: Verdict, score: Option<f32>) -> Message {
        let mut m = Message::new(1, "SENDER", "body", Utc::now(), 0);
        m.phishing = phishing;
        m.phish_score = score;
        m
    }

    #[test]
    fn test_new_message_is_unclassified() {
        let m = Message::new(7, "VM-HDFCBK", "Your OTP is 482913", Utc::now(), 3);
        assert_eq!(m.version, 0);
        assert_eq!(m.otp, Verdict::Unknown);
        assert_eq!(m.phishing, Verdict::Unknown);
        assert!(m.otp_intent.is_none());
        assert!(m.phish_score.is_none());
        assert!(!m.reviewed);
        assert!(!m.is_settled());
    }

    #[test]
    fn test_verdict_tri_state() {
        assert!(!Verdict::Unknown.is_settled());
        assert!(Verdict::Negative.is_settled());
        assert_eq!(Verdict::from_bool(true), Verdict::Positive);
        assert_eq!(Verdict::Positive.as_bool(), Some(true));
        assert_eq!(Verdict::Unknown.as_bool(), None);
    }

    #[test]
    fn test_risk_band_cut_points() {
        assert_eq!(message(Verdict::Negative, Some(0.1)).risk_band(), RiskBand::Safe);
        assert_eq!(message(Verdict::Unknown, Some(0.45)).risk_band(), RiskBand::Suspicious);
        assert_eq!(message(Verdict::Unknown, Some(0.75)).risk_band(), RiskBand::Phishing);
        // Positive verdict dominates even with a low stored score
        assert_eq!(message(Verdict::Positive, Some(0.2)).risk_band(), RiskBand::Phishing);
        // No score at all reads as safe until classified
        assert_eq!(message(Verdict::Unknown, None).risk_band(), RiskBand::Safe);
    }

    #[test]
    fn test_sensitivity_follows_intent() {
        let mut m = message(Verdict::Negative, Some(0.0));
        assert_eq!(m.sensitivity(), Sensitivity::None);

        m.otp = Verdict::Positive;
        m.otp_intent = Some(OtpIntent::PaymentConfirmation);
        assert_eq!(m.sensitivity(), Sensitivity::DoNotShare);

        m.otp_intent = Some(OtpIntent::DeliveryCode);
        assert_eq!(m.sensitivity(), Sensitivity::CourierOnly);

        m.otp_intent = Some(OtpIntent::Login);
        assert_eq!(m.sensitivity(), Sensitivity::Info);
    }

    #[test]
    fn test_reason_code_tags_are_kebab_case() {
        assert_eq!(ReasonCode::SuspiciousLink.as_str(), "suspicious-link");
        let json = serde_json::to_string(&ReasonCode::UrgencyLanguage).unwrap();
        assert_eq!(json, "\"urgency-language\"");
    }
}

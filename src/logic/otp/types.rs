//! OTP Types
//!
//! Data structures only; decision logic lives in `classifier`.

use serde::{Deserialize, Serialize};

use crate::logic::message::{ClassificationVerdict, Verdict};

/// What an OTP authorizes. Closed set; the tag strings are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpIntent {
    Login,
    PaymentConfirmation,
    Registration,
    DeliveryCode,
    Unspecified,
}

impl OtpIntent {
    pub fn tag(&self) -> &'static str {
        match self {
            OtpIntent::Login => "login",
            OtpIntent::PaymentConfirmation => "payment-confirmation",
            OtpIntent::Registration => "registration",
            OtpIntent::DeliveryCode => "delivery-code",
            OtpIntent::Unspecified => "unspecified",
        }
    }
}

impl std::fmt::Display for OtpIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// OTP classifier output: the shared verdict shape plus the intent subtype.
///
/// Invariant: `intent` is present only when the verdict is `Positive`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtpClassification {
    pub verdict: ClassificationVerdict,
    pub intent: Option<OtpIntent>,
}

impl OtpClassification {
    /// Degraded result for a classifier that could not run
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_otp(&self) -> bool {
        self.verdict.verdict == Verdict::Positive
    }

    /// Rule-combination confidence; 0.0 when the classifier did not score
    pub fn confidence(&self) -> f32 {
        self.verdict.score.unwrap_or(0.0)
    }
}

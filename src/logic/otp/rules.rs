//! OTP Rules & Thresholds
//!
//! Signal weights and threshold bands for the OTP axis. No decision logic
//! here; `classifier` consumes these tables.

use serde::{Deserialize, Serialize};

use crate::logic::features::idx;
use crate::logic::message::ReasonCode;

use super::types::OtpIntent;

// ============================================================================
// CONFIDENCE LADDER
// ============================================================================

/// One OTP-indicating signal: the feature that fires it, its confidence
/// weight, and the reason tag surfaced to the user.
pub struct OtpSignal {
    pub feature: usize,
    pub weight: f32,
    pub reason: ReasonCode,
}

/// OTP signals in descending weight order. Confidence is the strongest
/// fired weight, not a sum; these are alternative phrasings of the same
/// fact, not independent evidence.
pub const OTP_SIGNALS: &[OtpSignal] = &[
    OtpSignal { feature: idx::CODE_AT_START, weight: 0.90, reason: ReasonCode::CodeAtStart },
    OtpSignal { feature: idx::OTP_KEYWORD, weight: 0.85, reason: ReasonCode::OtpKeyword },
    OtpSignal { feature: idx::OTP_PHRASE, weight: 0.80, reason: ReasonCode::OtpPhrase },
    OtpSignal { feature: idx::SECURITY_WARNING, weight: 0.75, reason: ReasonCode::SecurityWarning },
    OtpSignal { feature: idx::SENDER_OTP_BRAND, weight: 0.75, reason: ReasonCode::OtpSender },
    OtpSignal { feature: idx::VALIDITY_WINDOW, weight: 0.70, reason: ReasonCode::ValidityWindow },
];

/// Bonus when two or more distinct signals fire
pub const MULTI_SIGNAL_BONUS: f32 = 0.05;

/// Confidence is never reported above this
pub const CONFIDENCE_CAP: f32 = 0.98;

/// A numeric code in an otherwise silent single-segment body
pub const BARE_CODE_CONFIDENCE: f32 = 0.60;

/// `length_norm` at or below this reads as a single SMS segment
pub const SHORT_BODY_LENGTH_NORM: f32 = 0.04;

/// Confidence multiplier when lure language is present; an OTP-shaped
/// phish must land in the ambiguous band, not auto-confirm
pub const LURE_DAMPING: f32 = 0.7;

// ============================================================================
// THRESHOLD BANDS
// ============================================================================

/// Three-way split: confidence >= `positive_min` is an OTP, confidence
/// < `negative_max` is not, anything between is unknown and feeds the
/// review queue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OtpThresholds {
    pub positive_min: f32,
    pub negative_max: f32,
}

impl Default for OtpThresholds {
    fn default() -> Self {
        Self { positive_min: 0.75, negative_max: 0.40 }
    }
}

impl OtpThresholds {
    /// More positives, fewer reviews
    pub fn high_sensitivity() -> Self {
        Self { positive_min: 0.65, negative_max: 0.30 }
    }

    /// Fewer positives, wider review band
    pub fn low_sensitivity() -> Self {
        Self { positive_min: 0.85, negative_max: 0.50 }
    }
}

// ============================================================================
// INTENT SELECTION
// ============================================================================

/// One vote for an intent subtype, keyed off a context feature
pub struct IntentSignal {
    pub intent: OtpIntent,
    pub feature: usize,
    pub weight: f32,
}

/// Intent votes. An intent's score is the sum of its fired weights; the
/// bare OTP keyword votes for login so an uncontexted passcode resolves
/// there rather than to unspecified.
pub const INTENT_SIGNALS: &[IntentSignal] = &[
    IntentSignal { intent: OtpIntent::PaymentConfirmation, feature: idx::PAYMENT_CONTEXT, weight: 0.90 },
    IntentSignal { intent: OtpIntent::PaymentConfirmation, feature: idx::CURRENCY_AMOUNT, weight: 0.45 },
    IntentSignal { intent: OtpIntent::PaymentConfirmation, feature: idx::MASKED_ACCOUNT, weight: 0.40 },
    IntentSignal { intent: OtpIntent::DeliveryCode, feature: idx::DELIVERY_CONTEXT, weight: 0.85 },
    IntentSignal { intent: OtpIntent::DeliveryCode, feature: idx::SENDER_DELIVERY_BRAND, weight: 0.60 },
    IntentSignal { intent: OtpIntent::Login, feature: idx::LOGIN_CONTEXT, weight: 0.88 },
    IntentSignal { intent: OtpIntent::Login, feature: idx::OTP_KEYWORD, weight: 0.30 },
    IntentSignal { intent: OtpIntent::Registration, feature: idx::REGISTRATION_CONTEXT, weight: 0.80 },
];

/// Floor score for the `Unspecified` candidate, so selection always has a
/// winner
pub const INTENT_FLOOR_WEIGHT: f32 = 0.10;

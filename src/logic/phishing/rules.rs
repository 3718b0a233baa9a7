//! Phishing Rules & Thresholds
//!
//! The signal table is the single source of truth for scoring: definition
//! order is the tie order for reason ranking, and the weights bound each
//! signal's contribution. No scoring logic here.

use serde::{Deserialize, Serialize};

use crate::logic::features::{idx, FeatureVector};
use crate::logic::message::ReasonCode;

// ============================================================================
// SIGNAL TABLE
// ============================================================================

/// One independent phishing signal. `fires` returns the activation in
/// [0,1]; the contribution is `weight * activation`.
pub struct PhishSignal {
    pub reason: ReasonCode,
    pub weight: f32,
    pub fires: fn(&FeatureVector) -> f32,
}

fn suspicious_link(fv: &FeatureVector) -> f32 {
    if fv.flag(idx::URL_PRESENT) {
        1.0
    } else {
        0.0
    }
}

fn url_shortener(fv: &FeatureVector) -> f32 {
    if fv.flag(idx::URL_SHORTENER) {
        1.0
    } else {
        0.0
    }
}

fn urgency_language(fv: &FeatureVector) -> f32 {
    if fv.flag(idx::URGENCY_LANGUAGE) {
        1.0
    } else {
        0.0
    }
}

fn reward_bait(fv: &FeatureVector) -> f32 {
    if fv.flag(idx::REWARD_BAIT) {
        1.0
    } else {
        0.0
    }
}

fn credential_lure(fv: &FeatureVector) -> f32 {
    if fv.flag(idx::CREDENTIAL_LURE) {
        1.0
    } else {
        0.0
    }
}

/// A plain phone number pushing bank/OTP/credential content is the
/// classic spoofed-sender shape: legitimate senders use registered
/// headers or short codes.
fn sender_spoofing(fv: &FeatureVector) -> f32 {
    let spoofable_content = fv.flag(idx::PAYMENT_CONTEXT)
        || fv.flag(idx::OTP_KEYWORD)
        || fv.flag(idx::CREDENTIAL_LURE);
    if fv.flag(idx::SENDER_FULL_NUMBER) && spoofable_content {
        1.0
    } else {
        0.0
    }
}

fn excessive_punctuation(fv: &FeatureVector) -> f32 {
    fv.get(idx::EXCLAM_DENSITY)
}

/// Signals in definition order. Weights sum past 1.0 on purpose; the
/// score saturates.
pub const PHISH_SIGNALS: &[PhishSignal] = &[
    PhishSignal { reason: ReasonCode::SuspiciousLink, weight: 0.30, fires: suspicious_link },
    PhishSignal { reason: ReasonCode::UrlShortener, weight: 0.20, fires: url_shortener },
    PhishSignal { reason: ReasonCode::UrgencyLanguage, weight: 0.25, fires: urgency_language },
    PhishSignal { reason: ReasonCode::RewardBait, weight: 0.35, fires: reward_bait },
    PhishSignal { reason: ReasonCode::CredentialLure, weight: 0.30, fires: credential_lure },
    PhishSignal { reason: ReasonCode::SenderSpoofing, weight: 0.25, fires: sender_spoofing },
    PhishSignal { reason: ReasonCode::ExcessivePunctuation, weight: 0.10, fires: excessive_punctuation },
];

// ============================================================================
// THRESHOLD BANDS
// ============================================================================

/// Three-way split on the risk score. Defaults match the shipped display
/// cut points (0.3 / 0.6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhishingThresholds {
    pub positive_min: f32,
    pub negative_max: f32,
}

impl Default for PhishingThresholds {
    fn default() -> Self {
        Self { positive_min: 0.6, negative_max: 0.3 }
    }
}

impl PhishingThresholds {
    /// Flag more aggressively, fewer reviews
    pub fn high_sensitivity() -> Self {
        Self { positive_min: 0.5, negative_max: 0.2 }
    }

    /// Flag conservatively, wider review band
    pub fn low_sensitivity() -> Self {
        Self { positive_min: 0.75, negative_max: 0.4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_are_ordered() {
        for t in [
            PhishingThresholds::default(),
            PhishingThresholds::high_sensitivity(),
            PhishingThresholds::low_sensitivity(),
        ] {
            assert!(t.negative_max < t.positive_min);
        }
    }

    #[test]
    fn test_signal_weights_are_bounded() {
        for s in PHISH_SIGNALS {
            assert!(s.weight > 0.0 && s.weight <= 1.0, "{} out of range", s.reason);
        }
    }

    #[test]
    fn test_spoofing_needs_both_sender_and_content() {
        use crate::logic::features::extract;
        // Full-number sender, innocuous content: no spoofing signal
        let chat = extract("+919812345678", "lunch at noon?", None).unwrap();
        assert_eq!(sender_spoofing(&chat), 0.0);
        // Full-number sender pushing OTP content: spoofing
        let spoof = extract("+919812345678", "Your bank OTP is 482913", None).unwrap();
        assert_eq!(sender_spoofing(&spoof), 1.0);
        // Registered header pushing the same content: fine
        let brand = extract("VM-HDFCBK", "Your bank OTP is 482913", None).unwrap();
        assert_eq!(sender_spoofing(&brand), 0.0);
    }
}

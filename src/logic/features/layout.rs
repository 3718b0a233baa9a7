//! Feature Layout - Centralized Feature Definition
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The layout hash travels inside every stored feature set so a row written
//! by an older layout is detected instead of silently misread.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact vector order
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Code shape (0-2) ===
    "has_digit",            // 0: any digit in the body
    "numeric_code",         // 1: standalone 4-8 digit token
    "code_at_start",        // 2: code opens the message with OTP context
    // === OTP language (3-7) ===
    "otp_keyword",          // 3: otp / verification code / passcode ...
    "otp_phrase",           // 4: "code is", "use otp", "is your" ...
    "security_warning",     // 5: "do not share", "never reveal" ...
    "validity_window",      // 6: "valid for 5 minutes", "expires" ...
    "action_language",      // 7: login / verify / update / click / call
    // === Lure language (8-12) ===
    "url_present",          // 8: any http(s) or www link
    "url_shortener",        // 9: bit.ly / tinyurl / t.co ...
    "urgency_language",     // 10: urgent / act now / last chance ...
    "reward_bait",          // 11: won / lottery / prize / cashback ...
    "credential_lure",      // 12: "verify your account", "click here" ...
    // === Transactional markers (13-14) ===
    "currency_amount",      // 13: INR/Rs/$ followed by an amount
    "masked_account",       // 14: XX1234-style masked account or card
    // === Structure (15-18) ===
    "exclam_density",       // 15: exclamation marks, saturating at 5
    "upper_ratio",          // 16: uppercase share of alphabetic chars
    "digit_ratio",          // 17: digit share of all chars
    "length_norm",          // 18: body length over the configured max
    // === Sender shape (19-23) ===
    "sender_shortcode",     // 19: 4-6 digit short code
    "sender_brand_id",      // 20: alphanumeric header, e.g. VM-HDFCBK
    "sender_full_number",   // 21: plain 10-12 digit phone number
    "sender_otp_brand",     // 22: known bank / payment / auth sender
    "sender_delivery_brand",// 23: known courier / delivery sender
    // === Intent context (24-27) ===
    "payment_context",      // 24: bank / card / txn / upi vocabulary
    "delivery_context",     // 25: courier / package / tracking vocabulary
    "login_context",        // 26: login / sign-in vocabulary
    "registration_context", // 27: register / sign-up / activation vocabulary
];

/// Total number of features; must match FEATURE_LAYOUT.len()
pub const FEATURE_COUNT: usize = 28;

/// Named indices into the feature vector, in layout order
pub mod idx {
    pub const HAS_DIGIT: usize = 0;
    pub const NUMERIC_CODE: usize = 1;
    pub const CODE_AT_START: usize = 2;
    pub const OTP_KEYWORD: usize = 3;
    pub const OTP_PHRASE: usize = 4;
    pub const SECURITY_WARNING: usize = 5;
    pub const VALIDITY_WINDOW: usize = 6;
    pub const ACTION_LANGUAGE: usize = 7;
    pub const URL_PRESENT: usize = 8;
    pub const URL_SHORTENER: usize = 9;
    pub const URGENCY_LANGUAGE: usize = 10;
    pub const REWARD_BAIT: usize = 11;
    pub const CREDENTIAL_LURE: usize = 12;
    pub const CURRENCY_AMOUNT: usize = 13;
    pub const MASKED_ACCOUNT: usize = 14;
    pub const EXCLAM_DENSITY: usize = 15;
    pub const UPPER_RATIO: usize = 16;
    pub const DIGIT_RATIO: usize = 17;
    pub const LENGTH_NORM: usize = 18;
    pub const SENDER_SHORTCODE: usize = 19;
    pub const SENDER_BRAND_ID: usize = 20;
    pub const SENDER_FULL_NUMBER: usize = 21;
    pub const SENDER_OTP_BRAND: usize = 22;
    pub const SENDER_DELIVERY_BRAND: usize = 23;
    pub const PAYMENT_CONTEXT: usize = 24;
    pub const DELIVERY_CONTEXT: usize = 25;
    pub const LOGIN_CONTEXT: usize = 26;
    pub const REGISTRATION_CONTEXT: usize = 27;
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + feature names, for mismatch detection at runtime
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Index of a feature by layout name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|n| *n == name)
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// A stored feature set was produced under a different layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMismatch {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "feature layout mismatch: expected v{} (hash {:08x}), got v{} (hash {:08x})",
            self.expected_version, self.expected_hash, self.actual_version, self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatch {}

/// Validate a stored (version, hash) pair against the compiled-in layout
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatch> {
    let expected_hash = layout_hash();
    if version != FEATURE_VERSION || hash != expected_hash {
        return Err(LayoutMismatch {
            expected_version: FEATURE_VERSION,
            expected_hash,
            actual_version: version,
            actual_hash: hash,
        });
    }
    Ok(())
}

/// Complete layout description for logging and export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

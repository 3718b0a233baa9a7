//! Feature Extraction - raw sender/body text to FeatureVector
//!
//! Pure and deterministic: identical input always yields an identical
//! vector. All patterns are pre-compiled and the regex engine is
//! linear-time, so extraction is bounded by input length. No I/O.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::MAX_BODY_LEN;

use super::layout::idx;
use super::vector::FeatureVector;

// ============================================================================
// EXTRACTION ERROR
// ============================================================================

/// Input the extractor refuses to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Body is empty or whitespace-only
    EmptyBody,
    /// Body exceeds the configured maximum length
    BodyTooLong { len: usize, max: usize },
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::EmptyBody => write!(f, "message body is empty"),
            ExtractionError::BodyTooLong { len, max } => {
                write!(f, "message body is {} bytes, maximum is {}", len, max)
            }
        }
    }
}

impl std::error::Error for ExtractionError {}

// ============================================================================
// PATTERNS (pre-compiled once)
// ============================================================================

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).unwrap());
    };
}

pattern!(HAS_DIGIT, r"\d");
pattern!(CODE, r"\b\d{4,8}\b");
pattern!(
    CODE_AT_START,
    r"(?i)^\s*\d{4,8}\s+(is|for|your|use|enter|verification|code|otp|password|pin)\b"
);
pattern!(
    OTP_KEYWORD,
    r"(?i)\b(otp|one[ -]?time[ -]?pass(word|code)?|verification code|authentication code|security code|access code|login code|passcode)\b"
);
pattern!(
    OTP_PHRASE,
    r"(?i)(code is|is your|use code|enter code|your otp|otp is|use otp|verify with|login code)"
);
pattern!(
    SECURITY_WARNING,
    r"(?i)(do not share|don'?t share|never share|do not disclose|keep (it )?(secret|safe)|don'?t reveal|never reveal|confidential)"
);
pattern!(
    VALIDITY_WINDOW,
    r"(?i)\b(valid(ity)?|expir(es|y|ing)?)\b|\b\d+\s*(minutes?|mins?|seconds?|secs?|hours?|hrs?)\b"
);
pattern!(ACTION_LANGUAGE, r"(?i)\b(log ?in|verify|update|click|call|share|confirm)\b");
pattern!(URL_PRESENT, r"(?i)https?://|\bwww\.");
pattern!(
    URL_SHORTENER,
    r"(?i)\b(bit\.ly|tinyurl\.com|t\.co|goo\.gl|ow\.ly|is\.gd|cutt\.ly|rb\.gy|tiny\.cc|short\.link|shorturl\.at)\b"
);
pattern!(
    URGENCY_LANGUAGE,
    r"(?i)\b(urgent(ly)?|immediately|(act|claim|verify|reply) now|right away|expir(es|ing) (soon|today)|limited time|last chance|final (notice|warning))\b"
);
pattern!(
    REWARD_BAIT,
    r"(?i)\b(congratulations?|reward|winner|won|win|cashback|lottery|prize|gift card|claim)\b"
);
pattern!(
    CREDENTIAL_LURE,
    r"(?i)(click .{0,30}(here|link|https?://)|verify your (account|identity)|confirm your|update your (kyc|account|details)|account (suspended|blocked|locked)|re-?activate)"
);
pattern!(CURRENCY_AMOUNT, r"(?i)\b(inr|rs\.?|usd|eur)\s*\d|[₹$€]\s*\d");
pattern!(MASKED_ACCOUNT, r"(?i)\b(x{2,}\d{2,}|card ending \d{4}|a/c x+\d+)");
pattern!(SENDER_SHORTCODE, r"^\d{4,6}$");
pattern!(SENDER_BRAND_ID, r"(?i)^[a-z]{2}-[a-z0-9]{3,9}$|^[a-z]{3,11}$");
pattern!(SENDER_FULL_NUMBER, r"^\+?\d{10,12}$");
pattern!(
    PAYMENT_CONTEXT,
    r"(?i)\b(bank|card|payment|transaction|txn|debit|credit|upi|transfer|purchase)\b"
);
pattern!(
    DELIVERY_CONTEXT,
    r"(?i)\b(delivery|deliver|courier|package|parcel|order|shipment|tracking|logistics)\b"
);
pattern!(LOGIN_CONTEXT, r"(?i)\b(log ?in|sign ?in|access|authenticate|session)\b");
pattern!(
    REGISTRATION_CONTEXT,
    r"(?i)\b(registration|register|sign ?up|new account|activat(e|ion)|welcome code)\b"
);

/// Known bank / payment / auth sender fragments (uppercased match)
const OTP_BRAND_SENDERS: &[&str] = &[
    "BANK", "ICICI", "HDFC", "SBI", "AXIS", "KOTAK", "PAYTM", "PHONEPE", "GPAY", "UPI", "OTP",
    "AUTH", "VERIFY", "SECURE",
];

/// Known courier / delivery sender fragments (uppercased match)
const DELIVERY_BRAND_SENDERS: &[&str] = &[
    "SWIGGY", "ZOMATO", "AMAZON", "FLIPKART", "DELHIVERY", "BLUEDART", "EKART", "DUNZO",
    "COURIER",
];

// ============================================================================
// EXTRACTION
// ============================================================================

/// Extract features under the default body-length limit
pub fn extract(sender: &str, body: &str, language: Option<&str>) -> Result<FeatureVector, ExtractionError> {
    extract_with_limit(sender, body, language, MAX_BODY_LEN)
}

/// Extract features from one message's sender and body.
///
/// The language hint does not currently alter the indicator set; the
/// pattern vocabulary is latin-script.
pub fn extract_with_limit(
    sender: &str,
    body: &str,
    language: Option<&str>,
    max_body_len: usize,
) -> Result<FeatureVector, ExtractionError> {
    if body.trim().is_empty() {
        return Err(ExtractionError::EmptyBody);
    }
    if body.len() > max_body_len {
        return Err(ExtractionError::BodyTooLong { len: body.len(), max: max_body_len });
    }
    if let Some(lang) = language {
        log::trace!("extracting features with language hint {}", lang);
    }

    let mut fv = FeatureVector::new();

    // Code shape
    fv.set_flag(idx::HAS_DIGIT, HAS_DIGIT.is_match(body));
    fv.set_flag(idx::NUMERIC_CODE, CODE.is_match(body));
    fv.set_flag(idx::CODE_AT_START, CODE_AT_START.is_match(body));

    // OTP language
    fv.set_flag(idx::OTP_KEYWORD, OTP_KEYWORD.is_match(body));
    fv.set_flag(idx::OTP_PHRASE, OTP_PHRASE.is_match(body));
    fv.set_flag(idx::SECURITY_WARNING, SECURITY_WARNING.is_match(body));
    fv.set_flag(idx::VALIDITY_WINDOW, VALIDITY_WINDOW.is_match(body));
    fv.set_flag(idx::ACTION_LANGUAGE, ACTION_LANGUAGE.is_match(body));

    // Lure language
    fv.set_flag(idx::URL_PRESENT, URL_PRESENT.is_match(body));
    fv.set_flag(idx::URL_SHORTENER, URL_SHORTENER.is_match(body));
    fv.set_flag(idx::URGENCY_LANGUAGE, URGENCY_LANGUAGE.is_match(body));
    fv.set_flag(idx::REWARD_BAIT, REWARD_BAIT.is_match(body));
    fv.set_flag(idx::CREDENTIAL_LURE, CREDENTIAL_LURE.is_match(body));

    // Transactional markers
    fv.set_flag(idx::CURRENCY_AMOUNT, CURRENCY_AMOUNT.is_match(body));
    fv.set_flag(idx::MASKED_ACCOUNT, MASKED_ACCOUNT.is_match(body));

    // Structure
    let total_chars = body.chars().count().max(1);
    let exclam = body.chars().filter(|c| *c == '!').count();
    let alpha = body.chars().filter(|c| c.is_alphabetic()).count();
    let upper = body.chars().filter(|c| c.is_uppercase()).count();
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();
    fv.set(idx::EXCLAM_DENSITY, exclam.min(5) as f32 / 5.0);
    fv.set(idx::UPPER_RATIO, if alpha > 0 { upper as f32 / alpha as f32 } else { 0.0 });
    fv.set(idx::DIGIT_RATIO, digits as f32 / total_chars as f32);
    fv.set(idx::LENGTH_NORM, (body.len() as f32 / max_body_len as f32).min(1.0));

    // Sender shape
    let sender = sender.trim();
    let sender_upper = sender.to_uppercase();
    fv.set_flag(idx::SENDER_SHORTCODE, SENDER_SHORTCODE.is_match(sender));
    fv.set_flag(idx::SENDER_BRAND_ID, SENDER_BRAND_ID.is_match(sender));
    fv.set_flag(idx::SENDER_FULL_NUMBER, SENDER_FULL_NUMBER.is_match(sender));
    fv.set_flag(
        idx::SENDER_OTP_BRAND,
        OTP_BRAND_SENDERS.iter().any(|b| sender_upper.contains(b)),
    );
    fv.set_flag(
        idx::SENDER_DELIVERY_BRAND,
        DELIVERY_BRAND_SENDERS.iter().any(|b| sender_upper.contains(b)),
    );

    // Intent context
    fv.set_flag(idx::PAYMENT_CONTEXT, PAYMENT_CONTEXT.is_match(body));
    fv.set_flag(idx::DELIVERY_CONTEXT, DELIVERY_CONTEXT.is_match(body));
    fv.set_flag(idx::LOGIN_CONTEXT, LOGIN_CONTEXT.is_match(body));
    fv.set_flag(idx::REGISTRATION_CONTEXT, REGISTRATION_CONTEXT.is_match(body));

    Ok(fv)
}

/// First standalone 4-8 digit token in a body, if any
pub fn first_code(body: &str) -> Option<&str> {
    CODE.find(body).map(|m| m.as_str())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_message_features() {
        let fv = extract("AX-HDFCBK", "Your OTP is 482913, valid for 5 minutes", None).unwrap();
        assert!(fv.flag(idx::NUMERIC_CODE));
        assert!(fv.flag(idx::OTP_KEYWORD));
        assert!(fv.flag(idx::OTP_PHRASE));
        assert!(fv.flag(idx::VALIDITY_WINDOW));
        assert!(!fv.flag(idx::URL_PRESENT));
        assert!(fv.flag(idx::SENDER_BRAND_ID));
        assert!(fv.flag(idx::SENDER_OTP_BRAND));
    }

    #[test]
    fn test_phishing_message_features() {
        let fv = extract(
            "9876543210",
            "Congratulations! You won! Click http://bit.ly/xyz to claim now!!!",
            None,
        )
        .unwrap();
        assert!(fv.flag(idx::URL_PRESENT));
        assert!(fv.flag(idx::URL_SHORTENER));
        assert!(fv.flag(idx::REWARD_BAIT));
        assert!(fv.flag(idx::URGENCY_LANGUAGE));
        assert!(fv.flag(idx::CREDENTIAL_LURE));
        assert!(fv.flag(idx::SENDER_FULL_NUMBER));
        assert!(fv.get(idx::EXCLAM_DENSITY) > 0.5);
    }

    #[test]
    fn test_empty_body_is_rejected() {
        assert_eq!(extract("SENDER", "", None), Err(ExtractionError::EmptyBody));
        assert_eq!(extract("SENDER", "   \n  ", None), Err(ExtractionError::EmptyBody));
    }

    #[test]
    fn test_oversized_body_is_rejected() {
        let body = "a".repeat(MAX_BODY_LEN + 1);
        match extract("SENDER", &body, None) {
            Err(ExtractionError::BodyTooLong { len, max }) => {
                assert_eq!(len, MAX_BODY_LEN + 1);
                assert_eq!(max, MAX_BODY_LEN);
            }
            other => panic!("expected BodyTooLong, got {:?}", other),
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let body = "Use 4821 to sign in. Do not share this code.";
        let a = extract("12345", body, Some("en")).unwrap();
        let b = extract("12345", body, Some("en")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sender_shapes_are_mutually_sensible() {
        let short = extract("56767", "hello 1234", None).unwrap();
        assert!(short.flag(idx::SENDER_SHORTCODE));
        assert!(!short.flag(idx::SENDER_FULL_NUMBER));

        let full = extract("+919876543210", "hello 1234", None).unwrap();
        assert!(full.flag(idx::SENDER_FULL_NUMBER));
        assert!(!full.flag(idx::SENDER_SHORTCODE));

        let brand = extract("VM-ICICIB", "hello 1234", None).unwrap();
        assert!(brand.flag(idx::SENDER_BRAND_ID));
        assert!(brand.flag(idx::SENDER_OTP_BRAND));
    }

    #[test]
    fn test_first_code() {
        assert_eq!(first_code("Your OTP is 482913, valid 5 min"), Some("482913"));
        assert_eq!(first_code("no code here"), None);
        // 3-digit and 9-digit runs are not codes
        assert_eq!(first_code("call 100 or 123456789x"), None);
    }
}

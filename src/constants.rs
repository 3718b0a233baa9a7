//! Central Configuration Constants
//!
//! Single source of truth for pipeline defaults.
//! To change a default, only edit this file.

/// Maximum accepted message body length (bytes).
///
/// Concatenated SMS tops out well below this; anything longer is not a
/// text message and is routed to manual review instead of the extractor.
pub const MAX_BODY_LEN: usize = 4096;

/// Default number of messages pulled from the store per sweep batch
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Default worker count for the batch sweep
pub const DEFAULT_SWEEP_WORKERS: usize = 4;

/// Minimum heuristic confidence for exposing an OTP code to clipboard copy
pub const OTP_COPY_MIN_CONFIDENCE: f32 = 0.8;

/// Crate version
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const CORE_NAME: &str = "sms-shield-core";

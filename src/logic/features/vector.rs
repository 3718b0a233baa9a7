//! Feature Vector - canonical derived representation of one message
//!
//! Fixed-size, versioned, layout-hashed. Owned by the message it was
//! derived from; extraction always produces a fresh vector.

use serde::{Deserialize, Serialize};

use super::layout::{
    layout_hash, validate_layout, LayoutMismatch, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION,
};

/// Canonical feature set for one message, in FEATURE_LAYOUT order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version this vector was extracted under
    pub version: u8,
    /// CRC32 of the layout, for mismatch detection on stored rows
    pub layout_hash: u32,
    values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Zeroed vector under the current layout
    pub fn new() -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values: [0.0; FEATURE_COUNT],
        }
    }

    pub fn get(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    /// Binary indicator view of a feature
    pub fn flag(&self, index: usize) -> bool {
        self.get(index) > 0.5
    }

    pub fn set(&mut self, index: usize, value: f32) {
        if index < FEATURE_COUNT {
            self.values[index] = value;
        }
    }

    pub fn set_flag(&mut self, index: usize, on: bool) {
        self.set(index, if on { 1.0 } else { 0.0 });
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Check this vector against the compiled-in layout
    pub fn validate(&self) -> Result<(), LayoutMismatch> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Named view for the audit trail
    pub fn to_log_entry(&self) -> serde_json::Value {
        let mut named = serde_json::Map::new();
        for (name, value) in FEATURE_LAYOUT.iter().zip(self.values.iter()) {
            if *value != 0.0 {
                named.insert(name.to_string(), serde_json::json!(*value));
            }
        }
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": named,
        })
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

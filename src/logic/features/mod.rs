//! Features Module - Feature Extraction Engine
//!
//! Canonical, versioned representation of a message's text and sender
//! shape, consumed by both classifiers.
//!
//! - `layout`: authoritative feature ordering + layout hash
//! - `vector`: fixed-size versioned FeatureVector
//! - `extractor`: pure text/sender -> FeatureVector

pub mod layout;
pub mod vector;
pub mod extractor;


pub use extractor::{extract, extract_with_limit, first_code, ExtractionError};
pub use layout::{idx, LayoutInfo, LayoutMismatch, FEATURE_COUNT, FEATURE_VERSION};
pub use vector::FeatureVector;

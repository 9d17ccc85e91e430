//! Filingwatch Core
//!
//! Core types, traits, and utilities shared across filingwatch components.
//!
//! This crate provides:
//! - The closed event-type vocabulary and its display names
//! - The append-only feedback label record
//! - Error types and result handling
//! - Text normalization shared by the classifier and evidence extractor

pub mod error;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use text::normalize_whitespace;
pub use types::{EventType, FeedbackRow, GENERIC_LABEL};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::text::normalize_whitespace;
    pub use crate::types::{EventType, FeedbackRow};
}

//! Substitute Scout common types, IDs, and errors.
//!
//! This crate provides foundational types shared across subst-core modules:
//! - Product identity with int-or-string wire decoding
//! - Validated substitute entries and prediction results
//! - The prediction service reply shape and its validation
//! - Common error types
//! - Output format specifications

pub mod entry;
pub mod error;
pub mod id;
pub mod output;
pub mod reply;
pub mod schema;

pub use entry::{PredictionResult, ScoreField, SubstituteEntry};
pub use error::{Error, Result};
pub use id::ProductId;
pub use output::OutputFormat;
pub use reply::{PredictionReply, PredictionResponse, ServiceFailure};
pub use schema::SCHEMA_VERSION;

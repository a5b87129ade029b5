//! Substitute Scout configuration loading and validation.
//!
//! This crate provides:
//! - Typed structs for policy.json (display thresholds) and scoring.json
//!   (local engine weights)
//! - Config resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation
//! - Config snapshots for run logs

pub mod policy;
pub mod resolve;
pub mod scoring;
pub mod snapshot;
pub mod validate;

pub use policy::SummaryPolicy;
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use scoring::ScoringParams;
pub use snapshot::ConfigSnapshot;
pub use validate::{ValidationError, ValidationResult};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Policy and scoring parameters together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    pub policy: SummaryPolicy,
    pub scoring: ScoringParams,
}

impl Config {
    /// Validate both halves.
    pub fn validate(&self) -> ValidationResult<()> {
        validate::validate_policy(&self.policy)?;
        validate::validate_scoring(&self.scoring)
    }
}

//! Substitute Scout math utilities.

pub mod math;

pub use math::aggregate::{mean, Rollup, RollupSummary};
pub use math::stable::*;

//! Schema versioning for machine-readable output.

/// Version of the JSON envelope emitted by subst-core.
///
/// Bumped on any breaking change to the `decision` payload shape.
pub const SCHEMA_VERSION: &str = "1.0.0";

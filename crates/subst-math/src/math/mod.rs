//! Core math modules.

pub mod aggregate;
pub mod stable;

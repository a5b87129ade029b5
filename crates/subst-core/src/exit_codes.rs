//! Exit codes for the subst-core CLI.
//!
//! Scripts can branch on the outcome without parsing output.
//!
//! Exit code ranges:
//! - 0-2: Operational outcomes
//! - 10-19: User/input errors (fixable by the caller)
//! - 20-29: Internal errors

use subst_common::Error;

/// Exit codes for subst-core operations.
///
/// Stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Operational Outcomes (0-2)
    // ========================================================================
    /// A decision with at least one substitute was rendered
    Rendered = 0,

    /// The query succeeded but produced no substitutes
    NoSubstitutes = 1,

    /// The prediction service (or local engine) answered with an error
    UpstreamError = 2,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments or configuration
    ArgsError = 10,

    /// Reply or catalog could not be decoded or validated
    MalformedInput = 11,

    /// Config schema version mismatch
    VersionError = 13,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// A decision was produced (codes 0-1).
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Rendered | ExitCode::NoSubstitutes)
    }

    /// Codes below 10 describe outcomes, not failures.
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Rendered => "OK_RENDERED",
            ExitCode::NoSubstitutes => "OK_EMPTY",
            ExitCode::UpstreamError => "ERR_UPSTREAM",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::MalformedInput => "ERR_INPUT",
            ExitCode::VersionError => "ERR_VERSION",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Outcome code for a finished summary of `len` entries.
    pub fn for_result_len(len: usize) -> ExitCode {
        if len == 0 {
            ExitCode::NoSubstitutes
        } else {
            ExitCode::Rendered
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::EmptyId
            | Error::DuplicateSubstitute { .. }
            | Error::MissingScore { .. }
            | Error::NonNumericScore { .. }
            | Error::ScoreOutOfRange { .. }
            | Error::MissingSubject
            | Error::DuplicateProduct { .. }
            | Error::Json(_) => ExitCode::MalformedInput,

            Error::UpstreamFailure(_) | Error::ProductNotFound { .. } => ExitCode::UpstreamError,

            Error::Io(_) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

//! Profile loading errors

use super::CompileError;

/// Creates a profile not found error
pub fn not_found(name: impl Into<String>, searched: &[String]) -> CompileError {
    CompileError::ProfileNotFound {
        name: name.into(),
        searched: searched.join(", "),
    }
}

/// Creates a profile parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> CompileError {
    CompileError::ProfileParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a profile read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> CompileError {
    CompileError::ProfileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

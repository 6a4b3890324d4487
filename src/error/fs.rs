//! File system errors

use super::CompileError;

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> CompileError {
    CompileError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}


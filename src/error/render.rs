//! Render errors

use super::CompileError;

/// Creates a render failed error
pub fn render_failed(format: impl Into<String>, reason: impl Into<String>) -> CompileError {
    CompileError::RenderFailed {
        format: format.into(),
        reason: reason.into(),
    }
}

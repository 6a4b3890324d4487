//! Stage builder errors

use super::CompileError;

/// Creates an unsupported variant error
pub fn unsupported_variant(
    stage: impl Into<String>,
    variant: impl Into<String>,
    supported: &[&str],
) -> CompileError {
    CompileError::UnsupportedVariant {
        stage: stage.into(),
        variant: variant.into(),
        supported: supported.join(", "),
    }
}

/// Creates a duplicate builder error
pub fn duplicate_builder(stage: impl Into<String>) -> CompileError {
    CompileError::DuplicateBuilder {
        stage: stage.into(),
    }
}

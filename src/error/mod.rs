//! Error types and handling for rhasspy-supervisor
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Two families of errors exist:
//! - [`CompileError`]: fatal, aborts the whole compile and no output is written
//! - [`MissingSetting`] / [`MalformedValue`]: local to one stage (or one unit
//!   inside a stage), logged and converted into an omission at the builder boundary
//!
//! Constructor helpers live in sub-modules by error domain:
//! - [`profile`]: Profile loading errors
//! - [`stage`]: Stage builder errors
//! - [`render`]: Output rendering errors
//! - [`fs`]: File system errors

pub mod fs;
pub mod profile;
pub mod render;
pub mod stage;

use miette::Diagnostic;
use thiserror::Error;

/// Main (fatal) error type for compile operations
#[derive(Error, Diagnostic, Debug)]
pub enum CompileError {
    // Stage errors
    #[error("Unsupported {stage} system: '{variant}'")]
    #[diagnostic(
        code(rhasspy_supervisor::stage::unsupported_variant),
        help("Supported values: {supported}, or 'dummy' to disable the stage")
    )]
    UnsupportedVariant {
        stage: String,
        variant: String,
        supported: String,
    },

    #[error("A builder for stage '{stage}' is already registered")]
    #[diagnostic(code(rhasspy_supervisor::stage::duplicate_builder))]
    DuplicateBuilder { stage: String },

    // Profile errors
    #[error("Profile '{name}' not found")]
    #[diagnostic(
        code(rhasspy_supervisor::profile::not_found),
        help("Looked for profile.json in: {searched}")
    )]
    ProfileNotFound { name: String, searched: String },

    #[error("Failed to parse profile file: {path}: {reason}")]
    #[diagnostic(code(rhasspy_supervisor::profile::parse_failed))]
    ProfileParseFailed { path: String, reason: String },

    #[error("Failed to read profile file: {path}: {reason}")]
    #[diagnostic(code(rhasspy_supervisor::profile::read_failed))]
    ProfileReadFailed { path: String, reason: String },

    // Render errors
    #[error("Failed to render {format} document: {reason}")]
    #[diagnostic(code(rhasspy_supervisor::render::failed))]
    RenderFailed { format: String, reason: String },

    // File system errors
    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(
        code(rhasspy_supervisor::fs::write_failed),
        help("Check that the user profiles directory is writable")
    )]
    FileWriteFailed { path: String, reason: String },
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CompileError>;

/// A setting the selected variant cannot run without is absent.
///
/// The stage is omitted from the topology; other stages are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required setting '{path}'")]
pub struct MissingSetting {
    pub path: String,
}

impl MissingSetting {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// A setting is present but cannot be interpreted.
///
/// Scoped to the smallest enclosing unit (one UDP tuple, one model entry,
/// one numeric option): that unit is skipped and the rest carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed value '{value}' for '{path}': {reason}")]
pub struct MalformedValue {
    pub path: String,
    pub value: String,
    pub reason: String,
}

impl MalformedValue {
    pub fn new(
        path: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Log this value as a warning and drop it
    pub fn warn(&self) {
        tracing::warn!(setting = %self.path, value = %self.value, "{}", self);
    }
}

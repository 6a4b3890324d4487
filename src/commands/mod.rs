//! Command implementations for the rhasspy-supervisor CLI

pub mod compile;
pub mod completions;
pub mod version;

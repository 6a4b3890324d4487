//! Runnable process descriptions
//!
//! A [`ProcessSpec`] is what every stage builder produces: a program, its
//! ordered argument tokens, and the metadata the renderers need (broker
//! dependency, audio device and profile volume passthrough).

use std::path::Path;

use crate::shell;

/// Host resources a process needs when run inside a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceHints {
    /// Needs the host sound device passed through
    pub needs_audio_device: bool,

    /// Reads or writes files under the profile directories
    pub needs_profile_volume: bool,
}

/// One independently runnable unit of the topology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    /// Executable identifier (e.g., "rhasspy-wake-porcupine-hermes")
    pub program: String,

    /// Argument tokens, unquoted
    pub args: Vec<String>,

    /// Must be started after the message broker
    pub requires_broker: bool,

    pub hints: ResourceHints,
}

impl ProcessSpec {
    /// Create a spec for a process that talks to the broker
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            requires_broker: true,
            hints: ResourceHints::default(),
        }
    }

    /// Create a spec for the broker process itself
    pub fn broker(program: impl Into<String>) -> Self {
        Self {
            requires_broker: false,
            ..Self::new(program)
        }
    }

    /// Append a single token
    pub fn arg(mut self, token: impl Into<String>) -> Self {
        self.args.push(token.into());
        self
    }

    /// Append several tokens in order
    pub fn args<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Append `flag value`
    pub fn option(self, flag: &str, value: impl ToString) -> Self {
        self.arg(flag).arg(value.to_string())
    }

    /// Append `flag value` only when a value is present
    pub fn option_if<T: ToString>(self, flag: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.option(flag, value),
            None => self,
        }
    }

    /// Append `flag path`
    pub fn path_option(self, flag: &str, path: &Path) -> Self {
        self.option(flag, path.display())
    }

    /// Append `flag` only when `enabled`
    pub fn flag_if(self, flag: &str, enabled: bool) -> Self {
        if enabled { self.arg(flag) } else { self }
    }

    /// Append `flag <sub-command>` with the sub-command as one token
    pub fn sub_command(self, flag: &str, command: &SubCommand) -> Self {
        self.arg(flag).arg(command.to_token())
    }

    pub fn with_audio_device(mut self) -> Self {
        self.hints.needs_audio_device = true;
        self
    }

    pub fn with_profile_volume(mut self) -> Self {
        self.hints.needs_profile_volume = true;
        self
    }

    /// Quoted command line: program followed by its arguments
    pub fn command_line(&self) -> String {
        shell::join(std::iter::once(&self.program).chain(self.args.iter()))
    }

    /// Quoted arguments without the program
    pub fn args_line(&self) -> String {
        shell::join(&self.args)
    }
}

/// An external command embedded as a single argument of another process
///
/// Serialized in exactly one place, [`SubCommand::to_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SubCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, token: impl Into<String>) -> Self {
        self.args.push(token.into());
        self
    }

    pub fn args<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Join program and arguments into one shell-escaped token
    pub fn to_token(&self) -> String {
        shell::join(std::iter::once(&self.program).chain(self.args.iter()))
    }
}

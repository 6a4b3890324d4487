//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::broker::DEFAULT_LOCAL_PORT;

/// rhasspy-supervisor - Rhasspy profile compiler
///
/// Turn a Rhasspy profile into a supervisord configuration and a
/// docker-compose file describing the processes of the voice pipeline.
#[derive(Parser, Debug)]
#[command(
    name = "rhasspy-supervisor",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Compile a Rhasspy profile into supervisord and docker-compose configurations",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  rhasspy-supervisor compile --profile en\n    \
                  rhasspy-supervisor compile -p de --system-profiles /usr/share/rhasspy/profiles\n    \
                  rhasspy-supervisor completions --shell zsh"
)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a profile and write both configuration files
    Compile(CompileArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the compile command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Compile the English profile:\n    rhasspy-supervisor compile -p en\n\n\
                   Use a different internal broker port:\n    rhasspy-supervisor compile -p en --local-mqtt-port 12184\n\n\
                   Custom output names:\n    rhasspy-supervisor compile -p en --supervisord-conf rhasspy.conf --docker-compose compose.yml")]
pub struct CompileArgs {
    /// Profile name (e.g. en, de, fr)
    #[arg(long, short = 'p', env = "RHASSPY_PROFILE")]
    pub profile: String,

    /// Directory holding the shipped profiles and defaults.json
    #[arg(long, env = "RHASSPY_SYSTEM_PROFILES", default_value = "profiles")]
    pub system_profiles: PathBuf,

    /// Directory holding user profiles [default: ~/.config/rhasspy/profiles]
    #[arg(long, env = "RHASSPY_USER_PROFILES")]
    pub user_profiles: Option<PathBuf>,

    /// File name of the supervisord configuration
    #[arg(long, default_value = "supervisord.conf")]
    pub supervisord_conf: String,

    /// File name of the docker-compose file
    #[arg(long, default_value = "docker-compose.yml")]
    pub docker_compose: String,

    /// Port of the internal MQTT broker
    #[arg(long, default_value_t = DEFAULT_LOCAL_PORT)]
    pub local_mqtt_port: u16,
}

impl CompileArgs {
    /// User profiles directory, defaulting to the per-user config directory
    pub fn user_profiles_dir(&self) -> PathBuf {
        self.user_profiles.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rhasspy")
                .join("profiles")
        })
    }
}

/// Arguments for completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}

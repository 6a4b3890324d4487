//! Stage builders
//!
//! Each pipeline stage has a builder that turns the stage's selected variant
//! into a [`ProcessSpec`]. The builders share one contract:
//!
//! - an unknown variant id is fatal ([`CompileError::UnsupportedVariant`])
//! - a missing mandatory setting omits the stage ([`StageOutcome::Omitted`])
//! - a successful build gets the standard MQTT/TLS/site-id arguments appended
//!
//! ## Adding a Variant
//!
//! 1. Add it to the stage's `stage_variants!` enum
//! 2. Handle it in the stage's `VariantBuilder::build_variant`
//!
//! The registry and the assembler need no changes.
//!
//! [`CompileError::UnsupportedVariant`]: crate::error::CompileError::UnsupportedVariant

pub mod dialogue;
pub mod handle;
pub mod intent;
pub mod microphone;
pub mod registry;
pub mod speakers;
pub mod speech_to_text;
pub mod standard_args;
pub mod text_to_speech;
pub mod udp_audio;
pub mod wake;
pub mod wake_models;
pub mod webhooks;

use serde_json::Value as JsonValue;

use crate::broker::MqttBrokerConfig;
use crate::error::{self, MissingSetting, Result};
use crate::process::{ProcessSpec, SubCommand};
use crate::profile::{Profile, coerce};
use crate::shell;
use crate::stage::Stage;

pub use registry::BuilderRegistry;

/// Result of building one variant: a process, or the setting that was missing
pub type VariantResult = std::result::Result<ProcessSpec, MissingSetting>;

/// What a stage contributes to the topology
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Ready(ProcessSpec),
    Omitted(MissingSetting),
}

/// Read-only inputs shared by every builder
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    pub profile: &'a Profile,

    /// Effective site ids for this stage (master ++ satellites)
    pub site_ids: Vec<String>,

    pub broker: &'a MqttBrokerConfig,

    /// `logging.format`, passed through to every service
    pub log_format: Option<String>,
}

impl<'a> BuildContext<'a> {
    pub fn new(profile: &'a Profile, site_ids: Vec<String>, broker: &'a MqttBrokerConfig) -> Self {
        Self {
            profile,
            site_ids,
            broker,
            log_format: profile.text("logging.format"),
        }
    }

    /// Site id used when a setting does not name one
    pub fn default_site_id(&self) -> &str {
        self.site_ids.first().map_or("default", String::as_str)
    }

    /// Text setting the variant cannot run without
    pub fn required(&self, path: &str) -> std::result::Result<String, MissingSetting> {
        self.profile
            .text(path)
            .ok_or_else(|| MissingSetting::new(path))
    }

    /// First present setting along a fallback chain, reported as the head of the chain when absent
    pub fn required_chain(&self, paths: &[&str]) -> std::result::Result<String, MissingSetting> {
        self.profile
            .text_chain(paths)
            .ok_or_else(|| MissingSetting::new(paths.first().copied().unwrap_or_default()))
    }

    /// A user-supplied external command: `<prefix>program` plus optional `<prefix>arguments`
    pub fn user_command(
        &self,
        program_path: &str,
        arguments_path: &str,
    ) -> std::result::Result<SubCommand, MissingSetting> {
        let program = self.required(program_path)?;
        let args = match self.profile.get(arguments_path) {
            None => Vec::new(),
            Some(JsonValue::Array(items)) => items.iter().filter_map(coerce::as_text).collect(),
            Some(value) => match coerce::as_text(value) {
                None => Vec::new(),
                Some(raw) => shell::split(arguments_path, &raw).map_err(|malformed| {
                    malformed.warn();
                    MissingSetting::new(arguments_path)
                })?,
            },
        };

        Ok(SubCommand::new(program).args(args))
    }
}

/// Closed set of variant ids for one stage
pub trait StageVariant: Sized + Copy + 'static {
    /// Every supported id, in documentation order
    const IDS: &'static [&'static str];

    fn parse(id: &str) -> Option<Self>;

    fn id(self) -> &'static str;
}

/// Declare a stage's variant enum and its id mapping
macro_rules! stage_variants {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $id:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::builders::StageVariant for $name {
            const IDS: &'static [&'static str] = &[$($id),+];

            fn parse(id: &str) -> Option<Self> {
                match id {
                    $($id => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn id(self) -> &'static str {
                match self {
                    $(Self::$variant => $id,)+
                }
            }
        }
    };
}

pub(crate) use stage_variants;

/// Typed builder for one stage
pub trait VariantBuilder: std::fmt::Debug {
    const STAGE: Stage;

    type Variant: StageVariant;

    /// Program and variant-specific arguments, without the standard arguments
    fn build_variant(&self, variant: Self::Variant, ctx: &BuildContext) -> VariantResult;
}

/// Object-safe builder contract used by the registry
pub trait StageBuilder: std::fmt::Debug {
    fn stage(&self) -> Stage;

    fn supported_variants(&self) -> &'static [&'static str];

    /// Build the stage for `variant`
    ///
    /// # Errors
    ///
    /// Returns `CompileError::UnsupportedVariant` if `variant` is not one of
    /// [`StageBuilder::supported_variants`].
    fn build(&self, variant: &str, ctx: &BuildContext) -> Result<StageOutcome>;
}

impl<T: VariantBuilder> StageBuilder for T {
    fn stage(&self) -> Stage {
        T::STAGE
    }

    fn supported_variants(&self) -> &'static [&'static str] {
        T::Variant::IDS
    }

    fn build(&self, variant: &str, ctx: &BuildContext) -> Result<StageOutcome> {
        let parsed = T::Variant::parse(variant).ok_or_else(|| {
            error::stage::unsupported_variant(T::STAGE.name(), variant, T::Variant::IDS)
        })?;

        match self.build_variant(parsed, ctx) {
            Ok(spec) => {
                let standard = standard_args::standard_args(
                    &ctx.site_ids,
                    ctx.broker,
                    ctx.log_format.as_deref(),
                );
                Ok(StageOutcome::Ready(spec.args(standard)))
            }
            Err(missing) => {
                tracing::warn!(
                    stage = %T::STAGE,
                    variant = parsed.id(),
                    setting = %missing.path,
                    "stage omitted: {missing}"
                );
                Ok(StageOutcome::Omitted(missing))
            }
        }
    }
}

/// `<profile key>.<variant>.<name>`
pub fn setting(stage: Stage, variant: impl StageVariant, name: &str) -> String {
    format!("{}.{}.{}", stage.profile_key(), variant.id(), name)
}

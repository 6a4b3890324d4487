//! Dialogue management stage

use crate::builders::{BuildContext, VariantBuilder, VariantResult, stage_variants};
use crate::process::ProcessSpec;
use crate::stage::Stage;

/// Feedback sounds, keyed by the name the dialogue manager knows them by
const FEEDBACK_SOUNDS: [&str; 3] = ["wake", "recorded", "error"];

stage_variants! {
    pub enum DialogueVariant {
        Rhasspy => "rhasspy",
    }
}

#[derive(Debug)]
pub struct DialogueBuilder;

impl VariantBuilder for DialogueBuilder {
    const STAGE: Stage = Stage::Dialogue;

    type Variant = DialogueVariant;

    fn build_variant(&self, variant: DialogueVariant, ctx: &BuildContext) -> VariantResult {
        let profile = ctx.profile;
        let DialogueVariant::Rhasspy = variant;

        let mut spec = ProcessSpec::new("rhasspy-dialogue-hermes")
            .option_if(
                "--session-timeout",
                profile.number_opt::<f64>("dialogue.session_timeout"),
            )
            .option_if(
                "--min-asr-confidence",
                profile.number_opt::<f64>("dialogue.min_asr_confidence"),
            );

        for name in FEEDBACK_SOUNDS {
            if let Some(sound) = profile.text(&format!("sounds.{name}")) {
                spec = spec
                    .arg("--sound")
                    .arg(name)
                    .arg(profile.read_path(sound).display().to_string())
                    .with_profile_volume();
            }
        }

        Ok(spec)
    }
}

//! Speaker output stage

use crate::builders::{BuildContext, VariantBuilder, VariantResult, setting, stage_variants};
use crate::error::MalformedValue;
use crate::process::{ProcessSpec, SubCommand};
use crate::profile::{Profile, coerce};
use crate::stage::Stage;

stage_variants! {
    pub enum SpeakersVariant {
        Aplay => "aplay",
        Command => "command",
        Remote => "remote",
    }
}

#[derive(Debug)]
pub struct SpeakersBuilder;

impl VariantBuilder for SpeakersBuilder {
    const STAGE: Stage = Stage::Speakers;

    type Variant = SpeakersVariant;

    fn build_variant(&self, variant: SpeakersVariant, ctx: &BuildContext) -> VariantResult {
        let key = |name: &str| setting(Self::STAGE, variant, name);
        let profile = ctx.profile;

        let spec = match variant {
            SpeakersVariant::Aplay => {
                let mut play = SubCommand::new("aplay").args(["-q", "-t", "wav"]);
                if let Some(device) = profile.text(&key("device")) {
                    play = play.arg("-D").arg(device);
                }

                ProcessSpec::new("rhasspy-speakers-cli-hermes")
                    .sub_command("--play-command", &play)
                    .sub_command("--list-command", &SubCommand::new("aplay").arg("-L"))
            }
            SpeakersVariant::Command => {
                let play = ctx.user_command(&key("program"), &key("arguments"))?;
                ProcessSpec::new("rhasspy-speakers-cli-hermes").sub_command("--play-command", &play)
            }
            SpeakersVariant::Remote => {
                return Ok(ProcessSpec::new("rhasspy-remote-http-hermes")
                    .option("--speakers-url", ctx.required(&key("url"))?));
            }
        };

        Ok(spec
            .option_if("--volume", volume(profile))
            .with_audio_device())
    }
}

/// `sounds.volume` as a fraction in `0.0..=1.0`; values above 1 are percentages
fn volume(profile: &Profile) -> Option<String> {
    const PATH: &str = "sounds.volume";

    let raw = profile.number_opt::<f64>(PATH)?;
    let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
    if !(0.0..=1.0).contains(&fraction) {
        MalformedValue::new(PATH, raw.to_string(), "expected 0-1 or a percentage").warn();
        return None;
    }

    Some(coerce::format_float(fraction))
}

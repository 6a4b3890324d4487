//! Text to speech stage
//!
//! Command line synthesizers run under `rhasspy-tts-cli-hermes`, which
//! appends the sentence to the command and reads WAV audio from stdout (or
//! from `{file}` with `--temporary-wav`). HTTP synthesizers run under
//! `rhasspy-remote-http-hermes` with a fully derived URL.

use url::Url;

use crate::builders::{BuildContext, VariantBuilder, VariantResult, setting, stage_variants};
use crate::error::{MalformedValue, MissingSetting};
use crate::process::{ProcessSpec, SubCommand};
use crate::stage::Stage;

const DEFAULT_FLITE_VOICE: &str = "kal16";
const DEFAULT_MARYTTS_URL: &str = "http://localhost:59125";
const DEFAULT_OPENTTS_URL: &str = "http://localhost:5500";

/// Placeholder `rhasspy-tts-cli-hermes` replaces with a temporary WAV path
const WAV_PLACEHOLDER: &str = "{file}";

stage_variants! {
    pub enum TextToSpeechVariant {
        Espeak => "espeak",
        Flite => "flite",
        Picotts => "picotts",
        Nanotts => "nanotts",
        Marytts => "marytts",
        Opentts => "opentts",
        Remote => "remote",
        Command => "command",
    }
}

#[derive(Debug)]
pub struct TextToSpeechBuilder;

impl VariantBuilder for TextToSpeechBuilder {
    const STAGE: Stage = Stage::TextToSpeech;

    type Variant = TextToSpeechVariant;

    fn build_variant(&self, variant: TextToSpeechVariant, ctx: &BuildContext) -> VariantResult {
        let key = |name: &str| setting(Self::STAGE, variant, name);
        let profile = ctx.profile;

        let spec = match variant {
            TextToSpeechVariant::Espeak => {
                let mut speak = SubCommand::new("espeak").arg("--stdout");
                let voice = profile.text_chain(&[&key("voice"), "language"]);
                // espeak only binds the language filter when attached to the flag
                let voices = SubCommand::new("espeak").arg(match &voice {
                    Some(voice) => format!("--voices={voice}"),
                    None => "--voices".to_string(),
                });
                if let Some(voice) = voice {
                    speak = speak.arg("-v").arg(voice);
                }

                cli_tts(&speak).sub_command("--voices-command", &voices)
            }
            TextToSpeechVariant::Flite => {
                let voice = profile.text_or(&key("voice"), DEFAULT_FLITE_VOICE);
                cli_tts(
                    &SubCommand::new("flite")
                        .args(["-o", "/dev/stdout", "-voice"])
                        .arg(voice)
                        .arg("-t"),
                )
            }
            TextToSpeechVariant::Picotts => {
                let mut speak = SubCommand::new("pico2wave").args(["-w", WAV_PLACEHOLDER]);
                if let Some(language) = profile.text_chain(&[&key("language"), "language"]) {
                    speak = speak.arg("-l").arg(language);
                }
                cli_tts(&speak).arg("--temporary-wav")
            }
            TextToSpeechVariant::Nanotts => {
                let mut speak = SubCommand::new("nanotts").args(["-o", WAV_PLACEHOLDER]);
                if let Some(language) = profile.text_chain(&[&key("language"), "language"]) {
                    speak = speak.arg("-v").arg(language);
                }
                cli_tts(&speak).arg("--temporary-wav")
            }
            TextToSpeechVariant::Marytts => {
                let base = profile.text_or(&key("url"), DEFAULT_MARYTTS_URL);
                let mut query = vec![
                    ("INPUT_TYPE", "TEXT".to_string()),
                    ("OUTPUT_TYPE", "AUDIO".to_string()),
                    ("AUDIO", "WAVE".to_string()),
                ];
                if let Some(locale) = profile.text_chain(&[&key("locale"), "language"]) {
                    query.push(("LOCALE", locale.replace('-', "_")));
                }
                if let Some(voice) = profile.text(&key("voice")) {
                    query.push(("VOICE", voice));
                }

                remote_tts(endpoint_url(&key("url"), &base, "process", &query)?)
            }
            TextToSpeechVariant::Opentts => {
                let voice = ctx.required(&key("voice"))?;
                let base = profile.text_or(&key("url"), DEFAULT_OPENTTS_URL);
                remote_tts(endpoint_url(&key("url"), &base, "api/tts", &[("voice", voice)])?)
            }
            TextToSpeechVariant::Remote => remote_tts(ctx.required(&key("url"))?),
            TextToSpeechVariant::Command => {
                let speak = ctx.user_command(&key("program"), &key("arguments"))?;
                let mut spec = cli_tts(&speak);
                if profile.text(&key("voices_program")).is_some() {
                    let voices =
                        ctx.user_command(&key("voices_program"), &key("voices_arguments"))?;
                    spec = spec.sub_command("--voices-command", &voices);
                }
                spec
            }
        };

        Ok(spec)
    }
}

fn cli_tts(speak: &SubCommand) -> ProcessSpec {
    ProcessSpec::new("rhasspy-tts-cli-hermes").sub_command("--tts-command", speak)
}

fn remote_tts(url: String) -> ProcessSpec {
    ProcessSpec::new("rhasspy-remote-http-hermes").option("--tts-url", url)
}

/// `<base>/<endpoint>?<query>` with the query form-encoded.
///
/// An unparseable base URL omits the stage.
fn endpoint_url(
    base_path: &str,
    base: &str,
    endpoint: &str,
    query: &[(&str, String)],
) -> Result<String, MissingSetting> {
    let mut url = Url::parse(&format!("{}/{endpoint}", base.trim_end_matches('/'))).map_err(|e| {
        MalformedValue::new(base_path, base, e.to_string()).warn();
        MissingSetting::new(base_path)
    })?;
    url.query_pairs_mut()
        .extend_pairs(query.iter().map(|(name, value)| (*name, value.as_str())));

    Ok(url.into())
}

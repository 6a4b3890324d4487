//! Speech to text stage
//!
//! Local decoders (pocketsphinx, kaldi, deepspeech) listen for audio
//! themselves, so they take UDP audio routes and the voice activity
//! settings shared under `command.webrtcvad`. Remote and command variants
//! delegate transcription to `rhasspy-remote-http-hermes`.

use crate::builders::udp_audio::udp_audio_args;
use crate::builders::{
    BuildContext, StageVariant, VariantBuilder, VariantResult, setting, stage_variants,
};
use crate::process::ProcessSpec;
use crate::profile::{Profile, coerce};
use crate::stage::Stage;

/// Voice activity settings under `command.webrtcvad` and their flags
const VOICE_SETTINGS: [(&str, &str); 7] = [
    ("vad_mode", "--voice-sensitivity"),
    ("skip_sec", "--voice-skip-seconds"),
    ("min_sec", "--voice-min-seconds"),
    ("speech_sec", "--voice-speech-seconds"),
    ("silence_sec", "--voice-silence-seconds"),
    ("before_sec", "--voice-before-seconds"),
    ("max_sec", "--voice-max-seconds"),
];

stage_variants! {
    pub enum SpeechToTextVariant {
        Pocketsphinx => "pocketsphinx",
        Kaldi => "kaldi",
        Deepspeech => "deepspeech",
        Remote => "remote",
        Command => "command",
    }
}

#[derive(Debug)]
pub struct SpeechToTextBuilder;

impl VariantBuilder for SpeechToTextBuilder {
    const STAGE: Stage = Stage::SpeechToText;

    type Variant = SpeechToTextVariant;

    fn build_variant(&self, variant: SpeechToTextVariant, ctx: &BuildContext) -> VariantResult {
        let key = |name: &str| setting(Self::STAGE, variant, name);
        let profile = ctx.profile;

        let spec = match variant {
            SpeechToTextVariant::Pocketsphinx => {
                let acoustic_model = ctx.required(&key("acoustic_model"))?;
                let dictionary = ctx.required(&key("dictionary"))?;
                let language_model = ctx.required(&key("language_model"))?;

                ProcessSpec::new("rhasspy-asr-pocketsphinx-hermes")
                    .path_option("--acoustic-model", &profile.read_path(acoustic_model))
                    .path_option("--dictionary", &profile.write_path(dictionary))
                    .path_option("--language-model", &profile.write_path(language_model))
                    .option_if("--base-dictionary", read_path_of(profile, &key("base_dictionary")))
                    .option_if("--g2p-model", read_path_of(profile, &key("g2p_model")))
                    .option_if("--unknown-words", write_path_of(profile, &key("unknown_words")))
                    .option_if("--mix-weight", mix_weight(profile, &key("mix_weight")))
            }
            SpeechToTextVariant::Kaldi => {
                let model_dir = profile.write_path(ctx.required(&key("model_dir"))?);
                let graph = model_dir.join(ctx.required(&key("graph"))?);

                ProcessSpec::new("rhasspy-asr-kaldi-hermes")
                    .option("--model-type", profile.text_or(&key("model_type"), "nnet3"))
                    .path_option("--model-dir", &model_dir)
                    .path_option("--graph-dir", &graph)
            }
            SpeechToTextVariant::Deepspeech => {
                let acoustic_model = ctx.required(&key("acoustic_model"))?;

                ProcessSpec::new("rhasspy-asr-deepspeech-hermes")
                    .path_option("--model", &profile.write_path(acoustic_model))
                    .option_if("--language-model", write_path_of(profile, &key("language_model")))
                    .option_if("--scorer", write_path_of(profile, &key("scorer")))
                    .option_if("--alphabet", read_path_of(profile, &key("alphabet")))
            }
            SpeechToTextVariant::Remote => {
                return Ok(ProcessSpec::new("rhasspy-remote-http-hermes")
                    .option("--asr-url", ctx.required(&key("url"))?));
            }
            SpeechToTextVariant::Command => {
                let transcribe = ctx.user_command(&key("program"), &key("arguments"))?;
                let mut spec = ProcessSpec::new("rhasspy-remote-http-hermes")
                    .sub_command("--asr-command", &transcribe);
                if profile.text(&key("train_program")).is_some() {
                    let train =
                        ctx.user_command(&key("train_program"), &key("train_arguments"))?;
                    spec = spec.sub_command("--asr-train-command", &train);
                }
                return Ok(spec);
            }
        };

        let prefix = format!("{}.{}", Self::STAGE.profile_key(), variant.id());

        Ok(spec
            .flag_if(
                "--open-transcription",
                profile.flag(&key("open_transcription"), false),
            )
            .args(voice_args(profile))
            .args(udp_audio_args(profile, &prefix, ctx.default_site_id()))
            .with_profile_volume())
    }
}

fn read_path_of(profile: &Profile, path: &str) -> Option<String> {
    profile
        .text(path)
        .map(|relative| profile.read_path(relative).display().to_string())
}

fn write_path_of(profile: &Profile, path: &str) -> Option<String> {
    profile
        .text(path)
        .map(|relative| profile.write_path(relative).display().to_string())
}

/// Language model mix weight as a fraction; percentages are scaled down
fn mix_weight(profile: &Profile, path: &str) -> Option<String> {
    let weight = profile.number_opt::<f64>(path)?;
    let weight = if weight > 1.0 { weight / 100.0 } else { weight };
    Some(coerce::format_float(weight))
}

fn voice_args(profile: &Profile) -> Vec<String> {
    VOICE_SETTINGS
        .iter()
        .filter_map(|(name, flag)| {
            profile
                .text(&format!("command.webrtcvad.{name}"))
                .map(|value| [(*flag).to_string(), value])
        })
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_support::{omitted, ready, value_after};
    use crate::test_fixtures::{context, internal_broker, profile_with};
    use serde_json::json;

    fn pocketsphinx() -> serde_json::Value {
        json!({
            "acoustic_model": "acoustic_model",
            "dictionary": "dictionary.txt",
            "language_model": "language_model.txt"
        })
    }

    #[test]
    fn test_pocketsphinx_paths() {
        let profile = profile_with(json!({"speech_to_text": {"pocketsphinx": pocketsphinx()}}));
        let broker = internal_broker();
        let spec = ready(&SpeechToTextBuilder, "pocketsphinx", &context(&profile, &broker));

        assert_eq!(spec.program, "rhasspy-asr-pocketsphinx-hermes");
        assert_eq!(
            value_after(&spec, "--acoustic-model"),
            Some("/system/en/acoustic_model")
        );
        assert_eq!(value_after(&spec, "--dictionary"), Some("/user/en/dictionary.txt"));
        assert_eq!(
            value_after(&spec, "--language-model"),
            Some("/user/en/language_model.txt")
        );
        assert_eq!(value_after(&spec, "--mix-weight"), None);
        assert!(spec.hints.needs_profile_volume);
    }

    #[test]
    fn test_pocketsphinx_missing_dictionary() {
        let profile = profile_with(json!({
            "speech_to_text": {"pocketsphinx": {"acoustic_model": "am", "language_model": "lm"}}
        }));
        let broker = internal_broker();
        assert_eq!(
            omitted(&SpeechToTextBuilder, "pocketsphinx", &context(&profile, &broker)),
            "speech_to_text.pocketsphinx.dictionary"
        );
    }

    #[test]
    fn test_mix_weight_percentage() {
        let mut settings = pocketsphinx();
        settings["mix_weight"] = json!("5");
        let profile = profile_with(json!({"speech_to_text": {"pocketsphinx": settings}}));
        let broker = internal_broker();
        let spec = ready(&SpeechToTextBuilder, "pocketsphinx", &context(&profile, &broker));
        assert_eq!(value_after(&spec, "--mix-weight"), Some("0.05"));

        let mut settings = pocketsphinx();
        settings["mix_weight"] = json!(0.25);
        let profile = profile_with(json!({"speech_to_text": {"pocketsphinx": settings}}));
        let spec = ready(&SpeechToTextBuilder, "pocketsphinx", &context(&profile, &broker));
        assert_eq!(value_after(&spec, "--mix-weight"), Some("0.25"));
    }

    #[test]
    fn test_kaldi_graph_inside_model_dir() {
        let profile = profile_with(json!({
            "speech_to_text": {"kaldi": {"model_dir": "kaldi/model", "graph": "graph"}}
        }));
        let broker = internal_broker();
        let spec = ready(&SpeechToTextBuilder, "kaldi", &context(&profile, &broker));

        assert_eq!(value_after(&spec, "--model-type"), Some("nnet3"));
        assert_eq!(value_after(&spec, "--model-dir"), Some("/user/en/kaldi/model"));
        assert_eq!(value_after(&spec, "--graph-dir"), Some("/user/en/kaldi/model/graph"));
    }

    #[test]
    fn test_voice_activity_and_open_transcription() {
        let profile = profile_with(json!({
            "speech_to_text": {"kaldi": {
                "model_dir": "kaldi/model", "graph": "graph", "open_transcription": "True"
            }},
            "command": {"webrtcvad": {"vad_mode": 3, "silence_sec": 0.5}}
        }));
        let broker = internal_broker();
        let spec = ready(&SpeechToTextBuilder, "kaldi", &context(&profile, &broker));

        assert!(spec.args.contains(&"--open-transcription".to_string()));
        assert_eq!(value_after(&spec, "--voice-sensitivity"), Some("3"));
        assert_eq!(value_after(&spec, "--voice-silence-seconds"), Some("0.5"));
        assert_eq!(value_after(&spec, "--voice-skip-seconds"), None);
    }

    #[test]
    fn test_deepspeech_optional_files() {
        let profile = profile_with(json!({
            "speech_to_text": {"deepspeech": {
                "acoustic_model": "deepspeech/model/output_graph.pbmm",
                "scorer": "deepspeech/scorer"
            }}
        }));
        let broker = internal_broker();
        let spec = ready(&SpeechToTextBuilder, "deepspeech", &context(&profile, &broker));

        assert_eq!(
            value_after(&spec, "--model"),
            Some("/user/en/deepspeech/model/output_graph.pbmm")
        );
        assert_eq!(value_after(&spec, "--scorer"), Some("/user/en/deepspeech/scorer"));
        assert_eq!(value_after(&spec, "--language-model"), None);
    }

    #[test]
    fn test_remote_requires_url() {
        let profile = profile_with(json!({}));
        let broker = internal_broker();
        assert_eq!(
            omitted(&SpeechToTextBuilder, "remote", &context(&profile, &broker)),
            "speech_to_text.remote.url"
        );

        let profile = profile_with(json!({
            "speech_to_text": {"remote": {"url": "http://asr:12101/api/speech-to-text"}},
            "command": {"webrtcvad": {"vad_mode": 3}}
        }));
        let spec = ready(&SpeechToTextBuilder, "remote", &context(&profile, &broker));
        assert_eq!(spec.program, "rhasspy-remote-http-hermes");
        assert_eq!(
            value_after(&spec, "--asr-url"),
            Some("http://asr:12101/api/speech-to-text")
        );
        assert_eq!(value_after(&spec, "--voice-sensitivity"), None);
        assert!(!spec.hints.needs_profile_volume);
    }

    #[test]
    fn test_command_with_training() {
        let profile = profile_with(json!({
            "speech_to_text": {"command": {
                "program": "transcribe.sh",
                "train_program": "train.sh",
                "train_arguments": ["--fast"]
            }}
        }));
        let broker = internal_broker();
        let spec = ready(&SpeechToTextBuilder, "command", &context(&profile, &broker));

        assert_eq!(value_after(&spec, "--asr-command"), Some("transcribe.sh"));
        assert_eq!(value_after(&spec, "--asr-train-command"), Some("train.sh --fast"));
    }
}

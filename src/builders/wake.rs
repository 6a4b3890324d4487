//! Wake word stage

use crate::builders::udp_audio::udp_audio_args;
use crate::builders::wake_models::{ModelSettings, merge_models};
use crate::builders::{
    BuildContext, StageVariant, VariantBuilder, VariantResult, setting, stage_variants,
};
use crate::error::MissingSetting;
use crate::process::ProcessSpec;
use crate::stage::Stage;

const DEFAULT_SNOWBOY_MODEL: &str = "snowboy/snowboy.umdl";

stage_variants! {
    pub enum WakeVariant {
        Porcupine => "porcupine",
        Snowboy => "snowboy",
        Precise => "precise",
        Pocketsphinx => "pocketsphinx",
        Raven => "raven",
        Command => "command",
    }
}

#[derive(Debug)]
pub struct WakeBuilder;

impl VariantBuilder for WakeBuilder {
    const STAGE: Stage = Stage::WakeWord;

    type Variant = WakeVariant;

    fn build_variant(&self, variant: WakeVariant, ctx: &BuildContext) -> VariantResult {
        let key = |name: &str| setting(Self::STAGE, variant, name);
        let profile = ctx.profile;

        let spec = match variant {
            WakeVariant::Porcupine => {
                let library = ctx.required(&key("library_path"))?;
                let model = ctx.required(&key("model_path"))?;
                let keywords = profile.list(&key("keyword_path"));
                if keywords.is_empty() {
                    return Err(MissingSetting::new(key("keyword_path")));
                }

                let mut spec = ProcessSpec::new("rhasspy-wake-porcupine-hermes")
                    .path_option("--library", &profile.read_path(library))
                    .path_option("--model", &profile.read_path(model));
                for keyword in keywords {
                    spec = spec.path_option("--keyword", &profile.read_path(keyword));
                }
                spec.option("--sensitivity", profile.text_or(&key("sensitivity"), "0.5"))
            }
            WakeVariant::Snowboy => {
                let defaults = ModelSettings {
                    sensitivity: profile.text_or(&key("sensitivity"), "0.5"),
                    audio_gain: profile.number_or(&key("audio_gain"), 1.0),
                    apply_frontend: profile.flag(&key("apply_frontend"), false),
                };

                let mut names = profile.list(&key("model"));
                if names.is_empty() {
                    names.push(DEFAULT_SNOWBOY_MODEL.to_string());
                }

                let models = merge_models(
                    &key("model_settings"),
                    &names,
                    &defaults,
                    profile.map(&key("model_settings")).as_ref(),
                );

                let mut spec = ProcessSpec::new("rhasspy-wake-snowboy-hermes");
                for model in models {
                    spec = spec
                        .path_option("--model", &profile.write_path(&model.name))
                        .args(model.settings.tokens());
                }
                spec
            }
            WakeVariant::Precise => {
                let model = ctx.required(&key("model"))?;

                ProcessSpec::new("rhasspy-wake-precise-hermes")
                    .path_option("--model", &profile.read_path(model))
                    .option("--sensitivity", profile.text_or(&key("sensitivity"), "0.5"))
                    .option("--trigger-level", profile.number_or::<u32>(&key("trigger_level"), 3))
                    .option_if(
                        "--engine",
                        profile
                            .text(&key("engine_path"))
                            .map(|engine| profile.read_path(engine).display().to_string()),
                    )
            }
            WakeVariant::Pocketsphinx => {
                let keyphrase = ctx.required(&key("keyphrase"))?;
                let acoustic_model = ctx.required_chain(&[
                    &key("acoustic_model"),
                    "speech_to_text.pocketsphinx.acoustic_model",
                ])?;
                let dictionary = ctx.required_chain(&[
                    &key("dictionary"),
                    "speech_to_text.pocketsphinx.dictionary",
                ])?;

                ProcessSpec::new("rhasspy-wake-pocketsphinx-hermes")
                    .path_option("--acoustic-model", &profile.read_path(acoustic_model))
                    .path_option("--dictionary", &profile.write_path(dictionary))
                    .option("--keyphrase", keyphrase)
                    .option(
                        "--keyphrase-threshold",
                        profile.text_or(&key("threshold"), "1e-40"),
                    )
                    .option_if(
                        "--mllr-matrix",
                        profile
                            .text(&key("mllr_matrix"))
                            .map(|matrix| profile.read_path(matrix).display().to_string()),
                    )
            }
            WakeVariant::Raven => {
                let template_dir = profile.text_or(&key("template_dir"), "raven");

                ProcessSpec::new("rhasspy-wake-raven-hermes")
                    .path_option("--keyword-dir", &profile.write_path(template_dir))
                    .option(
                        "--probability-threshold",
                        profile.text_or(&key("probability_threshold"), "0.5"),
                    )
                    .option(
                        "--minimum-matches",
                        profile.number_or::<u32>(&key("minimum_matches"), 1),
                    )
                    .option(
                        "--vad-sensitivity",
                        profile.number_or::<u8>(&key("vad_sensitivity"), 1),
                    )
            }
            WakeVariant::Command => {
                let wake = ctx.user_command(&key("program"), &key("arguments"))?;
                return Ok(ProcessSpec::new("rhasspy-remote-http-hermes")
                    .sub_command("--wake-command", &wake));
            }
        };

        let prefix = format!("{}.{}", Self::STAGE.profile_key(), variant.id());
        let udp = udp_audio_args(profile, &prefix, ctx.default_site_id());
        Ok(spec.args(udp).with_profile_volume())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_support::{omitted, ready, value_after};
    use crate::test_fixtures::{context, internal_broker, layered_profile, profile_with};
    use serde_json::json;

    #[test]
    fn test_porcupine_defaults() {
        let profile = profile_with(json!({
            "wake": {"porcupine": {
                "library_path": "porcupine/libpv_porcupine.so",
                "model_path": "porcupine/porcupine_params.pv",
                "keyword_path": "porcupine/porcupine.ppn"
            }}
        }));
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "porcupine", &context(&profile, &broker));

        assert_eq!(spec.program, "rhasspy-wake-porcupine-hermes");
        assert_eq!(
            value_after(&spec, "--library"),
            Some("/system/en/porcupine/libpv_porcupine.so")
        );
        assert_eq!(
            value_after(&spec, "--keyword"),
            Some("/system/en/porcupine/porcupine.ppn")
        );
        assert_eq!(value_after(&spec, "--sensitivity"), Some("0.5"));
        assert!(spec.hints.needs_profile_volume);
        assert!(!spec.hints.needs_audio_device);
    }

    #[test]
    fn test_porcupine_multiple_keywords() {
        let profile = profile_with(json!({
            "wake": {"porcupine": {
                "library_path": "/opt/lib.so",
                "model_path": "/opt/params.pv",
                "keyword_path": "a.ppn, b.ppn",
                "sensitivity": "0.7"
            }}
        }));
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "porcupine", &context(&profile, &broker));

        let keywords = spec.args.iter().filter(|a| *a == "--keyword").count();
        assert_eq!(keywords, 2);
        assert_eq!(value_after(&spec, "--library"), Some("/opt/lib.so"));
        assert_eq!(value_after(&spec, "--sensitivity"), Some("0.7"));
    }

    #[test]
    fn test_porcupine_missing_keyword_is_omitted() {
        let profile = profile_with(json!({
            "wake": {"porcupine": {"library_path": "lib.so", "model_path": "params.pv"}}
        }));
        let broker = internal_broker();
        assert_eq!(
            omitted(&WakeBuilder, "porcupine", &context(&profile, &broker)),
            "wake.porcupine.keyword_path"
        );
    }

    #[test]
    fn test_snowboy_model_groups() {
        let profile = profile_with(json!({
            "wake": {"snowboy": {
                "model": "snowboy.umdl,jarvis.umdl",
                "sensitivity": "0.4",
                "model_settings": {"jarvis.umdl": {"sensitivity": "0.8,0.8", "apply_frontend": "true"}}
            }}
        }));
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "snowboy", &context(&profile, &broker));

        let first = spec.args.iter().position(|a| a == "--model").unwrap();
        assert_eq!(
            &spec.args[first..first + 10],
            &[
                "--model",
                "/user/en/snowboy.umdl",
                "0.4",
                "1.0",
                "false",
                "--model",
                "/user/en/jarvis.umdl",
                "0.8,0.8",
                "1.0",
                "true",
            ]
        );
    }

    #[test]
    fn test_snowboy_model_settings_merge_across_layers() {
        let profile = layered_profile(
            json!({"wake": {"snowboy": {
                "model": "a.pmdl,b.pmdl",
                "model_settings": {"a.pmdl": {"sensitivity": "0.9"}}
            }}}),
            json!({"wake": {"snowboy": {"model_settings": {"b.pmdl": {"audio_gain": 2}}}}}),
        );
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "snowboy", &context(&profile, &broker));

        let first = spec.args.iter().position(|a| a == "--model").unwrap();
        assert_eq!(
            &spec.args[first..first + 10],
            &[
                "--model",
                "/user/en/a.pmdl",
                "0.9",
                "1.0",
                "false",
                "--model",
                "/user/en/b.pmdl",
                "0.5",
                "2.0",
                "false",
            ]
        );
    }

    #[test]
    fn test_snowboy_default_model() {
        let profile = profile_with(json!({}));
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "snowboy", &context(&profile, &broker));
        assert_eq!(
            value_after(&spec, "--model"),
            Some("/user/en/snowboy/snowboy.umdl")
        );
    }

    #[test]
    fn test_precise_defaults() {
        let profile = profile_with(json!({"wake": {"precise": {"model": "precise/hey-mycroft.pb"}}}));
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "precise", &context(&profile, &broker));

        assert_eq!(value_after(&spec, "--sensitivity"), Some("0.5"));
        assert_eq!(value_after(&spec, "--trigger-level"), Some("3"));
        assert_eq!(value_after(&spec, "--engine"), None);
    }

    #[test]
    fn test_pocketsphinx_falls_back_to_speech_to_text_settings() {
        let profile = profile_with(json!({
            "wake": {"pocketsphinx": {"keyphrase": "okay rhasspy"}},
            "speech_to_text": {"pocketsphinx": {
                "acoustic_model": "acoustic_model",
                "dictionary": "dictionary.txt"
            }}
        }));
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "pocketsphinx", &context(&profile, &broker));

        assert_eq!(
            value_after(&spec, "--acoustic-model"),
            Some("/system/en/acoustic_model")
        );
        assert_eq!(value_after(&spec, "--dictionary"), Some("/user/en/dictionary.txt"));
        assert_eq!(value_after(&spec, "--keyphrase"), Some("okay rhasspy"));
        assert_eq!(value_after(&spec, "--keyphrase-threshold"), Some("1e-40"));
    }

    #[test]
    fn test_pocketsphinx_without_acoustic_model_is_omitted() {
        let profile = profile_with(json!({"wake": {"pocketsphinx": {"keyphrase": "hey"}}}));
        let broker = internal_broker();
        assert_eq!(
            omitted(&WakeBuilder, "pocketsphinx", &context(&profile, &broker)),
            "wake.pocketsphinx.acoustic_model"
        );
    }

    #[test]
    fn test_raven_defaults() {
        let profile = profile_with(json!({}));
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "raven", &context(&profile, &broker));

        assert_eq!(value_after(&spec, "--keyword-dir"), Some("/user/en/raven"));
        assert_eq!(value_after(&spec, "--probability-threshold"), Some("0.5"));
        assert_eq!(value_after(&spec, "--minimum-matches"), Some("1"));
        assert_eq!(value_after(&spec, "--vad-sensitivity"), Some("1"));
    }

    #[test]
    fn test_udp_audio_for_local_variants() {
        let profile = profile_with(json!({
            "wake": {"raven": {"udp_audio": "12202"}}
        }));
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "raven", &context(&profile, &broker));

        let udp = spec.args.iter().position(|a| a == "--udp-audio").unwrap();
        assert_eq!(&spec.args[udp + 1..udp + 4], &["127.0.0.1", "12202", "default"]);
    }

    #[test]
    fn test_command_variant() {
        let profile = profile_with(json!({
            "wake": {"command": {"program": "/bin/my-wake", "arguments": "--model 'hey there'", "udp_audio": "1"}}
        }));
        let broker = internal_broker();
        let spec = ready(&WakeBuilder, "command", &context(&profile, &broker));

        assert_eq!(spec.program, "rhasspy-remote-http-hermes");
        assert_eq!(
            value_after(&spec, "--wake-command"),
            Some("/bin/my-wake --model 'hey there'")
        );
        assert!(!spec.args.contains(&"--udp-audio".to_string()));
        assert!(!spec.hints.needs_profile_volume);
    }
}

//! Intent recognition stage

use crate::builders::{BuildContext, VariantBuilder, VariantResult, setting, stage_variants};
use crate::process::ProcessSpec;
use crate::stage::Stage;

stage_variants! {
    pub enum IntentVariant {
        Fsticuffs => "fsticuffs",
        Fuzzywuzzy => "fuzzywuzzy",
        Snips => "snips",
        Rasa => "rasa",
        Remote => "remote",
        Command => "command",
    }
}

#[derive(Debug)]
pub struct IntentBuilder;

impl VariantBuilder for IntentBuilder {
    const STAGE: Stage = Stage::IntentRecognition;

    type Variant = IntentVariant;

    fn build_variant(&self, variant: IntentVariant, ctx: &BuildContext) -> VariantResult {
        let key = |name: &str| setting(Self::STAGE, variant, name);
        let profile = ctx.profile;
        let language = || profile.text_chain(&[&key("language"), "language"]);

        let spec = match variant {
            IntentVariant::Fsticuffs => {
                let graph = ctx.required(&key("intent_graph"))?;
                let replace_numbers = profile.flag(&key("replace_numbers"), false);

                ProcessSpec::new("rhasspy-nlu-hermes")
                    .path_option("--intent-graph", &profile.write_path(graph))
                    .flag_if("--no-fuzzy", !profile.flag(&key("fuzzy"), true))
                    .flag_if("--replace-numbers", replace_numbers)
                    .option_if("--language", language().filter(|_| replace_numbers))
                    .flag_if(
                        "--ignore-unknown-words",
                        profile.flag(&key("ignore_unknown_words"), false),
                    )
            }
            IntentVariant::Fuzzywuzzy => {
                let examples = ctx.required(&key("examples_json"))?;

                ProcessSpec::new("rhasspy-fuzzywuzzy-hermes")
                    .path_option("--examples", &profile.write_path(examples))
                    .option_if(
                        "--confidence-threshold",
                        profile.number_opt::<f64>(&key("min_confidence")),
                    )
            }
            IntentVariant::Snips => {
                let language = ctx.required_chain(&[&key("language"), "language"])?;
                let engine_dir = profile.text_or(&key("engine_dir"), "snips/engine");
                let dataset = profile.text_or(&key("dataset_file"), "snips/dataset.yaml");

                ProcessSpec::new("rhasspy-snips-nlu-hermes")
                    .option("--language", language)
                    .path_option("--engine-path", &profile.write_path(engine_dir))
                    .path_option("--dataset-path", &profile.write_path(dataset))
            }
            IntentVariant::Rasa => {
                let url = ctx.required(&key("url"))?;
                let examples =
                    profile.text_or(&key("examples_markdown"), "intent_examples.md");

                ProcessSpec::new("rhasspy-rasa-nlu-hermes")
                    .option("--rasa-url", url)
                    .option("--project-name", profile.text_or(&key("project_name"), "rhasspy"))
                    .path_option("--examples-path", &profile.write_path(examples))
                    .option_if("--rasa-language", language())
            }
            IntentVariant::Remote => {
                return Ok(ProcessSpec::new("rhasspy-remote-http-hermes")
                    .option("--nlu-url", ctx.required(&key("url"))?));
            }
            IntentVariant::Command => {
                let recognize = ctx.user_command(&key("program"), &key("arguments"))?;
                return Ok(ProcessSpec::new("rhasspy-remote-http-hermes")
                    .sub_command("--nlu-command", &recognize));
            }
        };

        Ok(spec.with_profile_volume())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_support::{omitted, ready, value_after};
    use crate::test_fixtures::{context, internal_broker, profile_with};
    use serde_json::json;

    #[test]
    fn test_fsticuffs_defaults() {
        let profile = profile_with(json!({
            "language": "en",
            "intent": {"fsticuffs": {"intent_graph": "intent.pickle.gz"}}
        }));
        let broker = internal_broker();
        let spec = ready(&IntentBuilder, "fsticuffs", &context(&profile, &broker));

        assert_eq!(spec.program, "rhasspy-nlu-hermes");
        assert_eq!(
            value_after(&spec, "--intent-graph"),
            Some("/user/en/intent.pickle.gz")
        );
        assert!(!spec.args.contains(&"--no-fuzzy".to_string()));
        assert!(!spec.args.contains(&"--replace-numbers".to_string()));
        assert_eq!(value_after(&spec, "--language"), None);
        assert!(spec.hints.needs_profile_volume);
    }

    #[test]
    fn test_fsticuffs_strict_with_numbers() {
        let profile = profile_with(json!({
            "language": "de",
            "intent": {"fsticuffs": {
                "intent_graph": "intent.pickle.gz",
                "fuzzy": false,
                "replace_numbers": "true"
            }}
        }));
        let broker = internal_broker();
        let spec = ready(&IntentBuilder, "fsticuffs", &context(&profile, &broker));

        assert!(spec.args.contains(&"--no-fuzzy".to_string()));
        assert!(spec.args.contains(&"--replace-numbers".to_string()));
        assert_eq!(value_after(&spec, "--language"), Some("de"));
    }

    #[test]
    fn test_fsticuffs_missing_graph() {
        let profile = profile_with(json!({"intent": {"fsticuffs": {}}}));
        let broker = internal_broker();
        assert_eq!(
            omitted(&IntentBuilder, "fsticuffs", &context(&profile, &broker)),
            "intent.fsticuffs.intent_graph"
        );
    }

    #[test]
    fn test_fuzzywuzzy_threshold() {
        let profile = profile_with(json!({
            "intent": {"fuzzywuzzy": {"examples_json": "intent_examples.json", "min_confidence": "0.6"}}
        }));
        let broker = internal_broker();
        let spec = ready(&IntentBuilder, "fuzzywuzzy", &context(&profile, &broker));

        assert_eq!(
            value_after(&spec, "--examples"),
            Some("/user/en/intent_examples.json")
        );
        assert_eq!(value_after(&spec, "--confidence-threshold"), Some("0.6"));
    }

    #[test]
    fn test_snips_language_chain() {
        let profile = profile_with(json!({"language": "fr"}));
        let broker = internal_broker();
        let spec = ready(&IntentBuilder, "snips", &context(&profile, &broker));

        assert_eq!(value_after(&spec, "--language"), Some("fr"));
        assert_eq!(value_after(&spec, "--engine-path"), Some("/user/en/snips/engine"));
        assert_eq!(
            value_after(&spec, "--dataset-path"),
            Some("/user/en/snips/dataset.yaml")
        );

        let override_profile = profile_with(json!({
            "language": "fr",
            "intent": {"snips": {"language": "it"}}
        }));
        let spec = ready(&IntentBuilder, "snips", &context(&override_profile, &broker));
        assert_eq!(value_after(&spec, "--language"), Some("it"));
    }

    #[test]
    fn test_snips_without_language_is_omitted() {
        let profile = profile_with(json!({}));
        let broker = internal_broker();
        assert_eq!(
            omitted(&IntentBuilder, "snips", &context(&profile, &broker)),
            "intent.snips.language"
        );
    }

    #[test]
    fn test_rasa_defaults() {
        let profile = profile_with(json!({
            "language": "en",
            "intent": {"rasa": {"url": "http://rasa:5005/"}}
        }));
        let broker = internal_broker();
        let spec = ready(&IntentBuilder, "rasa", &context(&profile, &broker));

        assert_eq!(value_after(&spec, "--rasa-url"), Some("http://rasa:5005/"));
        assert_eq!(value_after(&spec, "--project-name"), Some("rhasspy"));
        assert_eq!(
            value_after(&spec, "--examples-path"),
            Some("/user/en/intent_examples.md")
        );
        assert_eq!(value_after(&spec, "--rasa-language"), Some("en"));
    }

    #[test]
    fn test_remote_and_command() {
        let profile = profile_with(json!({
            "intent": {
                "remote": {"url": "http://nlu/api"},
                "command": {"program": "nlu.py", "arguments": "--json"}
            }
        }));
        let broker = internal_broker();
        let ctx = context(&profile, &broker);

        let remote = ready(&IntentBuilder, "remote", &ctx);
        assert_eq!(value_after(&remote, "--nlu-url"), Some("http://nlu/api"));
        assert!(!remote.hints.needs_profile_volume);

        let command = ready(&IntentBuilder, "command", &ctx);
        assert_eq!(value_after(&command, "--nlu-command"), Some("nlu.py --json"));
    }
}

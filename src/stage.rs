//! Pipeline stages and their selected variants

use std::fmt;

use crate::profile::Profile;

/// Variant id that disables a stage
pub const DUMMY: &str = "dummy";

/// Variant id that delegates a stage to a satellite (also disabled locally)
pub const HERMES: &str = "hermes";

/// One role in the voice assistant pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Microphone,
    WakeWord,
    SpeechToText,
    IntentRecognition,
    IntentHandling,
    Dialogue,
    TextToSpeech,
    Speakers,
    Webhooks,
}

impl Stage {
    /// All stages in pipeline order
    pub const PIPELINE: [Stage; 9] = [
        Stage::Microphone,
        Stage::WakeWord,
        Stage::SpeechToText,
        Stage::IntentRecognition,
        Stage::IntentHandling,
        Stage::Dialogue,
        Stage::TextToSpeech,
        Stage::Speakers,
        Stage::Webhooks,
    ];

    /// Process / service name in the rendered documents
    pub fn name(self) -> &'static str {
        match self {
            Stage::Microphone => "microphone",
            Stage::WakeWord => "wake_word",
            Stage::SpeechToText => "speech_to_text",
            Stage::IntentRecognition => "intent_recognition",
            Stage::IntentHandling => "intent_handling",
            Stage::Dialogue => "dialogue",
            Stage::TextToSpeech => "text_to_speech",
            Stage::Speakers => "speakers",
            Stage::Webhooks => "webhooks",
        }
    }

    /// Top-level profile section
    pub fn profile_key(self) -> &'static str {
        match self {
            Stage::Microphone => "microphone",
            Stage::WakeWord => "wake",
            Stage::SpeechToText => "speech_to_text",
            Stage::IntentRecognition => "intent",
            Stage::IntentHandling => "handle",
            Stage::Dialogue => "dialogue",
            Stage::TextToSpeech => "text_to_speech",
            Stage::Speakers => "sounds",
            Stage::Webhooks => "webhooks",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The variant chosen for a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSelection {
    pub stage: Stage,
    pub variant: String,
}

impl StageSelection {
    /// Read `<key>.system` (default "dummy")
    pub fn from_profile(profile: &Profile, stage: Stage) -> Self {
        let system_path = format!("{}.system", stage.profile_key());
        let variant = match profile.text(&system_path) {
            Some(variant) => variant,
            None if stage == Stage::Webhooks => default_webhooks_variant(profile).to_string(),
            None => DUMMY.to_string(),
        };

        Self { stage, variant }
    }

    /// "dummy" and "hermes" produce no local process
    pub fn is_disabled(&self) -> bool {
        self.variant == DUMMY || self.variant == HERMES
    }
}

/// Webhooks have no system switch of their own in most profiles: they are
/// on as soon as one topic has a hook configured
fn default_webhooks_variant(profile: &Profile) -> &'static str {
    let configured = profile.map(Stage::Webhooks.profile_key()).is_some_and(|hooks| {
        hooks
            .iter()
            .filter(|(topic, _)| !matches!(topic.as_str(), "system" | "satellite_site_ids"))
            .any(|(_, urls)| !crate::profile::coerce::as_list(urls).is_empty())
    });

    if configured { "http" } else { DUMMY }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{layered_profile, profile_with};
    use serde_json::json;

    #[test]
    fn test_pipeline_order() {
        let names: Vec<_> = Stage::PIPELINE.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "microphone",
                "wake_word",
                "speech_to_text",
                "intent_recognition",
                "intent_handling",
                "dialogue",
                "text_to_speech",
                "speakers",
                "webhooks"
            ]
        );
    }

    #[test]
    fn test_selection_defaults_to_dummy() {
        let profile = profile_with(json!({"wake": {"system": "porcupine"}}));

        let wake = StageSelection::from_profile(&profile, Stage::WakeWord);
        assert_eq!(wake.variant, "porcupine");
        assert!(!wake.is_disabled());

        let mic = StageSelection::from_profile(&profile, Stage::Microphone);
        assert_eq!(mic.variant, "dummy");
        assert!(mic.is_disabled());
    }

    #[test]
    fn test_hermes_is_disabled() {
        let profile = profile_with(json!({"microphone": {"system": "hermes"}}));
        assert!(StageSelection::from_profile(&profile, Stage::Microphone).is_disabled());
    }

    #[test]
    fn test_webhooks_selection_follows_configured_hooks() {
        let none = profile_with(json!({"webhooks": {"awake": []}}));
        assert_eq!(
            StageSelection::from_profile(&none, Stage::Webhooks).variant,
            "dummy"
        );

        let some = profile_with(json!({"webhooks": {"hermes/intent/#": ["http://h/i"]}}));
        assert_eq!(
            StageSelection::from_profile(&some, Stage::Webhooks).variant,
            "http"
        );

        let explicit = profile_with(json!({"webhooks": {"system": "dummy", "t": ["u"]}}));
        assert!(StageSelection::from_profile(&explicit, Stage::Webhooks).is_disabled());
    }

    #[test]
    fn test_webhooks_selection_sees_system_hooks_under_user_switch() {
        let profile = layered_profile(
            json!({"webhooks": {"awake": ["http://h/awake"]}}),
            json!({"webhooks": {"satellite_site_ids": "porch"}}),
        );
        assert_eq!(
            StageSelection::from_profile(&profile, Stage::Webhooks).variant,
            "http"
        );
    }
}

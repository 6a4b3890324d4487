//! Multi-model wake word settings
//!
//! `wake.snowboy.model` lists one or more models; `wake.snowboy.model_settings`
//! may override, per model name, the stage-wide sensitivity, audio gain and
//! frontend processing. Merging never mutates the profile: a fresh
//! [`ModelSettings`] is produced for each model.

use serde_json::{Map, Value as JsonValue};

use crate::error::MalformedValue;
use crate::profile::coerce;

/// Per-model detector settings
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    /// Kept as text: snowboy accepts one value per hotword ("0.5,0.45")
    pub sensitivity: String,
    pub audio_gain: f64,
    pub apply_frontend: bool,
}

impl ModelSettings {
    /// Merge per-model `overrides` over `self`; each override wins, anything
    /// absent keeps the stage-wide default
    pub fn merged_with(
        &self,
        path: &str,
        overrides: Option<&Map<String, JsonValue>>,
    ) -> ModelSettings {
        let Some(overrides) = overrides else {
            return self.clone();
        };

        let sensitivity = overrides
            .get("sensitivity")
            .and_then(coerce::as_text)
            .unwrap_or_else(|| self.sensitivity.clone());

        let audio_gain = match overrides.get("audio_gain") {
            None => self.audio_gain,
            Some(value) => coerce::as_number(value).unwrap_or_else(|| {
                MalformedValue::new(
                    format!("{path}.audio_gain"),
                    value.to_string(),
                    "expected a number",
                )
                .warn();
                self.audio_gain
            }),
        };

        let apply_frontend = overrides
            .get("apply_frontend")
            .map_or(self.apply_frontend, coerce::as_bool);

        ModelSettings {
            sensitivity,
            audio_gain,
            apply_frontend,
        }
    }

    /// `sensitivity audio_gain apply_frontend` tokens
    pub fn tokens(&self) -> [String; 3] {
        [
            self.sensitivity.clone(),
            coerce::format_float(self.audio_gain),
            self.apply_frontend.to_string(),
        ]
    }
}

/// One model with its merged settings
#[derive(Debug, Clone, PartialEq)]
pub struct WakeModel {
    pub name: String,
    pub settings: ModelSettings,
}

/// Merge `defaults` into every model of `names`, preserving list order
pub fn merge_models(
    settings_path: &str,
    names: &[String],
    defaults: &ModelSettings,
    model_settings: Option<&Map<String, JsonValue>>,
) -> Vec<WakeModel> {
    names
        .iter()
        .map(|name| {
            let overrides = model_settings
                .and_then(|all| all.get(name))
                .and_then(JsonValue::as_object);
            WakeModel {
                name: name.clone(),
                settings: defaults.merged_with(&format!("{settings_path}.{name}"), overrides),
            }
        })
        .collect()
}

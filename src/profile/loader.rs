//! Profile loading and layer merging
//!
//! Layers, later ones override earlier ones:
//! 1. `<system profiles>/defaults.json` (optional)
//! 2. `<system profiles>/<name>/profile.json`
//! 3. `<user profiles>/<name>/profile.json`
//!
//! 1 and 2 are deep merged into the system layer. The user layer stays
//! separate so lookups can tell which layer a value came from.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use super::Profile;
use crate::error::{self, Result};

const DEFAULTS_FILE: &str = "defaults.json";
const PROFILE_FILE: &str = "profile.json";

/// Profile loader
#[derive(Debug, Clone)]
pub struct ProfileLoader {
    name: String,
    system_profiles_dir: PathBuf,
    user_profiles_dir: PathBuf,
}

impl ProfileLoader {
    pub fn new(
        name: impl Into<String>,
        system_profiles_dir: impl Into<PathBuf>,
        user_profiles_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            system_profiles_dir: system_profiles_dir.into(),
            user_profiles_dir: user_profiles_dir.into(),
        }
    }

    /// Load both layers.
    ///
    /// Fails when neither the system nor the user profile.json exists, or
    /// when any present file is not valid JSON.
    pub fn load(&self) -> Result<Profile> {
        let defaults_path = self.system_profiles_dir.join(DEFAULTS_FILE);
        let system_path = self.system_profiles_dir.join(&self.name).join(PROFILE_FILE);
        let user_path = self.user_profiles_dir.join(&self.name).join(PROFILE_FILE);

        let defaults = read_json(&defaults_path)?;
        let system_profile = read_json(&system_path)?;
        let user_profile = read_json(&user_path)?;

        if system_profile.is_none() && user_profile.is_none() {
            return Err(error::profile::not_found(
                &self.name,
                &[
                    system_path.display().to_string(),
                    user_path.display().to_string(),
                ],
            ));
        }

        tracing::debug!(
            profile = %self.name,
            defaults = defaults.is_some(),
            system = system_profile.is_some(),
            user = user_profile.is_some(),
            "loaded profile layers"
        );

        let system = merge_json_deep(
            defaults.unwrap_or_else(empty_object),
            system_profile.unwrap_or_else(empty_object),
        );

        Ok(Profile::from_layers(
            &self.name,
            &self.system_profiles_dir,
            &self.user_profiles_dir,
            system,
            user_profile.unwrap_or_else(empty_object),
        ))
    }
}

fn empty_object() -> JsonValue {
    JsonValue::Object(serde_json::Map::new())
}

/// Read a JSON file, `None` if it does not exist
fn read_json(path: &Path) -> Result<Option<JsonValue>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| error::profile::read_failed(path.display().to_string(), e.to_string()))?;

    let value = serde_json::from_str(&content)
        .map_err(|e| error::profile::parse_failed(path.display().to_string(), e.to_string()))?;

    Ok(Some(value))
}

/// Deep merge: recursively merge nested objects, anything else is replaced
pub(super) fn merge_json_deep(existing: JsonValue, new: JsonValue) -> JsonValue {
    match (existing, new) {
        (JsonValue::Object(mut existing_map), JsonValue::Object(new_map)) => {
            for (key, new_value) in new_map {
                let merged_value = match existing_map.remove(&key) {
                    Some(existing_value) => merge_json_deep(existing_value, new_value),
                    None => new_value,
                };
                existing_map.insert(key, merged_value);
            }
            JsonValue::Object(existing_map)
        }
        // Lists in a profile are whole settings, the later layer wins
        (_, new) => new,
    }
}

//! Two-layer profile store
//!
//! A profile is addressed by dotted paths (`wake.porcupine.sensitivity`).
//! Every lookup consults the user layer first, then the system layer
//! (built-in defaults merged with the shipped profile), then falls back to
//! the caller's default. The store is read-only once loaded.
//!
//! Two path resolutions are distinguished:
//! - [`Profile::read_path`] for assets that already exist and may live in
//!   either the user or the system profile directory
//! - [`Profile::write_path`] for artifacts the pipeline creates itself
//!   (trained graphs, downloaded models); always the user profile directory

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::{Map, Value as JsonValue};

use crate::error::MalformedValue;

pub mod coerce;
pub mod loader;

pub use loader::ProfileLoader;

use loader::merge_json_deep;

/// A loaded profile
#[derive(Debug, Clone)]
pub struct Profile {
    name: String,
    system_profiles_dir: PathBuf,
    user_profiles_dir: PathBuf,
    system: JsonValue,
    user: JsonValue,
}

impl Profile {
    /// Create a profile from already-loaded layers
    pub fn from_layers(
        name: impl Into<String>,
        system_profiles_dir: impl Into<PathBuf>,
        user_profiles_dir: impl Into<PathBuf>,
        system: JsonValue,
        user: JsonValue,
    ) -> Self {
        Self {
            name: name.into(),
            system_profiles_dir: system_profiles_dir.into(),
            user_profiles_dir: user_profiles_dir.into(),
            system,
            user,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<system profiles>/<name>`
    pub fn system_dir(&self) -> PathBuf {
        self.system_profiles_dir.join(&self.name)
    }

    /// `<user profiles>/<name>`, where generated files are written
    pub fn user_dir(&self) -> PathBuf {
        self.user_profiles_dir.join(&self.name)
    }

    /// Raw value at a dotted path, user layer first
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        lookup(&self.user, path)
            .filter(|v| !v.is_null())
            .or_else(|| lookup(&self.system, path).filter(|v| !v.is_null()))
    }

    /// Non-blank text value
    pub fn text(&self, path: &str) -> Option<String> {
        self.get(path).and_then(coerce::as_text)
    }

    /// Non-blank text value, or `default`
    pub fn text_or(&self, path: &str, default: &str) -> String {
        self.text(path).unwrap_or_else(|| default.to_string())
    }

    /// First non-blank text value along a fallback chain of paths
    pub fn text_chain(&self, paths: &[&str]) -> Option<String> {
        paths.iter().find_map(|path| self.text(path))
    }

    pub fn flag(&self, path: &str, default: bool) -> bool {
        self.get(path).map_or(default, coerce::as_bool)
    }

    pub fn list(&self, path: &str) -> Vec<String> {
        self.get(path).map(coerce::as_list).unwrap_or_default()
    }

    /// Section at a dotted path. When both layers hold an object there, the
    /// user section is deep merged over the system section.
    pub fn map(&self, path: &str) -> Option<Map<String, JsonValue>> {
        let system = lookup(&self.system, path).filter(|v| !v.is_null());
        let user = lookup(&self.user, path).filter(|v| !v.is_null());

        match (system, user) {
            (Some(system @ JsonValue::Object(_)), Some(user @ JsonValue::Object(_))) => {
                match merge_json_deep(system.clone(), user.clone()) {
                    JsonValue::Object(merged) => Some(merged),
                    _ => None,
                }
            }
            (system, user) => user.or(system).and_then(JsonValue::as_object).cloned(),
        }
    }

    /// Numeric value.
    ///
    /// `Ok(None)` when absent, `Err` when present but not a number of type `T`.
    pub fn number<T: FromStr>(&self, path: &str) -> Result<Option<T>, MalformedValue> {
        match self.get(path) {
            None => Ok(None),
            Some(value) => coerce::as_number(value).map(Some).ok_or_else(|| {
                MalformedValue::new(
                    path,
                    coerce::as_text(value).unwrap_or_else(|| value.to_string()),
                    format!("expected a {}", std::any::type_name::<T>()),
                )
            }),
        }
    }

    /// Numeric value, or `default` when absent. Malformed values are logged
    /// and replaced by `default`.
    pub fn number_or<T: FromStr>(&self, path: &str, default: T) -> T {
        match self.number(path) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(malformed) => {
                malformed.warn();
                default
            }
        }
    }

    /// Optional numeric value. Malformed values are logged and dropped.
    pub fn number_opt<T: FromStr>(&self, path: &str) -> Option<T> {
        self.number(path).unwrap_or_else(|malformed| {
            malformed.warn();
            None
        })
    }

    /// Resolve a path to an existing asset: the user profile directory when
    /// the file exists there, the system profile directory otherwise
    pub fn read_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            return relative.to_path_buf();
        }

        let user_path = self.user_dir().join(relative);
        if user_path.exists() {
            user_path
        } else {
            self.system_dir().join(relative)
        }
    }

    /// Resolve a path to an artifact the pipeline writes (user profile directory)
    pub fn write_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.user_dir().join(relative)
        }
    }
}

/// Walk a dotted path through nested objects
fn lookup<'a>(root: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.')
        .try_fold(root, |node, key| node.as_object()?.get(key))
}

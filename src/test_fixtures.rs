//! Test fixtures shared by the unit tests.
//!
//! ```ignore
//! use crate::test_fixtures::{profile_with, context};
//!
//! let profile = profile_with(json!({"wake": {"system": "porcupine"}}));
//! let broker = internal_broker();
//! let ctx = context(&profile, &broker);
//! ```

#![allow(clippy::expect_used)]

use serde_json::Value as JsonValue;
use tempfile::TempDir;

use crate::broker::MqttBrokerConfig;
use crate::builders::BuildContext;
use crate::profile::Profile;

/// System profiles directory used by in-memory profiles
pub const SYSTEM_DIR: &str = "/system";

/// User profiles directory used by in-memory profiles
pub const USER_DIR: &str = "/user";

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Profile "en" whose system layer is `system` and whose user layer is empty
pub fn profile_with(system: JsonValue) -> Profile {
    layered_profile(system, JsonValue::Object(serde_json::Map::new()))
}

/// Profile "en" with explicit system and user layers
pub fn layered_profile(system: JsonValue, user: JsonValue) -> Profile {
    Profile::from_layers("en", SYSTEM_DIR, USER_DIR, system, user)
}

/// Internal broker on the default local port
pub fn internal_broker() -> MqttBrokerConfig {
    MqttBrokerConfig::internal(12183)
}

/// Build context with the single site id "default"
pub fn context<'a>(profile: &'a Profile, broker: &'a MqttBrokerConfig) -> BuildContext<'a> {
    BuildContext::new(profile, vec!["default".to_string()], broker)
}

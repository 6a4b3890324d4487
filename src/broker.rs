//! MQTT broker resolution
//!
//! Either the profile points at an externally managed broker (`mqtt.enabled`)
//! and its connection settings are used verbatim, or the compiler runs its
//! own mosquitto on a local port and every stage is pinned to it.

use crate::process::ProcessSpec;
use crate::profile::Profile;

/// Host every stage uses to reach the internal broker
pub const INTERNAL_BROKER_HOST: &str = "localhost";

/// Default port of the internal broker
pub const DEFAULT_LOCAL_PORT: u16 = 12183;

const DEFAULT_EXTERNAL_HOST: &str = "localhost";
const DEFAULT_EXTERNAL_PORT: u16 = 1883;
const BROKER_PROGRAM: &str = "mosquitto";

/// Who manages the broker process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerMode {
    /// Started and owned by the generated topology
    Internal,
    /// Already running elsewhere
    External,
}

/// TLS settings for an external broker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    pub enabled: bool,
    pub ca_certs: Option<String>,
    pub cert_reqs: Option<String>,
    pub certfile: Option<String>,
    pub keyfile: Option<String>,
    pub ciphers: Option<String>,
    pub version: Option<String>,
}

impl TlsConfig {
    fn from_profile(profile: &Profile) -> Self {
        let path = |key: &str| {
            profile
                .text(&format!("mqtt.tls.{key}"))
                .map(|p| profile.read_path(p).display().to_string())
        };

        Self {
            enabled: profile.flag("mqtt.tls.enabled", false),
            ca_certs: path("ca_certs"),
            cert_reqs: profile.text("mqtt.tls.cert_reqs"),
            certfile: path("certfile"),
            keyfile: path("keyfile"),
            ciphers: profile.text("mqtt.tls.ciphers"),
            version: profile.text("mqtt.tls.version"),
        }
    }
}

/// Connection parameters every stage receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttBrokerConfig {
    pub mode: BrokerMode,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls: Option<TlsConfig>,
}

impl MqttBrokerConfig {
    /// Internal broker on `port`: loopback host, no credentials, no TLS
    pub fn internal(port: u16) -> Self {
        Self {
            mode: BrokerMode::Internal,
            host: INTERNAL_BROKER_HOST.to_string(),
            port,
            username: None,
            password: None,
            tls: None,
        }
    }

    /// Resolve the broker from `mqtt.*` settings
    pub fn resolve(profile: &Profile, local_port: u16) -> Self {
        if !profile.flag("mqtt.enabled", false) {
            tracing::debug!(port = local_port, "using internal MQTT broker");
            return Self::internal(local_port);
        }

        let username = profile.text("mqtt.username");
        let password = username
            .as_ref()
            .map(|_| profile.text_or("mqtt.password", ""));
        let tls = TlsConfig::from_profile(profile);

        let config = Self {
            mode: BrokerMode::External,
            host: profile.text_or("mqtt.host", DEFAULT_EXTERNAL_HOST),
            port: profile.number_or("mqtt.port", DEFAULT_EXTERNAL_PORT),
            username,
            password,
            tls: tls.enabled.then_some(tls),
        };

        tracing::debug!(
            host = %config.host,
            port = config.port,
            tls = config.tls.is_some(),
            "using external MQTT broker"
        );

        config
    }

    /// The broker process to run, only in internal mode
    pub fn process(&self) -> Option<ProcessSpec> {
        match self.mode {
            BrokerMode::Internal => {
                Some(ProcessSpec::broker(BROKER_PROGRAM).option("-p", self.port))
            }
            BrokerMode::External => None,
        }
    }
}

//! docker-compose document
//!
//! Each process becomes one service. Stage images are named after the
//! program (`rhasspy/<program>`) and run the program's arguments as their
//! command; the broker runs the stock mosquitto image.

use serde::{Serialize, Serializer};

use crate::error::{self, Result};
use crate::process::ProcessSpec;
use crate::render::BROKER_SERVICE;
use crate::topology::ServiceTopology;

const COMPOSE_VERSION: &str = "2";
const IMAGE_PREFIX: &str = "rhasspy";
const BROKER_IMAGE: &str = "eclipse-mosquitto";
const SOUND_DEVICE: &str = "/dev/snd:/dev/snd";

#[derive(Debug, Serialize)]
struct ComposeDocument {
    version: &'static str,
    #[serde(serialize_with = "ordered_services")]
    services: Vec<(String, ServiceDescriptor)>,
}

/// One compose service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub image: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,

    pub command: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,

    pub tty: bool,
}

impl ServiceDescriptor {
    fn broker(spec: &ProcessSpec) -> Self {
        Self {
            image: BROKER_IMAGE.to_string(),
            entrypoint: Some(spec.program.clone()),
            command: spec.args_line(),
            depends_on: Vec::new(),
            devices: Vec::new(),
            volumes: Vec::new(),
            tty: true,
        }
    }

    fn stage(spec: &ProcessSpec, topology: &ServiceTopology) -> Self {
        let depends_on = if spec.requires_broker && topology.broker.is_some() {
            vec![BROKER_SERVICE.to_string()]
        } else {
            Vec::new()
        };

        let devices = if spec.hints.needs_audio_device {
            vec![SOUND_DEVICE.to_string()]
        } else {
            Vec::new()
        };

        let volumes = if spec.hints.needs_profile_volume {
            topology
                .profile_mounts
                .iter()
                .map(|dir| format!("{0}:{0}", dir.display()))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            image: format!("{IMAGE_PREFIX}/{}", spec.program),
            entrypoint: None,
            command: spec.args_line(),
            depends_on,
            devices,
            volumes,
            tty: true,
        }
    }
}

/// Service descriptors in topology order, broker first
pub fn services(topology: &ServiceTopology) -> Vec<(String, ServiceDescriptor)> {
    let broker = topology
        .broker
        .iter()
        .map(|spec| (BROKER_SERVICE.to_string(), ServiceDescriptor::broker(spec)));

    let stages = topology.stages.iter().map(|(stage, spec)| {
        (
            stage.name().to_string(),
            ServiceDescriptor::stage(spec, topology),
        )
    });

    broker.chain(stages).collect()
}

/// Render a docker-compose document
///
/// # Errors
///
/// Returns `CompileError::RenderFailed` if YAML serialization fails.
pub fn render_compose(topology: &ServiceTopology) -> Result<String> {
    let document = ComposeDocument {
        version: COMPOSE_VERSION,
        services: services(topology),
    };

    serde_yaml::to_string(&document)
        .map_err(|e| error::render::render_failed("compose", e.to_string()))
}

fn ordered_services<S: Serializer>(
    services: &[(String, ServiceDescriptor)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(services.iter().map(|(name, service)| (name, service)))
}

//! Topology assembly
//!
//! Resolves the broker, then walks the pipeline stages in order and asks
//! each stage's builder for a process. The result is everything the
//! renderers need; rendering itself does no profile lookups.

use std::path::PathBuf;

use crate::broker::MqttBrokerConfig;
use crate::builders::{BuildContext, BuilderRegistry, StageOutcome};
use crate::error::Result;
use crate::process::ProcessSpec;
use crate::profile::Profile;
use crate::site_ids::SiteIdSet;
use crate::stage::{Stage, StageSelection};

/// The processes of one compiled profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTopology {
    /// Present only when the broker is internal
    pub broker: Option<ProcessSpec>,

    /// Enabled stages in pipeline order
    pub stages: Vec<(Stage, ProcessSpec)>,

    /// Profile directories mounted into containers that need them
    pub profile_mounts: Vec<PathBuf>,
}

impl ServiceTopology {
    /// Number of processes, broker included
    pub fn process_count(&self) -> usize {
        self.stages.len() + usize::from(self.broker.is_some())
    }
}

/// Builds a [`ServiceTopology`] from a loaded profile
#[derive(Debug)]
pub struct TopologyAssembler<'a> {
    registry: &'a BuilderRegistry,
    local_port: u16,
}

impl<'a> TopologyAssembler<'a> {
    pub fn new(registry: &'a BuilderRegistry, local_port: u16) -> Self {
        Self {
            registry,
            local_port,
        }
    }

    /// Assemble every enabled stage
    ///
    /// Disabled stages (`dummy`, `hermes`) and stages missing a mandatory
    /// setting are left out.
    ///
    /// # Errors
    ///
    /// Returns the first fatal builder error (an unsupported variant). No
    /// partial topology is returned.
    pub fn assemble(&self, profile: &Profile) -> Result<ServiceTopology> {
        let broker = MqttBrokerConfig::resolve(profile, self.local_port);

        let mut stages = Vec::new();
        for stage in Stage::PIPELINE {
            let selection = StageSelection::from_profile(profile, stage);
            if selection.is_disabled() {
                tracing::debug!(stage = %stage, variant = %selection.variant, "stage disabled");
                continue;
            }

            let Some(builder) = self.registry.get(stage) else {
                tracing::warn!(stage = %stage, "no builder registered, skipping");
                continue;
            };

            let site_ids = SiteIdSet::for_stage(profile, stage.profile_key()).effective();
            let ctx = BuildContext::new(profile, site_ids, &broker);

            match builder.build(&selection.variant, &ctx)? {
                StageOutcome::Ready(spec) => {
                    tracing::debug!(stage = %stage, program = %spec.program, "stage ready");
                    stages.push((stage, spec));
                }
                StageOutcome::Omitted(_) => {}
            }
        }

        Ok(ServiceTopology {
            broker: broker.process(),
            stages,
            profile_mounts: vec![profile.user_dir(), profile.system_dir()],
        })
    }
}

//! Site id resolution
//!
//! Every stage listens for the profile-wide master site ids plus the
//! satellite site ids configured for that stage alone.

use crate::profile::Profile;

const MASTER_SITE_IDS: &str = "mqtt.site_id";
const DEFAULT_SITE_ID: &str = "default";

/// Master and satellite site ids for one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdSet {
    /// Profile-wide, never empty
    pub master: Vec<String>,

    /// Stage-specific, may be empty
    pub satellites: Vec<String>,
}

impl SiteIdSet {
    pub fn new(master: Vec<String>, satellites: Vec<String>) -> Self {
        let mut master = non_blank(master);
        if master.is_empty() {
            master.push(DEFAULT_SITE_ID.to_string());
        }

        Self {
            master,
            satellites: non_blank(satellites),
        }
    }

    /// Master site ids from `mqtt.site_id` and satellites from
    /// `<stage key>.satellite_site_ids`
    pub fn for_stage(profile: &Profile, stage_key: &str) -> Self {
        Self::new(
            profile.list(MASTER_SITE_IDS),
            profile.list(&format!("{stage_key}.satellite_site_ids")),
        )
    }

    /// `master ++ satellites`, order preserved, blanks removed
    pub fn effective(&self) -> Vec<String> {
        self.master
            .iter()
            .chain(self.satellites.iter())
            .cloned()
            .collect()
    }
}

fn non_blank(ids: Vec<String>) -> Vec<String> {
    ids.into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

//! UDP audio routing
//!
//! Stages that consume audio can receive it over UDP instead of MQTT. The
//! setting is a comma-separated list of colon tuples:
//!
//! ```text
//! 12202                      port only: loopback host, stage's first site id
//! 192.168.1.5:12202          host and port, stage's first site id
//! 192.168.1.5:12202:porch    host, port and site id
//! ```
//!
//! A tuple that does not parse is logged and skipped; the others still apply.

use std::collections::HashSet;

use crate::error::MalformedValue;
use crate::profile::Profile;

/// Host used when a tuple only names a port
pub const DEFAULT_UDP_HOST: &str = "127.0.0.1";

/// One UDP audio source mapped to a site id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpAudioRoute {
    pub host: String,
    pub port: u16,
    pub site_id: String,
}

/// Parse every tuple of `raw`, keeping per-tuple failures
pub fn parse_routes(
    path: &str,
    raw: &str,
    default_site_id: &str,
) -> Vec<Result<UdpAudioRoute, MalformedValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|tuple| !tuple.is_empty())
        .map(|tuple| parse_route(path, tuple, default_site_id))
        .collect()
}

fn parse_route(
    path: &str,
    tuple: &str,
    default_site_id: &str,
) -> Result<UdpAudioRoute, MalformedValue> {
    let fields: Vec<&str> = tuple.split(':').map(str::trim).collect();

    let (host, port, site_id) = match fields.as_slice() {
        [port] => (DEFAULT_UDP_HOST, *port, default_site_id),
        [host, port] => (*host, *port, default_site_id),
        [host, port, site_id] => (*host, *port, *site_id),
        _ => {
            return Err(MalformedValue::new(
                path,
                tuple,
                "expected port, host:port or host:port:siteId",
            ));
        }
    };

    let port = port
        .parse::<u16>()
        .map_err(|_| MalformedValue::new(path, tuple, format!("port '{port}' is not a number")))?;

    if host.is_empty() || site_id.is_empty() {
        return Err(MalformedValue::new(path, tuple, "empty host or site id"));
    }

    Ok(UdpAudioRoute {
        host: host.to_string(),
        port,
        site_id: site_id.to_string(),
    })
}

/// Arguments for `<prefix>.udp_audio`, `<prefix>.udp_raw_audio` and
/// `<prefix>.udp_forward_mqtt`
///
/// Each valid route emits `--udp-audio host port siteId`. Sites listed in
/// `udp_raw_audio` additionally get `--udp-raw-audio siteId` and sites in
/// `udp_forward_mqtt` get `--udp-forward-mqtt siteId`, once per site, in
/// route order.
pub fn udp_audio_args(profile: &Profile, prefix: &str, default_site_id: &str) -> Vec<String> {
    let path = format!("{prefix}.udp_audio");
    let Some(raw) = profile.text(&path) else {
        return Vec::new();
    };

    let routes: Vec<UdpAudioRoute> = parse_routes(&path, &raw, default_site_id)
        .into_iter()
        .filter_map(|route| route.map_err(|malformed| malformed.warn()).ok())
        .collect();

    let raw_sites = profile.list(&format!("{prefix}.udp_raw_audio"));
    let forward_sites = profile.list(&format!("{prefix}.udp_forward_mqtt"));

    let mut args = Vec::new();
    for route in &routes {
        args.extend([
            "--udp-audio".to_string(),
            route.host.clone(),
            route.port.to_string(),
            route.site_id.clone(),
        ]);
    }

    let mut seen = HashSet::new();
    for route in &routes {
        if !seen.insert(route.site_id.as_str()) {
            continue;
        }
        if raw_sites.contains(&route.site_id) {
            args.extend(["--udp-raw-audio".to_string(), route.site_id.clone()]);
        }
        if forward_sites.contains(&route.site_id) {
            args.extend(["--udp-forward-mqtt".to_string(), route.site_id.clone()]);
        }
    }

    args
}

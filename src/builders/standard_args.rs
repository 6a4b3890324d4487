//! Arguments every stage process receives
//!
//! Order: debug flag, broker host/port, one `--site-id` per site, broker
//! credentials, TLS flag and settings, log format. Absent settings emit
//! nothing, never an empty placeholder.

use crate::broker::MqttBrokerConfig;

/// Standard arguments for a stage listening on `site_ids`
pub fn standard_args(
    site_ids: &[String],
    broker: &MqttBrokerConfig,
    log_format: Option<&str>,
) -> Vec<String> {
    let mut args = vec![
        "--debug".to_string(),
        "--host".to_string(),
        broker.host.clone(),
        "--port".to_string(),
        broker.port.to_string(),
    ];

    for site_id in site_ids.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        args.push("--site-id".to_string());
        args.push(site_id.to_string());
    }

    if let Some(username) = &broker.username {
        args.push("--username".to_string());
        args.push(username.clone());
        args.push("--password".to_string());
        args.push(broker.password.clone().unwrap_or_default());
    }

    if let Some(tls) = broker.tls.as_ref().filter(|tls| tls.enabled) {
        args.push("--tls".to_string());

        let options = [
            ("--tls-ca-certs", &tls.ca_certs),
            ("--tls-cert-reqs", &tls.cert_reqs),
            ("--tls-certfile", &tls.certfile),
            ("--tls-keyfile", &tls.keyfile),
            ("--tls-ciphers", &tls.ciphers),
            ("--tls-version", &tls.version),
        ];
        for (flag, value) in options {
            if let Some(value) = value {
                args.push(flag.to_string());
                args.push(value.clone());
            }
        }
    }

    if let Some(format) = log_format {
        args.push("--log-format".to_string());
        args.push(format.to_string());
    }

    args
}

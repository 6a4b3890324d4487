//! Webhooks stage
//!
//! Every key under `webhooks` other than the stage switches is an event name
//! mapped to one URL or a list of URLs.

use crate::builders::{BuildContext, VariantBuilder, VariantResult, stage_variants};
use crate::error::{MalformedValue, MissingSetting};
use crate::process::ProcessSpec;
use crate::profile::coerce;
use crate::stage::Stage;

/// Keys under `webhooks` that configure the stage rather than name a hook
const RESERVED_KEYS: [&str; 2] = ["system", "satellite_site_ids"];

stage_variants! {
    pub enum WebhooksVariant {
        Http => "http",
    }
}

#[derive(Debug)]
pub struct WebhooksBuilder;

impl VariantBuilder for WebhooksBuilder {
    const STAGE: Stage = Stage::Webhooks;

    type Variant = WebhooksVariant;

    fn build_variant(&self, variant: WebhooksVariant, ctx: &BuildContext) -> VariantResult {
        let WebhooksVariant::Http = variant;
        let section = Self::STAGE.profile_key();

        let mut hooks: Vec<(String, String)> = Vec::new();
        if let Some(configured) = ctx.profile.map(section) {
            let mut topics: Vec<&String> = configured
                .keys()
                .filter(|topic| !RESERVED_KEYS.contains(&topic.as_str()))
                .collect();
            topics.sort();

            for topic in topics {
                let path = format!("{section}.{topic}");
                for url in coerce::as_list(&configured[topic.as_str()]) {
                    if is_http_url(&url) {
                        hooks.push((topic.clone(), url));
                    } else {
                        MalformedValue::new(&path, url, "expected an http(s) URL").warn();
                    }
                }
            }
        }

        if hooks.is_empty() {
            return Err(MissingSetting::new(section));
        }

        Ok(hooks
            .into_iter()
            .fold(ProcessSpec::new("rhasspy-remote-http-hermes"), |spec, (topic, url)| {
                spec.arg("--webhook").arg(topic).arg(url)
            }))
    }
}

fn is_http_url(url: &str) -> bool {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty())
}

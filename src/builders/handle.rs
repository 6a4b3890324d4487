//! Intent handling stage
//!
//! The Home Assistant variant reads its connection settings from the
//! top-level `home_assistant` section shared with the rest of the profile.

use crate::builders::{BuildContext, VariantBuilder, VariantResult, setting, stage_variants};
use crate::error::MalformedValue;
use crate::process::ProcessSpec;
use crate::stage::Stage;

const HANDLE_TYPES: [&str; 2] = ["event", "intent"];

stage_variants! {
    pub enum HandleVariant {
        Hass => "hass",
        Remote => "remote",
        Command => "command",
    }
}

#[derive(Debug)]
pub struct HandleBuilder;

impl VariantBuilder for HandleBuilder {
    const STAGE: Stage = Stage::IntentHandling;

    type Variant = HandleVariant;

    fn build_variant(&self, variant: HandleVariant, ctx: &BuildContext) -> VariantResult {
        let key = |name: &str| setting(Self::STAGE, variant, name);
        let profile = ctx.profile;

        match variant {
            HandleVariant::Hass => {
                let url = ctx.required("home_assistant.url")?;

                let handle_type = match profile.text(&key("handle_type")) {
                    None => HANDLE_TYPES[0].to_string(),
                    Some(kind) if HANDLE_TYPES.contains(&kind.as_str()) => kind,
                    Some(kind) => {
                        MalformedValue::new(key("handle_type"), kind, "expected event or intent")
                            .warn();
                        HANDLE_TYPES[0].to_string()
                    }
                };

                let mut spec = ProcessSpec::new("rhasspy-homeassistant-hermes")
                    .option("--url", url)
                    .option("--handle-type", handle_type);

                // A long-lived access token replaces the legacy API password
                if let Some(token) = profile.text("home_assistant.access_token") {
                    spec = spec.option("--access-token", token);
                } else if let Some(password) = profile.text("home_assistant.api_password") {
                    spec = spec.option("--api-password", password);
                }

                if let Some(pem_file) = profile.text("home_assistant.pem_file") {
                    spec = spec
                        .path_option("--pem-file", &profile.read_path(pem_file))
                        .with_profile_volume();
                }

                Ok(spec.option_if(
                    "--event-type-format",
                    profile.text("home_assistant.event_type_format"),
                ))
            }
            HandleVariant::Remote => Ok(ProcessSpec::new("rhasspy-remote-http-hermes")
                .option("--handle-url", ctx.required(&key("url"))?)),
            HandleVariant::Command => {
                let handle = ctx.user_command(&key("program"), &key("arguments"))?;
                Ok(ProcessSpec::new("rhasspy-remote-http-hermes")
                    .sub_command("--handle-command", &handle))
            }
        }
    }
}

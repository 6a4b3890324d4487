//! Microphone stage
//!
//! - **arecord**: ALSA recording through `rhasspy-microphone-cli-hermes`
//! - **pyaudio**: PortAudio input device
//! - **command**: any program writing raw audio to stdout

use crate::builders::{
    BuildContext, VariantBuilder, VariantResult, setting, stage_variants,
};
use crate::process::{ProcessSpec, SubCommand};
use crate::stage::Stage;

const SAMPLE_RATE: u32 = 16000;
const SAMPLE_WIDTH: u32 = 2;
const CHANNELS: u32 = 1;

stage_variants! {
    pub enum MicrophoneVariant {
        Arecord => "arecord",
        Pyaudio => "pyaudio",
        Command => "command",
    }
}

#[derive(Debug)]
pub struct MicrophoneBuilder;

impl VariantBuilder for MicrophoneBuilder {
    const STAGE: Stage = Stage::Microphone;

    type Variant = MicrophoneVariant;

    fn build_variant(&self, variant: MicrophoneVariant, ctx: &BuildContext) -> VariantResult {
        let key = |name: &str| setting(Self::STAGE, variant, name);

        let spec = match variant {
            MicrophoneVariant::Arecord => {
                let mut record = SubCommand::new("arecord").args([
                    "-q", "-r", "16000", "-f", "S16_LE", "-c", "1", "-t", "raw",
                ]);
                if let Some(device) = ctx.profile.text(&key("device")) {
                    record = record.arg("-D").arg(device);
                }

                ProcessSpec::new("rhasspy-microphone-cli-hermes")
                    .args(audio_format(SAMPLE_RATE, SAMPLE_WIDTH, CHANNELS))
                    .sub_command("--record-command", &record)
                    .sub_command("--list-command", &SubCommand::new("arecord").arg("-L"))
            }
            MicrophoneVariant::Pyaudio => {
                let frames_per_buffer =
                    ctx.profile
                        .number_opt::<u32>(&key("frames_per_buffer"))
                        .or_else(|| {
                            // chunk_size is in bytes, pyaudio wants frames
                            ctx.profile
                                .number_opt::<u32>(&key("chunk_size"))
                                .map(|bytes| bytes / (SAMPLE_WIDTH * CHANNELS))
                                .filter(|frames| *frames > 0)
                        });

                ProcessSpec::new("rhasspy-microphone-pyaudio-hermes")
                    .args(audio_format(SAMPLE_RATE, SAMPLE_WIDTH, CHANNELS))
                    .option_if(
                        "--device-index",
                        ctx.profile.number_opt::<u32>(&key("device")),
                    )
                    .option_if("--frames-per-buffer", frames_per_buffer)
            }
            MicrophoneVariant::Command => {
                let record = ctx.user_command(&key("record_program"), &key("record_arguments"))?;

                let sample_rate = ctx.profile.number_or(&key("sample_rate"), SAMPLE_RATE);
                let sample_width = ctx.profile.number_or(&key("sample_width"), SAMPLE_WIDTH);
                let channels = ctx.profile.number_or(&key("channels"), CHANNELS);

                let mut spec = ProcessSpec::new("rhasspy-microphone-cli-hermes")
                    .args(audio_format(sample_rate, sample_width, channels))
                    .sub_command("--record-command", &record);

                if ctx.profile.text(&key("list_program")).is_some() {
                    let list = ctx.user_command(&key("list_program"), &key("list_arguments"))?;
                    spec = spec.sub_command("--list-command", &list);
                }
                if ctx.profile.text(&key("test_program")).is_some() {
                    let test = ctx.user_command(&key("test_program"), &key("test_arguments"))?;
                    spec = spec.sub_command("--test-command", &test);
                }
                spec
            }
        };

        let udp_port = ctx.profile.number_opt::<u16>(&key("udp_audio_port"));
        let spec = match udp_port {
            Some(port) => spec
                .option(
                    "--udp-audio-host",
                    ctx.profile
                        .text_or(&key("udp_audio_host"), super::udp_audio::DEFAULT_UDP_HOST),
                )
                .option("--udp-audio-port", port),
            None => spec,
        };

        Ok(spec.with_audio_device())
    }
}

fn audio_format(sample_rate: u32, sample_width: u32, channels: u32) -> Vec<String> {
    vec![
        "--sample-rate".to_string(),
        sample_rate.to_string(),
        "--sample-width".to_string(),
        sample_width.to_string(),
        "--channels".to_string(),
        channels.to_string(),
    ]
}

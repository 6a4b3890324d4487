//! supervisord configuration

use crate::process::ProcessSpec;
use crate::render::BROKER_SERVICE;
use crate::topology::ServiceTopology;

const HEADER: &str = "[supervisord]\nnodaemon=true\n\n";

const TRAILER: [&str; 4] = [
    "stopasgroup=true",
    "stdout_logfile=/dev/stdout",
    "stdout_logfile_maxbytes=0",
    "redirect_stderr=true",
];

/// Render a supervisord configuration with one `[program:...]` per process
pub fn render_supervisor(topology: &ServiceTopology) -> String {
    let mut conf = String::from(HEADER);

    if let Some(broker) = &topology.broker {
        push_program(&mut conf, BROKER_SERVICE, broker, true);
    }
    for (stage, spec) in &topology.stages {
        push_program(&mut conf, stage.name(), spec, false);
    }

    conf
}

fn push_program(conf: &mut String, name: &str, spec: &ProcessSpec, first: bool) {
    conf.push_str(&format!("[program:{name}]\n"));
    conf.push_str(&format!("command={}\n", spec.command_line()));
    if first {
        conf.push_str("priority=0\n");
    }
    for line in TRAILER {
        conf.push_str(line);
        conf.push('\n');
    }
    conf.push('\n');
}

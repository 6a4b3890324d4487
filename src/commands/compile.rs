//! Compile command implementation
//!
//! Loads a profile, assembles its topology and writes the supervisord and
//! docker-compose documents into the user profile directory. Both documents
//! are rendered and staged before either destination is touched. If the
//! second document cannot be moved into place, the first destination is
//! put back the way it was.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use console::Style;
use tempfile::NamedTempFile;

use crate::builders::BuilderRegistry;
use crate::cli::CompileArgs;
use crate::error::{self, Result};
use crate::profile::ProfileLoader;
use crate::render::{render_compose, render_supervisor};
use crate::topology::TopologyAssembler;

/// Run compile command
pub fn run(args: CompileArgs) -> Result<()> {
    let user_profiles = args.user_profiles_dir();
    let profile = ProfileLoader::new(&args.profile, &args.system_profiles, &user_profiles).load()?;

    let registry = BuilderRegistry::with_builtins()?;
    let topology = TopologyAssembler::new(&registry, args.local_mqtt_port).assemble(&profile)?;

    let supervisor = render_supervisor(&topology);
    let compose = render_compose(&topology)?;

    let output_dir = profile.user_dir();
    fs::create_dir_all(&output_dir)
        .map_err(|e| error::fs::write_failed(output_dir.display().to_string(), e.to_string()))?;

    let staged = [
        stage(&output_dir, &args.supervisord_conf, &supervisor)?,
        stage(&output_dir, &args.docker_compose, &compose)?,
    ];

    let mut written: Vec<Replaced> = Vec::with_capacity(staged.len());
    for (temp, destination) in staged {
        let previous = fs::read(&destination).ok();
        if let Err(e) = temp.persist(&destination) {
            restore(&written);
            return Err(error::fs::write_failed(
                destination.display().to_string(),
                e.error.to_string(),
            ));
        }
        written.push(Replaced {
            path: destination,
            previous,
        });
    }

    for Replaced { path: destination, .. } in &written {
        tracing::info!(path = %destination.display(), "wrote file");
        println!(
            "{} {}",
            Style::new().green().bold().apply_to("Wrote"),
            destination.display()
        );
    }

    println!(
        "{} {} process(es) for profile {}",
        Style::new().bold().apply_to("Compiled"),
        topology.process_count(),
        Style::new().cyan().apply_to(profile.name())
    );

    Ok(())
}

/// A destination that has been overwritten, with what it held before
struct Replaced {
    path: PathBuf,
    previous: Option<Vec<u8>>,
}

/// Undo already persisted documents after a later one failed
fn restore(written: &[Replaced]) {
    for Replaced { path, previous } in written {
        let result = match previous {
            Some(contents) => fs::write(path, contents),
            None => fs::remove_file(path),
        };
        match result {
            Ok(()) => tracing::warn!(path = %path.display(), "restored previous file"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to restore file"),
        }
    }
}

/// Write `contents` to a temporary file next to its destination
fn stage(dir: &Path, file_name: &str, contents: &str) -> Result<(NamedTempFile, PathBuf)> {
    let destination = dir.join(file_name);
    let write_failed =
        |e: std::io::Error| error::fs::write_failed(destination.display().to_string(), e.to_string());

    let mut temp = NamedTempFile::new_in(dir).map_err(write_failed)?;
    temp.write_all(contents.as_bytes()).map_err(write_failed)?;
    temp.flush().map_err(write_failed)?;

    Ok((temp, destination))
}

//! Version command implementation

use crate::builders::BuilderRegistry;
use crate::error::Result;
use crate::stage::Stage;

/// Run version command
pub fn run() -> Result<()> {
    let registry = BuilderRegistry::with_builtins()?;

    println!("rhasspy-supervisor {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());
    println!();
    println!("Stages:");
    for (stage, systems) in stage_systems(&registry) {
        println!("  {stage}: {}", systems.join(", "));
    }

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

/// Each stage with the systems its builder accepts, in pipeline order
fn stage_systems(registry: &BuilderRegistry) -> Vec<(Stage, Vec<&'static str>)> {
    Stage::PIPELINE
        .iter()
        .filter_map(|&stage| {
            registry
                .get(stage)
                .map(|builder| (stage, builder.supported_variants().to_vec()))
        })
        .collect()
}

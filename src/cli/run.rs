use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use cogspace::config::CogConfig;
use cogspace::memory::maintenance::spawn_maintenance;

/// Execute a program file, printing each `!` directive with its results.
pub async fn run(config: &CogConfig, path: &Path, maintain: bool) -> Result<()> {
    let interp = super::interpreter(config);
    let maintenance = (maintain || config.maintenance.enabled)
        .then(|| spawn_maintenance(Arc::clone(interp.space()), &config.maintenance));

    let outputs = super::load_program(&interp, path).await;

    if let Some(handle) = maintenance {
        let cycles = handle.shutdown().await;
        tracing::debug!(cycles, "maintenance finished");
    }

    for output in outputs? {
        println!("!{} => {}", output.expr, super::format_results(&output.results));
    }
    println!();
    println!("{} atoms in space", interp.space().len());
    Ok(())
}

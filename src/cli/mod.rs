pub mod agent;
pub mod eval;
pub mod query;
pub mod run;
pub mod stats;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use cogspace::config::CogConfig;
use cogspace::interp::{Interpreter, ProgramOutput};
use cogspace::memory::store::Memory;

/// Fresh atomspace and interpreter built from the loaded config.
pub fn interpreter(config: &CogConfig) -> Arc<Interpreter> {
    let space = Arc::new(Memory::new(config.memory.clone()));
    Arc::new(Interpreter::new(space, config.interpreter.clone()))
}

/// Read a program file and run it against `interp`.
///
/// Runs on the blocking pool: evaluation is synchronous and may be long.
pub async fn load_program(interp: &Arc<Interpreter>, path: &Path) -> Result<Vec<ProgramOutput>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read program: {}", path.display()))?;
    let it = Arc::clone(interp);
    let outputs = tokio::task::spawn_blocking(move || it.run_program(&text))
        .await?
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(outputs)
}

/// `[a b c]` rendering of a result list.
pub fn format_results(results: &[cogspace::atom::Atom]) -> String {
    let items: Vec<String> = results.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

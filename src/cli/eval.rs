use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use cogspace::config::CogConfig;
use cogspace::reader;

/// Evaluate one expression, optionally after loading a program.
pub async fn eval(config: &CogConfig, expr: &str, file: Option<&Path>) -> Result<()> {
    let atom = reader::parse_atom(expr).context("invalid expression")?;
    let interp = super::interpreter(config);
    if let Some(path) = file {
        super::load_program(&interp, path).await?;
    }

    let it = Arc::clone(&interp);
    let results = tokio::task::spawn_blocking(move || it.evaluate(&atom)).await?;
    for result in &results {
        println!("{result}");
    }
    Ok(())
}

use anyhow::{Context, Result};
use std::path::Path;

use cogspace::config::CogConfig;
use cogspace::memory::query::QueryMatchView;
use cogspace::reader;

/// Match a pattern against the space loaded from `file`.
pub async fn query(config: &CogConfig, pattern: &str, file: Option<&Path>, json: bool) -> Result<()> {
    let pattern = reader::parse_atom(pattern).context("invalid pattern")?;
    let interp = super::interpreter(config);
    if let Some(path) = file {
        super::load_program(&interp, path).await?;
    }

    let matches: Vec<QueryMatchView> = interp
        .space()
        .query(&pattern)
        .iter()
        .map(|m| m.view())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    println!("Found {} match(es)\n", matches.len());
    for (i, m) in matches.iter().enumerate() {
        println!("  {}. {} (score: {:.4})", i + 1, m.atom, m.score);
        for (var, value) in &m.bindings {
            println!("     {var} = {value}");
        }
    }
    Ok(())
}

use anyhow::Result;
use std::path::Path;

use cogspace::config::CogConfig;
use cogspace::memory::stats::memory_stats;

/// Display atomspace statistics, optionally after loading a program.
pub async fn stats(config: &CogConfig, file: Option<&Path>, json: bool) -> Result<()> {
    let interp = super::interpreter(config);
    if let Some(path) = file {
        super::load_program(&interp, path).await?;
    }
    let response = memory_stats(interp.space());

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Atomspace Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total atoms:         {}", response.total_atoms);
    println!("  Protected:           {}", response.protected);
    println!("  Rules:               {}", response.rules);
    println!("  Type declarations:   {}", response.type_declarations);
    println!();

    println!("By Kind:");
    for (kind, count) in &response.by_kind {
        println!("  {:<12} {}", kind, count);
    }
    println!();

    println!("Mean short-term:       {:.4}", response.mean_sti);
    println!("Mean long-term:        {:.4}", response.mean_lti);
    println!("Mean confidence:       {:.4}", response.mean_confidence);
    println!("Clock:                 {}", response.clock);

    Ok(())
}

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cogspace::config::CogConfig;

#[derive(Parser)]
#[command(name = "cogspace", version, about = "Atomspace, rewrite interpreter and learning agent")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a program: add its statements, evaluate its `!` directives
    Run {
        file: PathBuf,
        /// Run background decay-and-forget while the program executes
        #[arg(long)]
        maintain: bool,
    },
    /// Evaluate a single expression
    Eval {
        expr: String,
        /// Program to load first
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Match a pattern against the atomspace
    Query {
        pattern: String,
        /// Program to load first
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show atomspace statistics
    Stats {
        /// Program to load first
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Train an agent in the three-state chain world
    Agent {
        #[arg(long, default_value_t = 5)]
        episodes: usize,
        /// Seed for reproducible action selection
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CogConfig::load()?;

    // Log to stderr so stdout carries only results.
    let filter = EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run { file, maintain } => cli::run::run(&config, &file, maintain).await?,
        Command::Eval { expr, file } => cli::eval::eval(&config, &expr, file.as_deref()).await?,
        Command::Query {
            pattern,
            file,
            json,
        } => cli::query::query(&config, &pattern, file.as_deref(), json).await?,
        Command::Stats { file, json } => cli::stats::stats(&config, file.as_deref(), json).await?,
        Command::Agent { episodes, seed } => cli::agent::agent(&config, episodes, seed)?,
    }

    Ok(())
}

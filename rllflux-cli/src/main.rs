use anyhow::Result;
use clap::Parser;
use rllflux_cli::commands;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "rllflux")]
#[command(about = "rllflux - Dump WD RLL(2,7) address and data marks from raw flux captures", long_about = None)]
#[command(version)]
struct Cli {
    /// Raw flux capture, one sample byte per transition interval
    input: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Also write recovered records to a JSON file
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Print decode statistics to stderr
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for record lines
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    commands::decode::execute(&cli.input, cli.json.as_deref(), cli.stats)
}

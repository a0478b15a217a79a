//! ECL demo
//!
//! Runs the demo scene: waves of enemies drift and decay until none are left.

use anyhow::Result;
use clap::Parser;
use ecl_app::demo::{self, DemoLauncher};
use ecl_app::{logging, App, Settings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ecl-demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run the ECL demo scene", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Directory containing ecl.toml
    #[arg(short, long, default_value = ".")]
    config: PathBuf,

    /// Stop after this many frames
    #[arg(short, long)]
    frames: Option<u64>,

    /// Number of enemy waves
    #[arg(short, long, default_value = "3")]
    waves: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load_or_default(&cli.config)?;
    logging::init(&settings.logging, cli.verbose)?;

    let mut launcher = DemoLauncher::new(&mut settings, cli.waves);
    let mut app = App::new(demo::scene(), settings);
    let stats = app.run(&mut launcher, cli.frames)?;

    info!(
        "Ran {} frames, {} logic runs, {} failures",
        stats.frames, stats.logic_runs, stats.failures
    );
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use tracing::{info, warn};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sonic_forge::config::{Args, Settings};
use sonic_forge::context::AppContext;
use sonic_forge::shell::{Shell, FAREWELL};
use sonic_forge::tools::is_available;

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default.into())
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    ctrlc::set_handler(|| {
        println!("\n{}", FAREWELL);
        std::process::exit(0);
    })
    .context("Failed to install Ctrl-C handler")?;

    let settings = Settings::from(&args);
    for (name, program) in [("ffmpeg", &settings.ffmpeg), ("yt-dlp", &settings.yt_dlp)] {
        if !is_available(program) {
            warn!(program = %program.display(), "{} not found, related options will fail", name);
            println!(
                "{}",
                format!("Warning: {} is not available ({})", name, program.display()).yellow()
            );
        }
    }

    info!(?settings, "Starting");
    let ctx = AppContext::from_settings(settings)?;
    Shell::stdin(&ctx).run()
}

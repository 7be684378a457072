//! whosnap entry point.

mod app;
mod cli;
mod config;

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::RunOutcome;
use cli::Args;
use config::Config;

fn main() {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting whosnap");

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration, using defaults");
            Config::default()
        }
    };
    config.apply_args(&args);

    tracing::info!("checking for new log block");
    let outcome = app::run(&config, chrono::Local::now().naive_local());
    report(&outcome);

    countdown(config.linger_secs);
}

/// Prints the user-facing result of a run.
fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Saved { path, summary } => {
            println!("\n=====================");
            println!("Results...");
            println!("{summary}");
            println!("=====================\n");
            println!("Saved block to {}", path.display());
        }
        RunOutcome::NoBlock | RunOutcome::NoPlayers => {
            println!("No player information found.");
        }
        RunOutcome::Stale { raw } => {
            println!("Latest player list is from [{raw}], not today. Nothing saved.");
        }
        RunOutcome::Undecidable { reason } => {
            println!("Could not date the latest player list ({reason}). Nothing saved.");
        }
        RunOutcome::Misconfigured { reason } => {
            println!("Invalid log format configuration: {reason}");
        }
        RunOutcome::WriteFailed { reason } => {
            println!("Could not save player list: {reason}");
        }
    }
}

fn countdown(secs: u32) {
    if secs == 0 {
        return;
    }
    println!("\nRun complete.");
    let mut stdout = std::io::stdout();
    for i in (1..=secs).rev() {
        print!("Closing in {i} seconds...\r");
        if let Err(e) = stdout.flush() {
            tracing::debug!(error = %e, "failed to flush countdown");
        }
        std::thread::sleep(Duration::from_secs(1));
    }
    println!("Goodbye!                    ");
}

mod config;
mod output;
mod report;
mod signupgenius;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::info;

use crate::config::{Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "snackshack-status",
    about = "Refresh the snack shack status board from SignUpGenius"
)]
struct Cli {
    /// Pretend today is this date (YYYY-MM-DD); overrides TEST_DATE
    #[arg(long)]
    date: Option<String>,
    /// Where to write the status document; overrides OUTPUT_PATH
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log every signup as it is processed; same as DEBUG=1
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let t0 = Instant::now();
    let cli = Cli::parse();

    let settings = Settings::load(Overrides {
        date: cli.date,
        output: cli.output,
        verbose: cli.verbose,
    })?;
    init_tracing(settings.verbose);

    info!("Starting snackshack status update");
    info!("Output path: {}", settings.output_path.display());

    let signups = signupgenius::fetch_signups(&settings).await?;
    let today = report::dates::resolve_today(settings.today_override.as_deref(), Utc::now());
    info!("Processing signups for today: {}", today);

    let doc = report::build_report(&signups, today);
    output::write_document(&settings.output_path, &doc)?;

    info!(
        "Update completed in {:.1}s",
        t0.elapsed().as_secs_f64()
    );
    Ok(())
}

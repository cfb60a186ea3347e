//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `mail_posture` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::process;

use mail_posture::initialization::init_logger_with;
use mail_posture::{run_job, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), falling back
    // to a .env next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_job(config).await {
        Ok(report) => {
            println!(
                "✅ Processed {} domain{} ({} lookups without data) in {:.1}s",
                report.total_domains,
                if report.total_domains == 1 { "" } else { "s" },
                report.failed_lookups(),
                report.elapsed_seconds
            );
            println!("Job {} output in {}", report.job_id, report.job_dir.display());

            let artifacts = &report.artifacts;
            for path in artifacts
                .workbook
                .iter()
                .chain(artifacts.dashboard.iter())
                .chain(artifacts.pdf.iter())
            {
                println!("   {}", path.display());
            }
            println!("   {}", artifacts.log.display());
            for failure in &artifacts.failures {
                eprintln!("{} {}", "⚠".yellow(), failure);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("mail_posture error: {:#}", e);
            process::exit(1);
        }
    }
}

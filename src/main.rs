//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `bili_tags` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Choosing between crawling and analyzing an existing statistics file
//!
//! All core functionality is implemented in the library crate.

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use bili_tags::config::resolve_config_path;
use bili_tags::initialization::init_logger_with;
use bili_tags::{
    analysis_output_path, load_config, load_stats_from_file, run_crawl, save_analysis_result,
    Analyzer, Cli, Config, RunMode, StatsResult,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Try the current directory first, then next to the executable
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

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("bili_tags error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mode = cli.run_mode();

    if let Some(input) = cli.input.as_deref() {
        if mode != RunMode::JsonOnly {
            return analyze_existing(&cli, mode, input).await;
        }
        warn!("--input is only used with --ollama or --api; crawling instead");
    }

    info!("Config file: {}", resolve_config_path(&cli.config).display());
    let mut config = load_config(&cli.config).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    mode.validate(&config)?;
    info!("Run mode: {}", mode.describe(&config));

    let report = run_crawl(config.clone()).await?;
    println!(
        "Crawled {} videos ({} distinct tags) in {:.1}s over {} round{} ({} skipped)",
        report.stats.total_videos,
        report.stats.total_tags,
        report.elapsed_seconds,
        report.rounds_attempted,
        if report.rounds_attempted == 1 { "" } else { "s" },
        report.rounds_skipped
    );
    println!("Results saved to: {}", report.output_file.display());

    if mode != RunMode::JsonOnly {
        analyze_and_save(mode, &config, &report.stats, &report.output_file).await?;
    }
    Ok(())
}

/// Analyzes a statistics file from an earlier run without crawling.
async fn analyze_existing(cli: &Cli, mode: RunMode, input: &Path) -> Result<()> {
    // Analysis needs no cookie, so an unusable config file only costs its backend values
    let mut config = load_config(&cli.config).unwrap_or_else(|e| {
        warn!("Config file not used ({}); falling back to defaults", e);
        Config::default()
    });
    cli.apply_overrides(&mut config);
    mode.validate(&config)?;

    let stats = load_stats_from_file(input).context("Failed to load input statistics")?;
    analyze_and_save(mode, &config, &stats, input).await
}

async fn analyze_and_save(
    mode: RunMode,
    config: &Config,
    stats: &StatsResult,
    stats_path: &Path,
) -> Result<()> {
    let analyzer = Analyzer::new(mode, config).context("Failed to initialize analysis client")?;
    let result = analyzer
        .analyze(stats)
        .await
        .with_context(|| format!("{} analysis failed", mode.as_str()))?;

    let output = analysis_output_path(stats_path);
    save_analysis_result(&result, &output).context("Failed to save analysis result")?;

    println!("\n{}\n", result.summary);
    println!("Analysis saved to: {}", output.display());
    Ok(())
}

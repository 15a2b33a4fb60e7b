/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use rms_sched::config::RunConfig;
use rms_sched::input::read_task_sets;
use rms_sched::orchestrator::Orchestrator;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Rate-Monotonic scheduling analyzer and simulator.
///
/// Reads one task set per line (`<id> <wcet> <period>` triples) until the
/// exit token, then prints one report per task set in input order.
///
/// Example:
///   printf 'A 2 10 B 4 15 C 3 30\nexit\n' | rms-sched
#[derive(Debug, Parser)]
#[command(
    name = "rms-sched",
    about = "Rate-Monotonic scheduling analyzer and simulator",
    long_about = None,
)]
struct Cli {
    /// Read task sets from this file instead of standard input.
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Path to the YAML run configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Reports go to stdout, logs to stderr.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    info!(input = ?cli.input, config = ?cli.config, "rms-sched starting up");

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Load run configuration ────────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => RunConfig::load_from_file(path)?,
        None => RunConfig::default(),
    };

    // ── Collect task sets ─────────────────────────────────────────────────────
    let task_sets = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            collect(BufReader::new(file), &config.exit_token)?
        }
        None => collect(io::stdin().lock(), &config.exit_token)?,
    };

    if task_sets.is_empty() {
        warn!("No task sets read, nothing to schedule");
        return Ok(());
    }
    info!("Read {} task set(s)", task_sets.len());

    // ── Schedule and report ───────────────────────────────────────────────────
    Orchestrator::new(config)
        .run(task_sets, io::stdout())
        .context("Scheduling run failed")?;

    Ok(())
}

fn collect<R: BufRead>(reader: R, exit_token: &str) -> Result<Vec<rms_sched::task::TaskSet>> {
    read_task_sets(reader, exit_token).context("Failed to read task sets")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

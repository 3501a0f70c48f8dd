use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mlfq_model::{
    FcfsMode, Sim, SimConfig, Workload,
    config::parse_workload_file,
    core::LinePrinter,
    sim::SimReport,
};
use tracing_subscriber::EnvFilter;

/// Run a multi-level feedback queue simulation and print its trace.
#[derive(Parser)]
#[command(name = "mlfq_model")]
struct Cli {
    /// TOML workload file with `[[process]]` entries and an optional `[config]` table.
    #[arg(short, long, value_name = "PATH", conflicts_with = "random")]
    workload: Option<PathBuf>,

    /// Generate a random workload of this many processes.
    #[arg(long, value_name = "COUNT")]
    random: Option<usize>,

    /// Seed for the random workload.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 1)]
    min_burst: u64,

    #[arg(long, default_value_t = 10)]
    max_burst: u64,

    /// Number of feedback tiers (overrides the workload file).
    #[arg(short, long)]
    tiers: Option<usize>,

    /// Quantum per feedback tier (overrides the workload file).
    #[arg(short = 's', long)]
    time_slice: Option<u64>,

    /// How the terminal FCFS queue treats the workload.
    #[arg(long, value_enum)]
    fcfs_mode: Option<FcfsMode>,

    /// Print per-process outcomes and averages after the trace.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (workload, mut config) = match (&cli.workload, cli.random) {
        (Some(path), _) => {
            let file = parse_workload_file(path)?;
            (Workload::new(file.processes, file.config.capacity)?, file.config)
        }
        (None, Some(count)) => (
            Workload::random(count, cli.min_burst, cli.max_burst, cli.seed)?,
            SimConfig::default(),
        ),
        (None, None) => (Workload::sample(), SimConfig::default()),
    };

    if let Some(tiers) = cli.tiers {
        config.num_tiers = tiers;
        // A per-tier list no longer lines up with the tier count
        if config
            .tier_time_slices
            .as_ref()
            .is_some_and(|slices| slices.len() != tiers)
        {
            tracing::warn!(tiers, "dropping per-tier time slices");
            config.tier_time_slices = None;
        }
    }
    if let Some(slice) = cli.time_slice {
        config.time_slice = slice;
        config.tier_time_slices = None;
    }
    if let Some(mode) = cli.fcfs_mode {
        config.fcfs_mode = mode;
    }

    let sim = Sim::new(workload, config)?;
    let mut printer = LinePrinter::new(io::stdout().lock());
    let report = sim.run_with(&mut printer)?;
    let mut stdout = printer.finish().context("Failed to write trace")?;

    if cli.summary {
        print_summary(&mut stdout, &report).context("Failed to write summary")?;
    }

    Ok(())
}

fn print_summary(out: &mut impl io::Write, report: &SimReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "PID\tBURST\tSTART\tFINISH")?;
    for outcome in &report.outcomes {
        let fmt_opt = |t: Option<u64>| t.map_or_else(|| "-".to_string(), |t| t.to_string());
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            outcome.id,
            outcome.burst_time,
            fmt_opt(outcome.first_start),
            fmt_opt(outcome.completion_time)
        )?;
    }
    writeln!(out, "{}", report.summary)
}

#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use gss_sim::{CampaignConfig, replay_seed, run_campaign};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "gss-sim: deterministic mutation campaigns for the graph-structured stack",
    long_about = None
)]
struct Cli {
    /// Campaign config (TOML). Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First seed to run.
    #[arg(long)]
    seed_start: Option<u64>,

    /// Number of seeds to run.
    #[arg(long)]
    seeds: Option<u64>,

    /// Nodes in the initial pool.
    #[arg(long)]
    nodes: Option<usize>,

    /// Distinct keys shared by the pool.
    #[arg(long)]
    keys: Option<usize>,

    /// Mutations per seed.
    #[arg(long)]
    ops: Option<usize>,

    /// Replay a single seed and print its trace instead of a report.
    #[arg(long)]
    replay: Option<u64>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn campaign_config(&self) -> Result<CampaignConfig> {
        let mut config = match &self.config {
            Some(path) => CampaignConfig::load(path)?,
            None => CampaignConfig::default(),
        };

        let start = self.seed_start.unwrap_or(config.seed_range.start);
        let count = self
            .seeds
            .unwrap_or_else(|| config.seed_range.end.saturating_sub(config.seed_range.start));
        config.seed_range = start..start.saturating_add(count);

        if let Some(nodes) = self.nodes {
            config.node_count = nodes;
        }
        if let Some(keys) = self.keys {
            config.key_space = keys;
        }
        if let Some(ops) = self.ops {
            config.ops_per_seed = ops;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("GSS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "gss=debug,info"
        } else {
            "gss=info,warn"
        })
    });

    let format = env::var("GSS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.campaign_config()?;

    if let Some(seed) = cli.replay {
        let trace = replay_seed(seed, &config)?;
        println!("{}", serde_json::to_string_pretty(&trace.steps)?);
        print!("{}", trace.rendering);
        for violation in &trace.oracle.violations {
            println!("violation: {violation}");
        }
        if let Some(step) = trace.failed_at {
            bail!("seed {seed} failed at step {step}");
        }
        return Ok(());
    }

    let report = run_campaign(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    info!(
        applied = report.mutations_applied,
        rejected = report.mutations_rejected,
        "mutations"
    );

    if let Some(seed) = report.first_failure {
        bail!(
            "{} of {} seeds failed; replay with --replay {seed}",
            report.failures.len(),
            report.seeds_run
        );
    }
    Ok(())
}

//! Campaign runner for deterministic mutation campaigns.
//!
//! Every seed drives a fresh node pool through a stream of random public
//! mutations, running the oracle after each one. Mutations that would
//! close a cycle are rejected and rolled back; the structure is used as a
//! DAG and several traversals assume one.

use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result, bail};
use gss_core::{NodeId, RenderConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::mutation::{self, Mutation, OpWeights, SimGss};
use crate::oracle::{self, InvariantViolation, OracleResult};
use crate::rng::DeterministicRng;

/// How many seeds to run and what each seed does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Seeds to execute, e.g. `0..100`.
    pub seed_range: Range<u64>,
    /// Nodes in the initial pool.
    pub node_count: usize,
    /// Distinct keys shared by the pool; smaller means more merges.
    pub key_space: usize,
    /// Mutations drawn per seed.
    pub ops_per_seed: usize,
    pub weights: OpWeights,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            seed_range: 0..100,
            node_count: 10,
            key_space: 4,
            ops_per_seed: 64,
            weights: OpWeights::default(),
        }
    }
}

impl CampaignConfig {
    /// Load a campaign from a TOML file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read campaign config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse campaign config {}", path.display()))
    }

    /// Validate configuration before running.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.seed_range.is_empty() {
            bail!("seed_range must not be empty");
        }
        if self.node_count == 0 {
            bail!("node_count must be > 0");
        }
        if self.key_space == 0 {
            bail!("key_space must be > 0");
        }
        if self.weights.total() == 0 {
            bail!("at least one operation weight must be > 0");
        }
        Ok(())
    }
}

/// Failure details for a single seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFailure {
    pub seed: u64,
    /// Zero-based index of the mutation after which the oracle failed.
    pub step: usize,
    pub mutation: Mutation,
    pub violations: Vec<String>,
}

/// Aggregate report produced by a campaign run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignReport {
    pub seeds_run: usize,
    pub seeds_passed: usize,
    /// First seed that failed, for replay.
    pub first_failure: Option<u64>,
    pub failures: Vec<SeedFailure>,
    pub mutations_applied: usize,
    /// Mutations rolled back because they would have closed a cycle.
    pub mutations_rejected: usize,
}

impl CampaignReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One step of a replayed seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub mutation: Mutation,
    pub accepted: bool,
}

/// Everything a single seed did, for debugging a failure.
#[derive(Debug, Clone)]
pub struct DetailedTrace {
    pub seed: u64,
    pub steps: Vec<TraceStep>,
    /// Oracle result for the last state reached.
    pub oracle: OracleResult,
    /// Step at which the oracle first failed, if it did.
    pub failed_at: Option<usize>,
    /// Rendering of every root of the final arena.
    pub rendering: String,
}

struct SeedRun {
    gss: SimGss,
    steps: Vec<TraceStep>,
    oracle: OracleResult,
    failed_at: Option<usize>,
}

impl SeedRun {
    fn applied(&self) -> usize {
        self.steps.iter().filter(|step| step.accepted).count()
    }

    fn rejected(&self) -> usize {
        self.steps.len() - self.applied()
    }
}

/// Run a full campaign across all seeds in the config.
///
/// # Errors
///
/// Returns an error if config validation fails.
pub fn run_campaign(config: &CampaignConfig) -> Result<CampaignReport> {
    config.validate()?;
    info!(
        seeds = ?config.seed_range,
        nodes = config.node_count,
        ops = config.ops_per_seed,
        "starting campaign"
    );

    let mut report = CampaignReport {
        seeds_run: 0,
        seeds_passed: 0,
        first_failure: None,
        failures: Vec::new(),
        mutations_applied: 0,
        mutations_rejected: 0,
    };

    for seed in config.seed_range.clone() {
        let run = run_seed(seed, config);
        report.seeds_run += 1;
        report.mutations_applied += run.applied();
        report.mutations_rejected += run.rejected();

        match run.failed_at {
            None => report.seeds_passed += 1,
            Some(step) => {
                warn!(seed, step, "oracle failed");
                report.first_failure.get_or_insert(seed);
                report.failures.push(SeedFailure {
                    seed,
                    step,
                    mutation: run.steps[step].mutation.clone(),
                    violations: run.oracle.violations.iter().map(ToString::to_string).collect(),
                });
            }
        }
    }

    info!(
        passed = report.seeds_passed,
        failed = report.failures.len(),
        "campaign finished"
    );
    Ok(report)
}

/// Run one seed and report whether every step passed the oracle.
///
/// # Errors
///
/// Returns an error if config validation fails. The inner `Result`
/// separates a pass from oracle violations.
pub fn run_single_seed(
    seed: u64,
    config: &CampaignConfig,
) -> Result<std::result::Result<(), Vec<InvariantViolation>>> {
    config.validate()?;
    let run = run_seed(seed, config);
    if run.oracle.passed {
        Ok(Ok(()))
    } else {
        Ok(Err(run.oracle.violations))
    }
}

/// Replay a single seed with full trace details.
///
/// # Errors
///
/// Returns an error if config validation fails.
pub fn replay_seed(seed: u64, config: &CampaignConfig) -> Result<DetailedTrace> {
    config.validate()?;
    let run = run_seed(seed, config);
    let rendering = run
        .gss
        .roots()
        .into_iter()
        .map(|root| run.gss.render(root, &RenderConfig::default()))
        .collect();

    Ok(DetailedTrace {
        seed,
        steps: run.steps,
        oracle: run.oracle,
        failed_at: run.failed_at,
        rendering,
    })
}

/// Drive one seed until its mutations run out or the oracle fails.
fn run_seed(seed: u64, config: &CampaignConfig) -> SeedRun {
    let mut rng = DeterministicRng::new(seed);
    let (mut gss, mut ids) = mutation::seed_pool(config.node_count, config.key_space);
    let mut steps = Vec::with_capacity(config.ops_per_seed);
    let mut oracle = oracle::check_all(&gss);

    for step in 0..config.ops_per_seed {
        let Some(next) =
            mutation::generate(&mut rng, &config.weights, ids.len(), config.key_space)
        else {
            break;
        };

        let accepted = apply_unless_cyclic(&mut gss, &mut ids, &next);
        steps.push(TraceStep {
            mutation: next,
            accepted,
        });
        if !accepted {
            continue;
        }

        oracle = oracle::check_all(&gss);
        if !oracle.passed {
            debug!(seed, step, violations = oracle.violations.len(), "seed failed");
            return SeedRun {
                gss,
                steps,
                oracle,
                failed_at: Some(step),
            };
        }
    }

    SeedRun {
        gss,
        steps,
        oracle,
        failed_at: None,
    }
}

/// Apply `next`, rolling back when it would close a cycle.
fn apply_unless_cyclic(gss: &mut SimGss, ids: &mut Vec<NodeId>, next: &Mutation) -> bool {
    if !next.adds_edges() {
        mutation::apply(gss, ids, next);
        return true;
    }

    let mut candidate = gss.clone();
    mutation::apply(&mut candidate, ids, next);
    if mutation::is_acyclic(&candidate) {
        *gss = candidate;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> CampaignConfig {
        CampaignConfig {
            seed_range: 0..10,
            node_count: 8,
            key_space: 3,
            ops_per_seed: 40,
            weights: OpWeights::default(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(CampaignConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_seed_range_rejected() {
        let config = CampaignConfig {
            seed_range: 5..5,
            ..CampaignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_nodes_rejected() {
        let config = CampaignConfig {
            node_count: 0,
            ..CampaignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_key_space_rejected() {
        let config = CampaignConfig {
            key_space: 0,
            ..CampaignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn all_zero_weights_rejected() {
        let weights = OpWeights {
            add_child: 0,
            add_parent: 0,
            remove_child: 0,
            remove_child_at: 0,
            remove_parent_at: 0,
            remove_children_by_key: 0,
            remove_parents_by_key: 0,
            remove_all_parents: 0,
            set_children: 0,
            insert: 0,
        };
        let config = CampaignConfig {
            weights,
            ..CampaignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn run_single_seed_passes() {
        let result = run_single_seed(0, &small()).expect("valid config");
        assert!(result.is_ok(), "seed 0 should pass: {result:?}");
    }

    #[test]
    fn run_campaign_all_seeds_pass() {
        let report = run_campaign(&small()).expect("campaign should not error");
        assert_eq!(report.seeds_run, 10);
        assert_eq!(report.seeds_passed, 10);
        assert!(report.all_passed(), "{:?}", report.failures);
        assert!(report.first_failure.is_none());
        assert_eq!(report.mutations_applied + report.mutations_rejected, 10 * 40);
    }

    #[test]
    fn cycle_closing_mutations_are_rejected() {
        let config = CampaignConfig {
            seed_range: 0..20,
            node_count: 6,
            key_space: 6,
            ops_per_seed: 60,
            weights: OpWeights {
                add_child: 1,
                add_parent: 0,
                remove_child: 0,
                remove_child_at: 0,
                remove_parent_at: 0,
                remove_children_by_key: 0,
                remove_parents_by_key: 0,
                remove_all_parents: 0,
                set_children: 0,
                insert: 0,
            },
        };
        let report = run_campaign(&config).expect("campaign should not error");
        assert!(report.all_passed(), "{:?}", report.failures);
        assert!(report.mutations_rejected > 0);
    }

    #[test]
    fn replay_is_deterministic() {
        let config = small();
        let first = replay_seed(7, &config).expect("replay 1");
        let second = replay_seed(7, &config).expect("replay 2");

        assert_eq!(first.steps, second.steps);
        assert_eq!(first.rendering, second.rendering);
        assert_eq!(first.steps.len(), config.ops_per_seed);
        assert!(first.oracle.passed);
        assert_eq!(first.failed_at, None);
    }

    #[test]
    fn replay_renders_every_root() {
        let config = CampaignConfig {
            ops_per_seed: 0,
            node_count: 3,
            ..small()
        };
        let trace = replay_seed(1, &config).expect("replay");
        assert!(trace.steps.is_empty());
        assert_eq!(trace.rendering.lines().count(), 3);
        assert!(trace.rendering.starts_with("(Key=k0) (Contents=0)"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = CampaignReport {
            seeds_run: 10,
            seeds_passed: 9,
            first_failure: Some(7),
            failures: vec![SeedFailure {
                seed: 7,
                step: 3,
                mutation: Mutation::RemoveAllParents { node: 1 },
                violations: vec!["Sort: children of #1 not in key order".into()],
            }],
            mutations_applied: 300,
            mutations_rejected: 12,
        };
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"seeds_run\":10"));
        assert!(json.contains("\"first_failure\":7"));
        assert!(json.contains("\"op\":\"remove_all_parents\""));
    }

    #[test]
    fn config_loads_from_toml_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("campaign.toml");
        std::fs::write(
            &path,
            "node_count = 5\nseed_range = { start = 3, end = 9 }\n\n[weights]\ninsert = 0\n",
        )
        .expect("write");

        let config = CampaignConfig::load(&path).expect("load");
        assert_eq!(config.node_count, 5);
        assert_eq!(config.seed_range, 3..9);
        assert_eq!(config.key_space, 4);
        assert_eq!(config.weights.insert, 0);
        assert_eq!(config.weights.add_child, OpWeights::default().add_child);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = CampaignConfig::load(&dir.path().join("absent.toml")).expect_err("missing");
        assert!(err.to_string().contains("failed to read"));
    }
}

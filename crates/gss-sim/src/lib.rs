//! gss-sim library.
//!
//! Seeded campaigns of random public mutations against a `gss-core`
//! arena, with an oracle re-checking the structural invariants after
//! every step.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!` per campaign, `warn!` per
//!   failed seed, `debug!` for step detail).

pub mod campaign;
pub mod mutation;
pub mod oracle;
pub mod rng;

pub use campaign::{
    CampaignConfig, CampaignReport, DetailedTrace, SeedFailure, TraceStep, replay_seed,
    run_campaign, run_single_seed,
};
pub use mutation::{Mutation, OpWeights, SimGss};
pub use oracle::{InvariantViolation, OracleResult, check_all};
pub use rng::DeterministicRng;

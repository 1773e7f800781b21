//! Explicit, immutable optimizer context.
//!
//! Replaces the process-wide `tmp/global_vars.json` file that `ga/utils.py`'s
//! `get_global_vars`/`update_global_vars` re-read from every `Individual`/
//! `Timetable` constructor. Here, the filtered proposal list, horizon, site,
//! and antenna count are loaded once by the driver and threaded into every
//! schedule/optimizer constructor as a single `Arc<OptimizerContext>` — no
//! hidden readers, no shared mutable file.

use std::sync::Arc;

use crate::astro::ObserverSite;
use crate::model::{Horizon, Proposal};

/// Immutable, shared state for one optimizer run.
#[derive(Debug, Clone)]
pub struct OptimizerContext {
    pub proposals: Vec<Proposal>,
    pub horizon: Horizon,
    pub site: ObserverSite,
    /// Constant antenna availability used by the simple feasibility model
    /// (`antennas_available(t) >= P.minimum_antennas`).
    pub antennas_available: u32,
    /// Top-level RNG seed threaded through every worker for reproducibility.
    pub rng_seed: u64,
}

impl OptimizerContext {
    pub fn new(
        proposals: Vec<Proposal>,
        horizon: Horizon,
        site: ObserverSite,
        antennas_available: u32,
        rng_seed: u64,
    ) -> Arc<Self> {
        Arc::new(Self {
            proposals,
            horizon,
            site,
            antennas_available,
            rng_seed,
        })
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn proposal(&self, index: usize) -> &Proposal {
        &self.proposals[index]
    }
}

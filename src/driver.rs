//! Driver / orchestration (C7): loads proposals, pre-filters them, runs the
//! configured optimizer, and returns the best schedule.
//!
//! Grounded on `ga/genetic_algorithm.py`'s top-level `run` function and
//! `ga/utils.py`'s `filter_out_impossible_to_place_obs`, generalized to
//! dispatch to either optimizer family.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::model::{Horizon, Proposal, Schedule};
use crate::optimizer::context::OptimizerContext;
use crate::optimizer::direct::{DirectOptimizer, DirectOptimizerParams};
use crate::optimizer::hyper::{HyperHeuristicOptimizer, HyperHeuristicParams};
use crate::optimizer::CancellationToken;

/// Which optimizer family the driver should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerKind {
    Direct,
    HyperHeuristic,
}

impl OptimizerKind {
    /// Cumulative-duration pre-filter cap, as a fraction of the horizon's
    /// total seconds (§4.7).
    fn duration_cap_fraction(self) -> f64 {
        match self {
            OptimizerKind::Direct => 1.0,
            OptimizerKind::HyperHeuristic => 0.85,
        }
    }
}

/// Parameters controlling population size / generation count, common to
/// both optimizer kinds; hyper-parameters beyond these come from
/// [`SchedulerConfig`].
#[derive(Debug, Clone, Copy)]
pub struct RunParams {
    pub kind: OptimizerKind,
    pub num_individuals: usize,
    pub generations: usize,
    /// Genome length `L`, used only by the hyper-heuristic optimizer.
    pub heuristics_combination_length: usize,
}

pub struct DriverOutput {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub schedule: Schedule,
    pub dropped_unschedulable: Vec<i64>,
    pub fitness_history_direct: Vec<f64>,
    pub fitness_history_hyper: Vec<u64>,
}

/// Run the full driver pipeline: shuffle, filter, optimize, repair.
pub fn run(
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    proposals: Vec<Proposal>,
    config: &SchedulerConfig,
    params: RunParams,
    cancellation: &CancellationToken,
) -> SchedulerResult<DriverOutput> {
    let horizon = Horizon::new(start_date, end_date);
    let site = crate::astro::ObserverSite::new(config.site.latitude_deg, config.site.longitude_deg);

    let mut rng = rand::rngs::StdRng::seed_from_u64(config.rng_seed);
    let mut shuffled = proposals;
    shuffled.shuffle(&mut rng);

    let cap_seconds = horizon.seconds() * params.kind.duration_cap_fraction();
    let mut dropped_unschedulable = Vec::new();
    let mut filtered = Vec::with_capacity(shuffled.len());
    let mut cumulative_seconds = 0.0;

    for proposal in shuffled {
        if !proposal.schedulable(&horizon, config.antennas_available) {
            dropped_unschedulable.push(proposal.id);
            continue;
        }
        if cumulative_seconds + proposal.duration_seconds as f64 > cap_seconds {
            dropped_unschedulable.push(proposal.id);
            continue;
        }
        cumulative_seconds += proposal.duration_seconds as f64;
        filtered.push(proposal);
    }

    if filtered.is_empty() {
        return Err(SchedulerError::EmptyPopulation);
    }

    let ctx: Arc<OptimizerContext> = OptimizerContext::new(filtered, horizon, site, config.antennas_available, config.rng_seed);

    let (schedule, fitness_history_direct, fitness_history_hyper) = match params.kind {
        OptimizerKind::Direct => {
            let direct_params = DirectOptimizerParams::new(params.num_individuals, params.generations, config.direct);
            let optimizer = DirectOptimizer::new(Arc::clone(&ctx), direct_params);
            let result = optimizer.run(cancellation)?;
            (result.best, result.fitness_history, Vec::new())
        }
        OptimizerKind::HyperHeuristic => {
            let hyper_params = HyperHeuristicParams::new(
                params.num_individuals,
                params.generations,
                params.heuristics_combination_length.max(1),
                config.hyper_heuristic,
            );
            let optimizer = HyperHeuristicOptimizer::new(Arc::clone(&ctx), hyper_params);
            let result = optimizer.run(cancellation)?;
            (result.best_schedule, Vec::new(), result.fitness_history)
        }
    };

    Ok(DriverOutput {
        start_date,
        end_date,
        schedule,
        dropped_unschedulable,
        fitness_history_direct,
        fitness_history_hyper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn proposal(id: i64) -> Proposal {
        Proposal {
            id,
            owner_email: "a@b.com".into(),
            duration_seconds: 600,
            lst_start: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            lst_start_end: NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
            night_obs: false,
            avoid_sunrise_sunset: false,
            minimum_antennas: 1,
            priority: 1.0,
            preferred_dates: vec![],
            avoided_dates: vec![],
        }
    }

    #[test]
    fn all_unschedulable_proposals_yields_empty_population_error() {
        let mut impossible = proposal(1);
        impossible.minimum_antennas = 1_000_000;
        let config = SchedulerConfig::default();
        let params = RunParams {
            kind: OptimizerKind::Direct,
            num_individuals: 8,
            generations: 2,
            heuristics_combination_length: 4,
        };
        let result = run(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            vec![impossible],
            &config,
            params,
            &CancellationToken::new(),
        );
        assert!(matches!(result, Err(SchedulerError::EmptyPopulation)));
    }

    #[test]
    fn direct_run_produces_a_schedule_covering_every_accepted_proposal() {
        let config = SchedulerConfig::default();
        let params = RunParams {
            kind: OptimizerKind::Direct,
            num_individuals: 8,
            generations: 3,
            heuristics_combination_length: 4,
        };
        let proposals = (1..=4).map(proposal).collect();
        let output = run(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            proposals,
            &config,
            params,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(output.schedule.len(), 4);
        assert!(output.dropped_unschedulable.is_empty());
    }

    #[test]
    fn hyper_heuristic_run_succeeds() {
        let config = SchedulerConfig::default();
        let params = RunParams {
            kind: OptimizerKind::HyperHeuristic,
            num_individuals: 6,
            generations: 2,
            heuristics_combination_length: 3,
        };
        let proposals = (1..=3).map(proposal).collect();
        let output = run(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            proposals,
            &config,
            params,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(output.schedule.len(), 3);
    }
}

//! Hyper-heuristic optimizer (C6): evolves genomes of heuristic indices
//! rather than schedules directly, decoding each genome with
//! [`super::decoder::decode`] to obtain a fitness.

use std::sync::Arc;

use rand::Rng;
use rayon::prelude::*;

use crate::config::HyperHeuristicConfig;
use crate::model::Schedule;
use crate::optimizer::context::OptimizerContext;
use crate::optimizer::rng::with_thread_rng;
use crate::optimizer::CancellationToken;

use super::decoder::{self, DecodeResult};
use super::genome::HeuristicGenome;

#[derive(Debug, Clone, Copy)]
pub struct HyperHeuristicParams {
    pub population_size: usize,
    pub generations: usize,
    pub genome_length: usize,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub slot_duration_seconds: f64,
    pub hard_constraint_penalty: u64,
}

impl HyperHeuristicParams {
    pub fn new(population_size: usize, generations: usize, genome_length: usize, config: HyperHeuristicConfig) -> Self {
        Self {
            population_size,
            generations,
            genome_length,
            mutation_rate: config.mutation_rate,
            tournament_size: config.tournament_size,
            slot_duration_seconds: config.slot_duration_s,
            hard_constraint_penalty: config.hard_constraint_penalty,
        }
    }
}

pub struct HyperHeuristicResult {
    pub best_schedule: Schedule,
    pub best_fitness: u64,
    /// Best (minimal) fitness at the end of each generation.
    pub fitness_history: Vec<u64>,
    pub generations_run: usize,
}

pub struct HyperHeuristicOptimizer {
    ctx: Arc<OptimizerContext>,
    params: HyperHeuristicParams,
}

impl HyperHeuristicOptimizer {
    pub fn new(ctx: Arc<OptimizerContext>, params: HyperHeuristicParams) -> Self {
        Self { ctx, params }
    }

    pub fn run(&self, cancellation: &CancellationToken) -> crate::SchedulerResult<HyperHeuristicResult> {
        if self.ctx.is_empty() {
            return Err(crate::SchedulerError::EmptyPopulation);
        }

        let n = self.params.population_size.max(1);
        let seed = self.ctx.rng_seed;

        let mut population: Vec<HeuristicGenome> = (0..n)
            .map(|i| with_thread_rng(seed.wrapping_add(i as u64), |rng| HeuristicGenome::random(self.params.genome_length, rng)))
            .collect();

        let known_impossible = decoder::first_fit_impossible(&self.ctx, self.params.slot_duration_seconds);

        let mut decoded = self.decode_population(&population, &known_impossible);
        let mut fitness_history = Vec::with_capacity(self.params.generations);
        let mut generations_run = 0;

        for generation in 0..self.params.generations {
            if cancellation.is_cancelled() {
                break;
            }

            let fitnesses: Vec<u64> = decoded
                .iter()
                .map(|d| decoder::fitness(d, self.params.hard_constraint_penalty))
                .collect();

            let best_index = (0..n).min_by_key(|&i| fitnesses[i]).expect("population is non-empty");

            let mut next_population = Vec::with_capacity(n);
            // Elitism: always carry the single best genome forward unchanged.
            next_population.push(population[best_index].clone());

            let offspring: Vec<HeuristicGenome> = (1..n)
                .collect::<Vec<_>>()
                .into_par_iter()
                .map(|i| {
                    with_thread_rng(seed.wrapping_add(i as u64 * 104_729 + generation as u64), |rng| {
                        let parent_a = tournament_select(&population, &fitnesses, self.params.tournament_size, rng);
                        let parent_b = tournament_select(&population, &fitnesses, self.params.tournament_size, rng);
                        parent_a.crossover(parent_b, rng).mutate(self.params.mutation_rate, rng)
                    })
                })
                .collect();
            next_population.extend(offspring);

            // Carry the elite's already-decoded result forward rather than
            // re-decoding its genome: the decoder consults heuristics that
            // draw from `rng`, so a second decode of the same genome can
            // land on a worse fitness than the generation it won.
            let elite_result = decoded[best_index].clone();
            let mut next_decoded = Vec::with_capacity(n);
            next_decoded.push(elite_result);
            next_decoded.extend(self.decode_population(&next_population[1..], &known_impossible));

            population = next_population;
            decoded = next_decoded;

            let best = decoded
                .iter()
                .map(|d| decoder::fitness(d, self.params.hard_constraint_penalty))
                .min()
                .unwrap_or(u64::MAX);
            fitness_history.push(best);
            generations_run = generation + 1;
        }

        let final_fitnesses: Vec<u64> = decoded.iter().map(|d| decoder::fitness(d, self.params.hard_constraint_penalty)).collect();
        let best_index = (0..decoded.len()).min_by_key(|&i| final_fitnesses[i]).expect("population is non-empty");
        let best_fitness = final_fitnesses[best_index];
        let best_schedule = with_thread_rng(seed, |rng| {
            std::mem::replace(&mut decoded[best_index].schedule, Schedule::empty(Arc::clone(&self.ctx))).repair(rng)
        });

        Ok(HyperHeuristicResult {
            best_schedule,
            best_fitness,
            fitness_history,
            generations_run,
        })
    }

    fn decode_population(&self, population: &[HeuristicGenome], known_impossible: &[usize]) -> Vec<DecodeResult> {
        population
            .par_iter()
            .enumerate()
            .map(|(i, genome)| {
                with_thread_rng(self.ctx.rng_seed.wrapping_add(i as u64 * 31 + 1), |rng| {
                    decoder::decode(genome, &self.ctx, self.params.slot_duration_seconds, known_impossible, rng)
                })
            })
            .collect()
    }
}

fn tournament_select<'a>(population: &'a [HeuristicGenome], fitnesses: &[u64], size: usize, rng: &mut impl Rng) -> &'a HeuristicGenome {
    let size = size.max(1).min(population.len());
    let mut best_index = rng.gen_range(0..population.len());
    for _ in 1..size {
        let candidate = rng.gen_range(0..population.len());
        if fitnesses[candidate] < fitnesses[best_index] {
            best_index = candidate;
        }
    }
    &population[best_index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::ObserverSite;
    use crate::model::{Horizon, Proposal};
    use chrono::{NaiveDate, NaiveTime};

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

    fn ctx() -> Arc<OptimizerContext> {
        OptimizerContext::new(
            (1..=5).map(proposal).collect(),
            Horizon::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            ),
            ObserverSite::ska(),
            64,
            3,
        )
    }

    #[test]
    fn empty_context_is_rejected() {
        let ctx = OptimizerContext::new(
            vec![],
            Horizon::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ),
            ObserverSite::ska(),
            64,
            1,
        );
        let params = HyperHeuristicParams::new(6, 3, 4, HyperHeuristicConfig::default());
        let optimizer = HyperHeuristicOptimizer::new(ctx, params);
        assert!(matches!(optimizer.run(&CancellationToken::new()), Err(crate::SchedulerError::EmptyPopulation)));
    }

    #[test]
    fn fitness_history_is_monotonically_non_increasing() {
        let params = HyperHeuristicParams::new(10, 6, 4, HyperHeuristicConfig::default());
        let optimizer = HyperHeuristicOptimizer::new(ctx(), params);
        let result = optimizer.run(&CancellationToken::new()).unwrap();
        for window in result.fitness_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }

    #[test]
    fn cancellation_stops_before_all_generations_run() {
        let params = HyperHeuristicParams::new(6, 1000, 4, HyperHeuristicConfig::default());
        let optimizer = HyperHeuristicOptimizer::new(ctx(), params);
        let token = CancellationToken::new();
        token.cancel();
        let result = optimizer.run(&token).unwrap();
        assert_eq!(result.generations_run, 0);
    }
}

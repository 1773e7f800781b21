//! Direct-encoding genetic optimizer (C5).
//!
//! Grounded on `ga/genetic_algorithm.py`'s generational loop, rewritten
//! around [`crate::model::Schedule`] and parallelized with `rayon` instead
//! of the original's sequential Python loop.

use rand::Rng;
use rayon::prelude::*;

use crate::config::DirectOptimizerConfig;
use crate::fitness;
use crate::model::Schedule;

use super::context::OptimizerContext;
use super::rng::with_thread_rng;
use super::CancellationToken;

/// Runtime parameters for one optimizer invocation.
#[derive(Debug, Clone, Copy)]
pub struct DirectOptimizerParams {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub elitism_fraction: f64,
    /// Overrides `generations` when set: the loop stops once this many
    /// seconds have elapsed, checked at each generation boundary.
    pub wall_clock_budget: Option<std::time::Duration>,
}

impl DirectOptimizerParams {
    pub fn new(population_size: usize, generations: usize, config: DirectOptimizerConfig) -> Self {
        Self {
            population_size,
            generations,
            crossover_rate: config.crossover_rate,
            mutation_rate: config.mutation_rate,
            elitism_fraction: config.elitism_fraction,
            wall_clock_budget: None,
        }
    }
}

/// The generational, elitist direct-encoding optimizer.
pub struct DirectOptimizer {
    ctx: std::sync::Arc<OptimizerContext>,
    params: DirectOptimizerParams,
}

/// Result of one optimizer run.
pub struct DirectOptimizerResult {
    pub best: Schedule,
    pub best_fitness: f64,
    /// Best fitness observed at the end of each generation, in order.
    /// Monotonically non-decreasing by construction (elitism preserves the
    /// previous best).
    pub fitness_history: Vec<f64>,
    pub generations_run: usize,
}

impl DirectOptimizer {
    pub fn new(ctx: std::sync::Arc<OptimizerContext>, params: DirectOptimizerParams) -> Self {
        Self { ctx, params }
    }

    /// Run the optimizer to completion or cancellation.
    pub fn run(&self, cancellation: &CancellationToken) -> crate::SchedulerResult<DirectOptimizerResult> {
        if self.ctx.is_empty() {
            return Err(crate::SchedulerError::EmptyPopulation);
        }

        let n = self.params.population_size.max(1);
        let seed = self.ctx.rng_seed;

        let mut population: Vec<Schedule> = (0..n)
            .map(|i| {
                with_thread_rng(seed.wrapping_add(i as u64), |rng| {
                    Schedule::new_random(std::sync::Arc::clone(&self.ctx), rng)
                })
            })
            .collect();

        evaluate_population(&mut population);

        let mut fitness_history = Vec::with_capacity(self.params.generations);
        let started_at = std::time::Instant::now();
        let mut generations_run = 0;

        for generation in 0..self.params.generations {
            if cancellation.is_cancelled() {
                break;
            }
            if let Some(budget) = self.params.wall_clock_budget {
                if started_at.elapsed() >= budget {
                    break;
                }
            }

            population.sort_by(|a, b| {
                b.cached_fitness()
                    .unwrap_or(0.0)
                    .partial_cmp(&a.cached_fitness().unwrap_or(0.0))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let elite_count = ((n as f64) * self.params.elitism_fraction).floor() as usize;
            let elite_count = elite_count.clamp(1, n);
            let crossover_count = ((n as f64) * self.params.crossover_rate).floor() as usize;
            let replace_start = n.saturating_sub(crossover_count + 1);

            let elite: Vec<Schedule> = population[..elite_count].to_vec();

            let offspring: Vec<(usize, Schedule)> = (replace_start..n)
                .collect::<Vec<_>>()
                .into_par_iter()
                .map(|position| {
                    let child = with_thread_rng(seed.wrapping_add(position as u64 * 7919 + generation as u64), |rng| {
                        produce_offspring(&elite, self.params.mutation_rate, rng)
                    });
                    (position, child)
                })
                .collect();

            for (position, child) in offspring {
                population[position] = child;
            }

            evaluate_population(&mut population);

            let best = population
                .iter()
                .map(|s| s.cached_fitness().unwrap_or(0.0))
                .fold(0.0_f64, f64::max);
            fitness_history.push(best);
            generations_run = generation + 1;
        }

        let best_index = (0..population.len())
            .max_by(|&a, &b| {
                population[a]
                    .cached_fitness()
                    .unwrap_or(0.0)
                    .partial_cmp(&population[b].cached_fitness().unwrap_or(0.0))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("population is non-empty");

        let best_fitness = population[best_index].cached_fitness().unwrap_or(0.0);
        let best = with_thread_rng(seed, |rng| population[best_index].repair(rng));

        Ok(DirectOptimizerResult {
            best,
            best_fitness,
            fitness_history,
            generations_run,
        })
    }
}

/// Evaluate every individual's fitness in parallel. `par_iter_mut` hands
/// each worker an exclusive `&mut Schedule`, so the per-individual fitness
/// cache needs no synchronization.
fn evaluate_population(population: &mut [Schedule]) {
    population.par_iter_mut().for_each(|schedule| {
        fitness::evaluate(schedule);
    });
}

/// Produce `k ∈ [4, 8]` offspring from two elite parents, rank them, and
/// sample one uniformly from the top `max(2, ⌊k·0.4⌋)`.
fn produce_offspring(elite: &[Schedule], mutation_rate: f64, rng: &mut impl Rng) -> Schedule {
    let parent_a = &elite[rng.gen_range(0..elite.len())];
    let parent_b = &elite[rng.gen_range(0..elite.len())];

    let k = rng.gen_range(4..=8);
    let mut candidates: Vec<Schedule> = (0..k)
        .map(|_| {
            let child = parent_a.crossover(parent_b, rng);
            child.mutate(mutation_rate, rng)
        })
        .collect();

    for candidate in candidates.iter_mut() {
        fitness::evaluate(candidate);
    }
    candidates.sort_by(|a, b| {
        b.cached_fitness()
            .unwrap_or(0.0)
            .partial_cmp(&a.cached_fitness().unwrap_or(0.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let top = (2usize).max((k as f64 * 0.4).floor() as usize).min(candidates.len());
    let chosen = rng.gen_range(0..top);
    candidates.swap_remove(chosen)
}

//! Schedule representation: proposal → optional start instant, pairwise
//! overlap computation, and clash repair.
//!
//! Grounded on `backend/ga/individual.py`'s clash-time loop in
//! `compute_fitness` (corrected here to count each pair once, not twice)
//! and `backend/ga/timetable.py`'s `remove_clashes` (fair-coin pairwise
//! removal).

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::optimizer::context::OptimizerContext;

/// `(proposal_id, start_instant | UNSCHEDULED)`; `None` represents
/// UNSCHEDULED.
pub type ScheduledBinding = Option<DateTime<Utc>>;

/// An ordered list of scheduled bindings, one per input proposal, in the
/// same order as `OptimizerContext::proposals` (fixed for crossover
/// alignment).
#[derive(Debug, Clone)]
pub struct Schedule {
    ctx: Arc<OptimizerContext>,
    bindings: Vec<ScheduledBinding>,
    fitness_cache: Option<f64>,
}

impl Schedule {
    /// A schedule with every proposal UNSCHEDULED.
    pub fn empty(ctx: Arc<OptimizerContext>) -> Self {
        let n = ctx.len();
        Self {
            ctx,
            bindings: vec![None; n],
            fitness_cache: None,
        }
    }

    /// Build a schedule directly from a complete binding vector, e.g. from
    /// the hyper-heuristic decoder's greedy construction.
    pub(crate) fn from_bindings(ctx: Arc<OptimizerContext>, bindings: Vec<ScheduledBinding>) -> Self {
        debug_assert_eq!(bindings.len(), ctx.len());
        Self {
            ctx,
            bindings,
            fitness_cache: None,
        }
    }

    pub fn context(&self) -> &Arc<OptimizerContext> {
        &self.ctx
    }

    pub fn bindings(&self) -> &[ScheduledBinding] {
        &self.bindings
    }

    pub fn binding(&self, index: usize) -> ScheduledBinding {
        self.bindings[index]
    }

    /// Force a binding directly, bypassing feasibility checks. Exposed only
    /// for constructing fixtures in other modules' tests.
    #[cfg(test)]
    pub fn set_binding_for_test(&mut self, index: usize, value: ScheduledBinding) {
        self.fitness_cache = None;
        self.bindings[index] = value;
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn num_scheduled(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_some()).count()
    }

    pub fn num_unscheduled(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_none()).count()
    }

    fn end_instant(&self, index: usize, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::seconds(self.ctx.proposal(index).duration_seconds)
    }

    /// Cached fitness, if one has been computed since the last mutation.
    pub fn cached_fitness(&self) -> Option<f64> {
        self.fitness_cache
    }

    /// Store a freshly computed fitness value.
    pub fn set_cached_fitness(&mut self, value: f64) {
        self.fitness_cache = Some(value);
    }

    /// Construct a schedule in which each proposal is UNSCHEDULED with
    /// probability ≈0.75, else assigned a uniformly-random feasible start
    /// instant found by rejection sampling (≤5 attempts; UNSCHEDULED on
    /// failure).
    ///
    /// Grounded on `backend/ga/individual.py`'s `generate`/
    /// `generate_random_start_datetime`.
    pub fn new_random(ctx: Arc<OptimizerContext>, rng: &mut impl Rng) -> Self {
        let n = ctx.len();
        let mut bindings = Vec::with_capacity(n);
        for i in 0..n {
            let start = if rng.gen::<f64>() < 0.75 {
                None
            } else {
                random_feasible_start(&ctx, i, rng)
            };
            bindings.push(start);
        }
        Self {
            ctx,
            bindings,
            fitness_cache: None,
        }
    }

    /// All unordered pairs of scheduled bindings with non-zero temporal
    /// overlap.
    pub fn clash_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.bindings.len() {
            let Some(start_i) = self.bindings[i] else { continue };
            let end_i = self.end_instant(i, start_i);
            for j in (i + 1)..self.bindings.len() {
                let Some(start_j) = self.bindings[j] else { continue };
                let end_j = self.end_instant(j, start_j);
                if start_i < end_j && start_j < end_i {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Total pairwise clash time, in seconds: the sum over every clashing
    /// pair of `max(0, min(end_i, end_j) - max(start_i, start_j))`.
    pub fn clash_seconds(&self) -> f64 {
        let mut total = 0.0;
        for i in 0..self.bindings.len() {
            let Some(start_i) = self.bindings[i] else { continue };
            let end_i = self.end_instant(i, start_i);
            for j in (i + 1)..self.bindings.len() {
                let Some(start_j) = self.bindings[j] else { continue };
                let end_j = self.end_instant(j, start_j);
                let overlap = end_i.min(end_j) - start_i.max(start_j);
                if overlap.num_seconds() > 0 {
                    total += overlap.num_seconds() as f64;
                }
            }
        }
        total
    }

    /// Remove clashes by repeatedly unscheduling one binding of an
    /// overlapping pair, chosen by a fair coin, until no two bindings
    /// overlap. Used only to produce the final output, never inside the
    /// fitness loop. Returns a fresh schedule; the receiver is unchanged.
    pub fn repair(&self, rng: &mut impl Rng) -> Self {
        let mut result = self.clone();
        result.fitness_cache = None;
        loop {
            let pairs = result.clash_pairs();
            if pairs.is_empty() {
                break;
            }
            for (i, j) in pairs {
                if result.bindings[i].is_none() || result.bindings[j].is_none() {
                    continue;
                }
                let start_i = result.bindings[i].unwrap();
                let start_j = result.bindings[j].unwrap();
                let end_i = result.end_instant(i, start_i);
                let end_j = result.end_instant(j, start_j);
                if start_i < end_j && start_j < end_i {
                    if rng.gen_bool(0.5) {
                        result.bindings[i] = None;
                    } else {
                        result.bindings[j] = None;
                    }
                }
            }
        }
        result
    }

    /// Gene-wise crossover: independent Bernoulli(0.5) choice per binding
    /// between `self` and `other`. Requires both schedules to share the
    /// same proposal ordering (the same `OptimizerContext`).
    pub fn crossover(&self, other: &Schedule, rng: &mut impl Rng) -> Self {
        debug_assert_eq!(self.bindings.len(), other.bindings.len());
        let bindings = self
            .bindings
            .iter()
            .zip(other.bindings.iter())
            .map(|(a, b)| if rng.gen_bool(0.5) { *a } else { *b })
            .collect();
        Self {
            ctx: Arc::clone(&self.ctx),
            bindings,
            fitness_cache: None,
        }
    }

    /// Rewrite a random `mutation_rate · n` subset of bindings; each target
    /// binding is reassigned UNSCHEDULED (probability 0.75) or a fresh
    /// feasible start instant.
    pub fn mutate(&self, mutation_rate: f64, rng: &mut impl Rng) -> Self {
        let mut result = self.clone();
        result.fitness_cache = None;
        let n = result.bindings.len();
        if n == 0 {
            return result;
        }
        let num_mutable = ((n as f64) * mutation_rate) as usize;
        let mut indexes = std::collections::HashSet::new();
        while indexes.len() < num_mutable.min(n) {
            indexes.insert(rng.gen_range(0..n));
        }
        for index in indexes {
            result.bindings[index] = if rng.gen::<f64>() < 0.75 {
                None
            } else {
                random_feasible_start(&result.ctx, index, rng)
            };
        }
        result
    }
}

/// Rejection sampling (≤5 attempts): pick a uniformly random date in the
/// horizon and a uniformly random offset within the proposal's LST start
/// window on that date; accept the first candidate that passes
/// [`crate::model::Proposal::feasible`].
fn random_feasible_start(
    ctx: &Arc<OptimizerContext>,
    proposal_index: usize,
    rng: &mut impl Rng,
) -> Option<DateTime<Utc>> {
    let proposal = ctx.proposal(proposal_index);
    let num_days = ctx.horizon.num_days();

    for _ in 0..5 {
        let day_offset = rng.gen_range(0..num_days);
        let date = ctx.horizon.start_date + Duration::days(day_offset);

        let earliest = crate::astro::lst_to_utc(date, proposal.lst_start, ctx.site.longitude.value());
        let mut latest = crate::astro::lst_to_utc(date, proposal.lst_start_end, ctx.site.longitude.value());
        if latest < earliest {
            latest += Duration::days(1);
        }

        let span_seconds = (latest - earliest).num_seconds().max(0);
        let offset = if span_seconds > 0 {
            rng.gen_range(0..=span_seconds)
        } else {
            0
        };
        let candidate = earliest + Duration::seconds(offset);

        if proposal.feasible(candidate, ctx.antennas_available) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::ObserverSite;
    use crate::model::{Horizon, Proposal};
    use chrono::{NaiveDate, NaiveTime};
    use rand::SeedableRng;

    fn proposal(id: i64, duration_s: i64) -> Proposal {
        Proposal {
            id,
            owner_email: "a@b.com".into(),
            duration_seconds: duration_s,
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

    fn ctx_with(proposals: Vec<Proposal>) -> Arc<OptimizerContext> {
        OptimizerContext::new(
            proposals,
            Horizon::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
            ),
            ObserverSite::ska(),
            64,
            1,
        )
    }

    #[test]
    fn clash_seconds_matches_manual_overlap() {
        let ctx = ctx_with(vec![proposal(1, 3600), proposal(2, 3600)]);
        let mut s = Schedule::empty(Arc::clone(&ctx));
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            .and_utc();
        s.bindings[0] = Some(t0);
        s.bindings[1] = Some(t0 + Duration::minutes(30));
        assert_eq!(s.clash_seconds(), 1800.0);
        assert_eq!(s.clash_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn repair_eliminates_all_clashes_idempotently() {
        let ctx = ctx_with(vec![proposal(1, 3600), proposal(2, 3600), proposal(3, 3600)]);
        let mut s = Schedule::empty(Arc::clone(&ctx));
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            .and_utc();
        s.bindings[0] = Some(t0);
        s.bindings[1] = Some(t0 + Duration::minutes(30));
        s.bindings[2] = Some(t0 + Duration::minutes(45));

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let repaired = s.repair(&mut rng);
        assert_eq!(repaired.clash_seconds(), 0.0);

        let mut rng2 = rand::rngs::StdRng::seed_from_u64(9);
        let repaired_again = repaired.repair(&mut rng2);
        assert_eq!(repaired_again.clash_seconds(), 0.0);
        assert_eq!(repaired_again.num_scheduled(), repaired.num_scheduled());
    }

    #[test]
    fn crossover_children_are_coverage_valid() {
        let ctx = ctx_with(vec![proposal(1, 60), proposal(2, 60), proposal(3, 60)]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let a = Schedule::new_random(Arc::clone(&ctx), &mut rng);
        let b = Schedule::new_random(Arc::clone(&ctx), &mut rng);
        let child = a.crossover(&b, &mut rng);
        assert_eq!(child.len(), ctx.len());
    }

    #[test]
    fn mutation_produces_fresh_instance_with_cleared_cache() {
        let ctx = ctx_with(vec![proposal(1, 60)]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let mut s = Schedule::new_random(Arc::clone(&ctx), &mut rng);
        s.set_cached_fitness(0.5);
        let mutated = s.mutate(1.0, &mut rng);
        assert_eq!(mutated.cached_fitness(), None);
    }
}

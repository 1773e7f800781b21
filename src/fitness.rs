//! The direct-encoding fitness evaluator (C4).
//!
//! Grounded on `ga/individual.py`'s `compute_fitness`: `F(S) = ((D - C) / D)
//! · 0.95^U` when at least one binding is scheduled, else `0.0`, clamped to
//! `[0, 1]`.

use crate::model::Schedule;

/// Evaluate and cache `schedule`'s fitness, returning the value. A cached
/// value from a prior call is reused as-is; callers that mutate a schedule
/// get a fresh instance with a cleared cache (see [`Schedule::mutate`] /
/// [`Schedule::crossover`]), so staleness cannot occur through this API.
pub fn evaluate(schedule: &mut Schedule) -> f64 {
    if let Some(cached) = schedule.cached_fitness() {
        return cached;
    }
    let value = compute(schedule);
    schedule.set_cached_fitness(value);
    value
}

/// Pure computation, independent of caching.
fn compute(schedule: &Schedule) -> f64 {
    if schedule.num_scheduled() == 0 {
        return 0.0;
    }

    let total_duration: f64 = schedule
        .context()
        .proposals
        .iter()
        .map(|p| p.duration_seconds as f64)
        .sum();
    if total_duration <= 0.0 {
        return 0.0;
    }

    let clash = schedule.clash_seconds();
    let unscheduled = schedule.num_unscheduled() as i32;

    let coverage = ((total_duration - clash) / total_duration).max(0.0);
    (coverage * 0.95_f64.powi(unscheduled)).clamp(0.0, 1.0)
}

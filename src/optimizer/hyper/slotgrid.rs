//! A fixed-duration discretization of the planning horizon, used by the
//! hyper-heuristic decoder to place proposals by greedy construction.
//!
//! Grounded on `util.py`'s interval-tree-backed "possible periods" helper,
//! replacing continuous feasibility search with a discrete grid cheap
//! enough to re-scan once per decode step.

use chrono::{DateTime, Duration, Utc};

use crate::model::Proposal;
use crate::optimizer::context::OptimizerContext;

/// A bitmap of free/occupied fixed-duration slots spanning the horizon.
pub struct SlotGrid {
    horizon_start: DateTime<Utc>,
    slot_duration: Duration,
    occupied: Vec<bool>,
}

impl SlotGrid {
    pub fn new(ctx: &OptimizerContext, slot_duration_seconds: f64) -> Self {
        let slot_duration = Duration::milliseconds((slot_duration_seconds * 1000.0) as i64);
        let total_seconds = ctx.horizon.seconds();
        let num_slots = (total_seconds / slot_duration_seconds).ceil() as usize;
        Self {
            horizon_start: ctx.horizon.start_instant(),
            slot_duration,
            occupied: vec![false; num_slots.max(1)],
        }
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    pub fn slot_start(&self, index: usize) -> DateTime<Utc> {
        self.horizon_start + self.slot_duration * index as i32
    }

    /// Number of contiguous slots a duration needs, rounded up.
    pub fn slots_needed(&self, duration_seconds: i64) -> usize {
        let slot_ms = self.slot_duration.num_milliseconds().max(1);
        let duration_ms = duration_seconds * 1000;
        ((duration_ms + slot_ms - 1) / slot_ms).max(1) as usize
    }

    fn run_length_from(&self, start: usize) -> usize {
        let mut run = 0;
        while start + run < self.occupied.len() && !self.occupied[start + run] {
            run += 1;
        }
        run
    }

    /// Candidate start indices for `proposal`: every slot index whose start
    /// instant passes [`Proposal::feasible`] and has at least
    /// `slots_needed` contiguous free slots ahead of it. Returned as
    /// `(slot_index, contiguous_free_run_length)` pairs for the fit-based
    /// slot heuristics.
    pub fn candidate_starts(&self, proposal: &Proposal, ctx: &OptimizerContext) -> Vec<(usize, usize)> {
        let needed = self.slots_needed(proposal.duration_seconds);
        let mut candidates = Vec::new();
        let mut index = 0;
        while index < self.occupied.len() {
            if self.occupied[index] {
                index += 1;
                continue;
            }
            let run = self.run_length_from(index);
            if run >= needed {
                let start = self.slot_start(index);
                if proposal.feasible(start, ctx.antennas_available) {
                    candidates.push((index, run));
                }
            }
            index += run.max(1);
        }
        candidates
    }

    pub fn occupy(&mut self, start_index: usize, count: usize) {
        let end = (start_index + count).min(self.occupied.len());
        for slot in &mut self.occupied[start_index..end] {
            *slot = true;
        }
    }

    pub fn num_free(&self) -> usize {
        self.occupied.iter().filter(|&&occupied| !occupied).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::ObserverSite;
    use crate::model::Horizon;
    use chrono::{NaiveDate, NaiveTime};

    fn proposal(duration_s: i64) -> Proposal {
        Proposal {
            id: 1,
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

    fn ctx() -> std::sync::Arc<OptimizerContext> {
        OptimizerContext::new(
            vec![proposal(3600)],
            Horizon::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ),
            ObserverSite::ska(),
            64,
            1,
        )
    }

    #[test]
    fn slots_needed_rounds_up() {
        let ctx = ctx();
        let grid = SlotGrid::new(&ctx, 60.0);
        assert_eq!(grid.slots_needed(90), 2);
        assert_eq!(grid.slots_needed(60), 1);
    }

    #[test]
    fn occupying_removes_candidate_overlapping_the_run() {
        let ctx = ctx();
        let mut grid = SlotGrid::new(&ctx, 60.0);
        let p = proposal(120);
        let before = grid.candidate_starts(&p, &ctx);
        assert!(!before.is_empty());
        grid.occupy(0, grid.len());
        let after = grid.candidate_starts(&p, &ctx);
        assert!(after.is_empty());
    }

    #[test]
    fn num_free_decreases_after_occupy() {
        let ctx = ctx();
        let mut grid = SlotGrid::new(&ctx, 60.0);
        let total = grid.len();
        grid.occupy(0, 5);
        assert_eq!(grid.num_free(), total - 5);
    }
}

//! Decodes a [`HeuristicGenome`] into a schedule by greedy construction.
//!
//! Step through the genome cyclically, pick a proposal then a slot; on
//! failure, rotate to the next gene and count consecutive failures; after
//! `L` consecutive failures the remaining proposals are marked unplaceable
//! and decoding stops.

use std::sync::Arc;

use rand::Rng;

use crate::model::Schedule;
use crate::optimizer::context::OptimizerContext;

use super::genome::HeuristicGenome;
use super::slotgrid::SlotGrid;

/// Outcome of decoding one genome.
#[derive(Clone)]
pub struct DecodeResult {
    pub schedule: Schedule,
    /// Proposal indices (into `ctx.proposals`) that the decoder gave up on
    /// after `L` consecutive rotation failures.
    pub unplaceable: Vec<usize>,
    /// Free slots left in the grid once decoding stopped.
    pub empty_slots: usize,
}

/// Infeasibility short-circuit (§4.6): before evolution begins, run a
/// cheap first-fit placement attempt for each proposal against a fresh,
/// empty slot grid. A proposal with no candidate start here can never be
/// placed regardless of ordering, so every decode can skip straight past
/// it instead of spending rotation budget discovering that repeatedly.
pub fn first_fit_impossible(ctx: &Arc<OptimizerContext>, slot_duration_seconds: f64) -> Vec<usize> {
    let grid = SlotGrid::new(ctx, slot_duration_seconds);
    (0..ctx.len())
        .filter(|&i| grid.candidate_starts(ctx.proposal(i), ctx).is_empty())
        .collect()
}

pub fn decode(
    genome: &HeuristicGenome,
    ctx: &Arc<OptimizerContext>,
    slot_duration_seconds: f64,
    known_impossible: &[usize],
    rng: &mut impl Rng,
) -> DecodeResult {
    let l = genome.len().max(1);
    let mut grid = SlotGrid::new(ctx, slot_duration_seconds);
    let known: std::collections::HashSet<usize> = known_impossible.iter().copied().collect();
    let mut remaining: Vec<usize> = (0..ctx.len()).filter(|i| !known.contains(i)).collect();
    let mut bindings = vec![None; ctx.len()];
    let mut unplaceable: Vec<usize> = known_impossible.to_vec();

    let mut step = 0usize;
    let mut consecutive_failures = 0usize;

    while !remaining.is_empty() {
        if consecutive_failures >= l {
            unplaceable.extend(remaining.drain(..));
            break;
        }

        let proposal_heuristic = genome.proposal_heuristic(step);
        let slot_heuristic = genome.slot_heuristic(step);
        step += 1;

        let Some(remaining_index) = proposal_heuristic.select(&remaining, ctx, rng) else {
            consecutive_failures += 1;
            continue;
        };
        let proposal_index = remaining[remaining_index];
        let proposal = ctx.proposal(proposal_index);

        let candidates = grid.candidate_starts(proposal, ctx);
        let Some(slot_index) = slot_heuristic.select(&candidates, &grid, grid.slots_needed(proposal.duration_seconds), rng) else {
            consecutive_failures += 1;
            continue;
        };

        bindings[proposal_index] = Some(grid.slot_start(slot_index));
        grid.occupy(slot_index, grid.slots_needed(proposal.duration_seconds));
        remaining.remove(remaining_index);
        consecutive_failures = 0;
    }

    let empty_slots = grid.num_free();
    DecodeResult {
        schedule: Schedule::from_bindings(Arc::clone(ctx), bindings),
        unplaceable,
        empty_slots,
    }
}

/// Hyper-heuristic fitness: `HARD · |unplaceable| + |empty slots|`, lower
/// is better.
pub fn fitness(result: &DecodeResult, hard_constraint_penalty: u64) -> u64 {
    hard_constraint_penalty * result.unplaceable.len() as u64 + result.empty_slots as u64
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

    fn ctx(proposals: Vec<Proposal>) -> Arc<OptimizerContext> {
        OptimizerContext::new(
            proposals,
            Horizon::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ),
            ObserverSite::ska(),
            64,
            7,
        )
    }

    #[test]
    fn decodes_every_proposal_when_ample_room() {
        let context = ctx(vec![proposal(1, 600), proposal(2, 600), proposal(3, 600)]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let genome = HeuristicGenome::random(4, &mut rng);
        let result = decode(&genome, &context, 60.0, &[], &mut rng);
        assert!(result.unplaceable.is_empty());
        assert_eq!(result.schedule.num_scheduled(), 3);
    }

    #[test]
    fn impossible_proposal_ends_up_unplaceable() {
        let mut impossible = proposal(1, 600);
        impossible.minimum_antennas = 10_000;
        let context = ctx(vec![impossible]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let genome = HeuristicGenome::random(2, &mut rng);
        let result = decode(&genome, &context, 60.0, &[], &mut rng);
        assert_eq!(result.unplaceable.len(), 1);
    }

    #[test]
    fn first_fit_impossible_flags_proposals_that_can_never_be_placed() {
        let mut impossible = proposal(1, 600);
        impossible.minimum_antennas = 10_000;
        let context = ctx(vec![impossible, proposal(2, 600)]);
        let flagged = first_fit_impossible(&context, 60.0);
        assert_eq!(flagged, vec![0]);
    }

    #[test]
    fn known_impossible_proposals_are_excluded_from_rotation_budget() {
        let mut impossible = proposal(1, 600);
        impossible.minimum_antennas = 10_000;
        let context = ctx(vec![impossible, proposal(2, 600)]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let genome = HeuristicGenome::random(2, &mut rng);
        let result = decode(&genome, &context, 60.0, &[0], &mut rng);
        assert_eq!(result.unplaceable, vec![0]);
        assert_eq!(result.schedule.num_scheduled(), 1);
    }

    #[test]
    fn fitness_penalizes_unplaceable_far_more_than_empty_slots() {
        let empty = DecodeResult {
            schedule: Schedule::empty(ctx(vec![proposal(1, 600)])),
            unplaceable: vec![0],
            empty_slots: 5,
        };
        assert_eq!(fitness(&empty, 100_000), 100_005);
    }
}

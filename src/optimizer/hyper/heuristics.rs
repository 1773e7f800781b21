//! The proposal-selection and slot-selection heuristic families (C6).
//!
//! `backend`'s own `heuristics.py` only imports these names without bodies;
//! the concrete rules below are grounded instead on the constraint-checking
//! functions in `hard_constraints.py` (night/antenna/sunrise-sunset tests)
//! and the greedy-placement helpers in `util.py`.

use rand::Rng;

use crate::optimizer::context::OptimizerContext;

use super::slotgrid::SlotGrid;

/// Picks the next proposal to place from the proposals still remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalHeuristic {
    Shortest,
    Longest,
    MinAntennas,
    MaxAntennas,
    EarliestLstStart,
    LatestLstStart,
    Random,
    RandomNightOnly,
    ShortestNightOnly,
    LongestNightOnly,
    EarliestNightOnly,
    LatestNightOnly,
}

pub const NUM_PROPOSAL_HEURISTICS: usize = 12;

impl ProposalHeuristic {
    pub const ALL: [ProposalHeuristic; NUM_PROPOSAL_HEURISTICS] = [
        ProposalHeuristic::Shortest,
        ProposalHeuristic::Longest,
        ProposalHeuristic::MinAntennas,
        ProposalHeuristic::MaxAntennas,
        ProposalHeuristic::EarliestLstStart,
        ProposalHeuristic::LatestLstStart,
        ProposalHeuristic::Random,
        ProposalHeuristic::RandomNightOnly,
        ProposalHeuristic::ShortestNightOnly,
        ProposalHeuristic::LongestNightOnly,
        ProposalHeuristic::EarliestNightOnly,
        ProposalHeuristic::LatestNightOnly,
    ];

    fn is_night_only(self) -> bool {
        matches!(
            self,
            ProposalHeuristic::RandomNightOnly
                | ProposalHeuristic::ShortestNightOnly
                | ProposalHeuristic::LongestNightOnly
                | ProposalHeuristic::EarliestNightOnly
                | ProposalHeuristic::LatestNightOnly
        )
    }

    /// Pick an index into `remaining` (itself a list of proposal indices
    /// into `ctx.proposals`), or `None` if this heuristic has nothing
    /// eligible among `remaining` (e.g. a `*NightOnly` variant when no
    /// remaining proposal requests a night observation).
    pub fn select(self, remaining: &[usize], ctx: &OptimizerContext, rng: &mut impl Rng) -> Option<usize> {
        let eligible: Vec<usize> = if self.is_night_only() {
            (0..remaining.len())
                .filter(|&i| ctx.proposal(remaining[i]).night_obs)
                .collect()
        } else {
            (0..remaining.len()).collect()
        };
        if eligible.is_empty() {
            return None;
        }

        let key = |i: usize| -> (i64, u32, chrono::NaiveTime) {
            let p = ctx.proposal(remaining[i]);
            (p.duration_seconds, p.minimum_antennas, p.lst_start)
        };

        let pick = match self {
            ProposalHeuristic::Shortest | ProposalHeuristic::ShortestNightOnly => {
                eligible.iter().copied().min_by_key(|&i| key(i).0)
            }
            ProposalHeuristic::Longest | ProposalHeuristic::LongestNightOnly => {
                eligible.iter().copied().max_by_key(|&i| key(i).0)
            }
            ProposalHeuristic::MinAntennas => eligible.iter().copied().min_by_key(|&i| key(i).1),
            ProposalHeuristic::MaxAntennas => eligible.iter().copied().max_by_key(|&i| key(i).1),
            ProposalHeuristic::EarliestLstStart | ProposalHeuristic::EarliestNightOnly => {
                eligible.iter().copied().min_by_key(|&i| key(i).2)
            }
            ProposalHeuristic::LatestLstStart | ProposalHeuristic::LatestNightOnly => {
                eligible.iter().copied().max_by_key(|&i| key(i).2)
            }
            ProposalHeuristic::Random | ProposalHeuristic::RandomNightOnly => {
                Some(eligible[rng.gen_range(0..eligible.len())])
            }
        };
        pick
    }
}

/// Picks a placement for a proposal among the feasible candidate slot
/// starts returned by [`SlotGrid::candidate_starts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotHeuristic {
    FirstValid,
    LastValid,
    RandomValid,
    TightestFit,
    LoosestFit,
}

pub const NUM_SLOT_HEURISTICS: usize = 5;

impl SlotHeuristic {
    pub const ALL: [SlotHeuristic; NUM_SLOT_HEURISTICS] = [
        SlotHeuristic::FirstValid,
        SlotHeuristic::LastValid,
        SlotHeuristic::RandomValid,
        SlotHeuristic::TightestFit,
        SlotHeuristic::LoosestFit,
    ];

    /// `candidates` is a list of `(slot_index, run_length_available)` pairs:
    /// the contiguous run of free slots starting at `slot_index`, used by
    /// the fit-based variants to prefer tight or loose placements.
    pub fn select(self, candidates: &[(usize, usize)], _grid: &SlotGrid, needed: usize, rng: &mut impl Rng) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        match self {
            SlotHeuristic::FirstValid => candidates.iter().map(|&(i, _)| i).min(),
            SlotHeuristic::LastValid => candidates.iter().map(|&(i, _)| i).max(),
            SlotHeuristic::RandomValid => Some(candidates[rng.gen_range(0..candidates.len())].0),
            SlotHeuristic::TightestFit => candidates
                .iter()
                .min_by_key(|&&(_, run)| run.saturating_sub(needed))
                .map(|&(i, _)| i),
            SlotHeuristic::LoosestFit => candidates
                .iter()
                .max_by_key(|&&(_, run)| run.saturating_sub(needed))
                .map(|&(i, _)| i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::ObserverSite;
    use crate::model::{Horizon, Proposal};
    use chrono::{NaiveDate, NaiveTime};
    use rand::SeedableRng;
    use std::sync::Arc;

    fn proposal(id: i64, duration_s: i64, night_obs: bool) -> Proposal {
        Proposal {
            id,
            owner_email: "a@b.com".into(),
            duration_seconds: duration_s,
            lst_start: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            lst_start_end: NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
            night_obs,
            avoid_sunrise_sunset: false,
            minimum_antennas: 1,
            priority: 1.0,
            preferred_dates: vec![],
            avoided_dates: vec![],
        }
    }

    fn ctx() -> Arc<OptimizerContext> {
        OptimizerContext::new(
            vec![proposal(1, 600, false), proposal(2, 1800, true), proposal(3, 300, false)],
            Horizon::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            ),
            ObserverSite::ska(),
            64,
            1,
        )
    }

    #[test]
    fn shortest_picks_minimum_duration() {
        let ctx = ctx();
        let remaining = vec![0, 1, 2];
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let pick = ProposalHeuristic::Shortest.select(&remaining, &ctx, &mut rng).unwrap();
        assert_eq!(remaining[pick], 2);
    }

    #[test]
    fn night_only_variant_returns_none_when_nothing_eligible() {
        let ctx = ctx();
        let remaining = vec![0, 2];
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        assert!(ProposalHeuristic::ShortestNightOnly.select(&remaining, &ctx, &mut rng).is_none());
    }

    #[test]
    fn night_only_variant_restricts_to_night_obs_proposals() {
        let ctx = ctx();
        let remaining = vec![0, 1, 2];
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let pick = ProposalHeuristic::LongestNightOnly.select(&remaining, &ctx, &mut rng).unwrap();
        assert_eq!(remaining[pick], 1);
    }
}

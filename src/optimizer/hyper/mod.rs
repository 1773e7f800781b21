//! Hyper-heuristic optimizer (C6): an alternative encoding whose genome is
//! a sequence of (proposal-selection, slot-selection) heuristic indices,
//! decoded to a schedule by greedy construction.

pub mod decoder;
pub mod genome;
pub mod heuristics;
pub mod optimizer;
pub mod slotgrid;

pub use decoder::{decode, DecodeResult};
pub use genome::HeuristicGenome;
pub use heuristics::{ProposalHeuristic, SlotHeuristic};
pub use optimizer::{HyperHeuristicOptimizer, HyperHeuristicParams, HyperHeuristicResult};
pub use slotgrid::SlotGrid;

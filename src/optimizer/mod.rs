//! The two optimizer families: direct-encoding genetic search (C5) and the
//! hyper-heuristic alternative encoding (C6), sharing the same
//! [`context::OptimizerContext`] and thread-local RNG.

pub mod context;
pub mod direct;
pub mod hyper;
pub mod rng;

pub use context::OptimizerContext;
pub use direct::{DirectOptimizer, DirectOptimizerParams};

/// A cooperative cancellation signal, checked at generation boundaries.
///
/// A bare atomic flag rather than a job-id lookup, since the optimizer has
/// no job registry of its own.
#[derive(Clone, Default)]
pub struct CancellationToken(std::sync::Arc<std::sync::atomic::AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(std::sync::atomic::Ordering::Relaxed)
    }
}

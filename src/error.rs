//! Crate-wide error taxonomy.
//!
//! Per the error handling design: nothing inside the optimizer's inner loops
//! may raise. `feasible`, fitness evaluation, crossover, and mutation are
//! total functions over their inputs and return plain booleans/floats.
//! `SchedulerError` is reserved for ingestion, setup, and the HTTP boundary.

pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// A time-of-day, date, or datetime string could not be parsed.
    /// Raised by CSV/JSON ingestion; never propagated into the optimizer.
    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// A proposal cannot be scheduled anywhere in the horizon and was
    /// dropped from the optimizer input (direct encoding) or marked
    /// unplaceable up front (hyper-heuristic).
    #[error("proposal {proposal_id} is not schedulable within the horizon")]
    ProposalUnschedulable { proposal_id: i64 },

    /// The sun never rises or never sets on the queried date at the
    /// configured site. Not fatal: callers treat the affected feasibility
    /// test as failed for that day and move on.
    #[error("sun never rises or sets on {0}")]
    SunNeverRisesOrSets(chrono::NaiveDate),

    /// The optimizer was asked to run over an empty population. Fatal.
    #[error("optimizer population is empty")]
    EmptyPopulation,

    /// A cooperative cancellation signal was observed at a generation
    /// boundary. Not an error to the caller — the current best individual
    /// is returned.
    #[error("run cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

use thiserror::Error;

/// Inputs the search cannot start from. Raised before the first generation.
#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    #[error("city list is empty")]
    NoCities,
    #[error("time budget must be positive, got {budget}s")]
    NonPositiveBudget { budget: f64 },
    #[error("population size must be at least 1")]
    InvalidPopulationSize,
    #[error("selection rate must be in (0, 100], got {rate}")]
    InvalidSelectionRate { rate: f64 },
    #[error("mutation rate must be positive, got {rate}")]
    InvalidMutationRate { rate: f64 },
    #[error("invalid timing or mutation schedule: {reason}")]
    InvalidSchedule { reason: String },
    #[error("invalid hyperparameters: {reason}")]
    InvalidHyperparameters { reason: String },
}

use thiserror::Error;

/// Errors from the fuzzy layer (membership shapes, variables, rule base, inference).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FuzzyError {
    #[error("invalid membership function [{left}, {peak}, {right}]: need left <= peak <= right")]
    InvalidMembershipFunction { left: f64, peak: f64, right: f64 },
    #[error("invalid universe: {0}")]
    InvalidUniverse(&'static str),
    #[error("variable {variable} already has a term named {term}")]
    DuplicateTerm { variable: String, term: String },
    #[error("variable {variable} has no term named {term}")]
    UnknownTerm { variable: String, term: String },
    /// Aggregated output membership is zero everywhere; recoverable per step.
    #[error("no rule produced a nonzero output membership")]
    NoActiveRule,
}

/// Terminal velocity magnitude too small to divide by; recoverable, proximity reads 0.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ProximityError {
    #[error("terminal velocity {0} m/s is too close to zero to normalise against")]
    DegenerateDivisor(f64),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing parameters")]
    MissingParameters,
    #[error("missing timestep")]
    MissingTimestep,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

#[derive(Debug, Error, Clone)]
pub enum RunError {
    #[error("sample timestamps must be strictly increasing (sample {index})")]
    NonMonotonicTimestamps { index: usize },
    #[error("sample source error: {0}")]
    Source(String),
    #[error("deployment actuator error: {0}")]
    Actuator(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

//! Error taxonomy shared by model construction, inference and loading.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HazardError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HazardError {
    #[error("Malformed topology at '{location}': {reason}")]
    MalformedTopology { location: String, reason: String },
    #[error("Conflicting readings for sensor '{sensor}' at step {step}")]
    ConflictingEvidence { sensor: String, step: usize },
    #[error("Reading at step {step} names undeclared sensor '{sensor}'")]
    UnknownSensor { sensor: String, step: usize },
    #[error("Empty model: {0}")]
    EmptyModel(String),
    #[error("Time step {step} is outside the modeled range 0..{steps}")]
    InvalidTimeStep { step: usize, steps: usize },
    #[error("Probability '{name}' must lie in [0, 1], got {value}")]
    InvalidProbability { name: String, value: f64 },
    #[error("Inference failed: {0}")]
    InferenceFailure(String),
    #[error("Parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },
    #[error("Structural mismatch: {msg}")]
    Structure { msg: String },
    #[error("Config error: {0}")]
    Config(String),
}

impl HazardError {
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure { msg: msg.into() }
    }
}

/// Rejects NaN and anything outside the unit interval.
pub(crate) fn check_probability(name: &str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(HazardError::InvalidProbability { name: name.to_string(), value })
    }
}

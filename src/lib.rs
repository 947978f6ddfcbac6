//! Locates the most likely hazardous location in a monitored facility.
//!
//! A facility is a set of connected locations with noisy binary sensors. The
//! hazard state of every location is unrolled over the recorded time steps into
//! a Bayesian network, the sensor readings are bound as evidence, and exact
//! inference ranks the locations at the final step.

pub mod config;
pub mod display;
pub mod error;
pub mod graph;
pub mod inference;
pub mod loader;
pub mod model;
pub mod solver;

pub use config::SolverConfig;
pub use error::{HazardError, Result};
pub use inference::{DiscreteGraphicalModel, Distribution, Evidence};
pub use loader::parse_problem;
pub use model::{Problem, QueryMode, Resolution};
pub use solver::{HazardSolver, Session};

//! Facility description, its validation, and the temporal network built from it.
pub mod builder;
pub mod evidence;
pub mod facility;
pub mod problem;
pub mod resolver;
pub mod topology;
pub mod transition;

pub use builder::{NetworkTables, TemporalNetwork};
pub use evidence::bind;
pub use facility::{Facility, ObservationLog, SensorSpec};
pub use problem::{Problem, Reading, Sensor};
pub use resolver::{resolve, Belief, QueryMode, Resolution};
pub use topology::{parents_of, ParentSets};

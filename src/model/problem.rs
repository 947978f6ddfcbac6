//! Raw, name-based description of a monitored facility as handed over by the loader.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub name: String,
    /// The location the sensor is installed in.
    pub location: String,
    /// P(reading = true | hazard).
    pub tpr: f64,
    /// P(reading = true | no hazard).
    pub fpr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor: String,
    pub value: bool,
}

/// Everything needed to build the temporal network.
///
/// `readings[t]` holds the readings recorded at step `t`; the number of rounds
/// is the number of modeled time steps, including rounds with no readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub locations: Vec<String>,
    pub connections: Vec<(String, String)>,
    pub sensors: Vec<Sensor>,
    pub propagation: f64,
    pub readings: Vec<Vec<Reading>>,
}

impl Problem {
    pub fn steps(&self) -> usize {
        self.readings.len()
    }
}

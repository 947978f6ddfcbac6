use crate::error::{check_probability, HazardError, Result};
use crate::model::QueryMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Run settings, read from an optional TOML file.
///
/// ```toml
/// initial_hazard_probability = 0.5
/// parallel = true
/// output_dir = "output"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// P(hazard) for every location at step 0.
    pub initial_hazard_probability: f64,
    /// Run the per-location queries on the rayon pool.
    pub parallel: bool,
    pub output_dir: PathBuf,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { initial_hazard_probability: 0.5, parallel: false, output_dir: PathBuf::from("output") }
    }
}

impl SolverConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| HazardError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let cfg: SolverConfig = toml::from_str(text).map_err(|e| HazardError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("initial_hazard_probability", self.initial_hazard_probability)?;
        Ok(())
    }

    pub fn query_mode(&self) -> QueryMode {
        if self.parallel { QueryMode::Parallel } else { QueryMode::Sequential }
    }
}

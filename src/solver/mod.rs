//! Ties the pipeline together: validate, unroll, bind evidence, rank locations.
use crate::config::SolverConfig;
use crate::error::Result;
use crate::inference::Evidence;
use crate::model::{bind, resolve, Facility, Problem, Resolution, TemporalNetwork};
use tracing::{debug, info};

/// A problem that has been validated and unrolled, ready to be queried at any step.
#[derive(Debug, Clone)]
pub struct Session {
    facility: Facility,
    network: TemporalNetwork,
    evidence: Evidence,
}

impl Session {
    pub fn facility(&self) -> &Facility { &self.facility }
    pub fn network(&self) -> &TemporalNetwork { &self.network }
    pub fn evidence(&self) -> &Evidence { &self.evidence }
}

pub struct HazardSolver {
    config: SolverConfig,
}

impl HazardSolver {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn prepare(&self, problem: &Problem) -> Result<Session> {
        let facility = Facility::from_problem(problem)?;
        let log = facility.intern_readings(&problem.readings)?;
        let evidence = bind(&facility, &log)?;
        let network = TemporalNetwork::from_facility(&facility, &log, self.config.initial_hazard_probability)?;
        debug!(readings = evidence.len(), "evidence bound");
        Ok(Session { facility, network, evidence })
    }

    /// Ranks the locations at `step`.
    pub fn solve_at(&self, session: &Session, step: usize) -> Result<Resolution> {
        resolve(
            &session.network,
            &session.evidence,
            session.facility.locations(),
            step,
            self.config.query_mode(),
        )
    }

    /// Most likely hazardous location at the last recorded step.
    pub fn solve(&self, problem: &Problem) -> Result<Resolution> {
        let session = self.prepare(problem)?;
        let resolution = self.solve_at(&session, session.network.final_step())?;
        info!(
            location = %resolution.location,
            probability = resolution.probability,
            step = resolution.step,
            "resolved"
        );
        Ok(resolution)
    }
}

impl Default for HazardSolver {
    fn default() -> Self {
        Self { config: SolverConfig::default() }
    }
}

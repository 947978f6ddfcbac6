//! Conditional probability tables for hazard and reading nodes.
//!
//! The hazard transition rule is deliberately coarse: a location that was
//! already hazardous stays hazardous, a safe location with no hazardous
//! parent stays safe, and every other combination ignites with the same flat
//! propagation probability, no matter how many parents are hazardous.

use crate::error::{check_probability, Result};
use crate::graph::node::MAX_ARITY;
use crate::graph::Cpt;

/// Builds the transition table for a hazard node with `parent_count` parents.
///
/// The first parent is the location's own previous state and is the most
/// significant bit of the row index, so the first half of the rows are "was
/// safe" and the second half "was hazardous":
/// - second half: `P(true) = 1`,
/// - row 0 (every parent safe): `P(true) = 0`,
/// - the rest of the first half: `P(true) = propagation`.
pub fn transition_table(parent_count: usize, propagation: f64) -> Result<Cpt> {
    let propagation = check_probability("propagation", propagation)?;
    // A hazard node always has itself as a parent; let the Cpt constructor
    // report degenerate widths before anything is allocated.
    if parent_count == 0 || parent_count > MAX_ARITY {
        return Cpt::from_rows(parent_count, Vec::new());
    }
    let rows = 1usize << parent_count;
    let half = rows / 2;
    let mut p_true: Vec<f64> = (0..rows).map(|row| if row < half { propagation } else { 1.0 }).collect();
    p_true[0] = 0.0;
    Cpt::from_rows(parent_count, p_true)
}

/// Two-row table for a sensor: `P(true | safe) = fpr`, `P(true | hazard) = tpr`.
pub fn sensor_table(tpr: f64, fpr: f64) -> Result<Cpt> {
    Cpt::from_rows(1, vec![check_probability("fpr", fpr)?, check_probability("tpr", tpr)?])
}

/// Zero-parent table for the hazard state at step 0.
pub fn prior_table(p_true: f64) -> Result<Cpt> {
    Cpt::unconditional(check_probability("initial hazard probability", p_true)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HazardError;
    use rstest::rstest;

    #[rstest]
    #[case(1, 0.3)]
    #[case(2, 0.8)]
    #[case(3, 0.0)]
    #[case(4, 1.0)]
    #[case(6, 0.55)]
    fn test_bucketing_holds_for_every_row(#[case] n: usize, #[case] p: f64) {
        let cpt = transition_table(n, p).unwrap();
        assert_eq!(cpt.row_count(), 1 << n);
        for (assignment, p_true) in cpt.rows() {
            let own = assignment[0];
            if own {
                assert_eq!(p_true, 1.0);
            } else if assignment.iter().all(|b| !b) {
                assert_eq!(p_true, 0.0);
            } else {
                assert_eq!(p_true, p);
            }
        }
    }

    #[test]
    fn test_single_parent_table() {
        let cpt = transition_table(1, 0.4).unwrap();
        assert_eq!(cpt.p_true(&[false]), Some(0.0));
        assert_eq!(cpt.p_true(&[true]), Some(1.0));
    }

    #[test]
    fn test_flat_probability_regardless_of_hazardous_neighbour_count() {
        let cpt = transition_table(3, 0.25).unwrap();
        assert_eq!(cpt.p_true(&[false, true, false]), Some(0.25));
        assert_eq!(cpt.p_true(&[false, true, true]), Some(0.25));
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!(matches!(transition_table(2, 1.5), Err(HazardError::InvalidProbability { .. })));
        assert!(matches!(transition_table(0, 0.5), Err(HazardError::Structure { .. })));
        assert!(sensor_table(0.9, -0.1).is_err());
        assert!(prior_table(2.0).is_err());
    }

    #[test]
    fn test_sensor_rows() {
        let cpt = sensor_table(0.9, 0.05).unwrap();
        assert_eq!(cpt.p_true(&[false]), Some(0.05));
        assert_eq!(cpt.p_true(&[true]), Some(0.9));
        assert_eq!(prior_table(0.5).unwrap().p_true(&[]), Some(0.5));
    }
}

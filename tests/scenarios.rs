use hazard_locator::display::write_solution;
use hazard_locator::model::{Reading, Sensor};
use hazard_locator::{parse_problem, HazardError, HazardSolver, Problem, QueryMode, SolverConfig};
use rstest::rstest;
use std::fs;

fn solver(mode: QueryMode) -> HazardSolver {
    let config = SolverConfig { parallel: mode == QueryMode::Parallel, ..Default::default() };
    HazardSolver::new(config).unwrap()
}

fn belief(res: &hazard_locator::Resolution, location: &str) -> f64 {
    res.beliefs.iter().find(|b| b.location == location).map(|b| b.probability).unwrap()
}

#[test]
fn single_location_without_evidence_keeps_its_prior() {
    let problem = Problem { locations: vec!["atrium".into()], readings: vec![vec![]], ..Default::default() };
    let res = HazardSolver::default().solve(&problem).unwrap();
    assert_eq!(res.location, "atrium");
    assert!((res.probability - 0.5).abs() < 1e-12);
}

#[rstest]
#[case(QueryMode::Sequential)]
#[case(QueryMode::Parallel)]
fn sensor_alarm_pulls_belief_towards_its_location(#[case] mode: QueryMode) {
    let problem = Problem {
        locations: vec!["A".into(), "B".into()],
        connections: vec![("A".into(), "B".into())],
        sensors: vec![Sensor { name: "s".into(), location: "B".into(), tpr: 0.9, fpr: 0.1 }],
        propagation: 0.8,
        readings: vec![vec![], vec![Reading { sensor: "s".into(), value: true }]],
    };
    let res = solver(mode).solve(&problem).unwrap();
    let (a, b) = (belief(&res, "A"), belief(&res, "B"));
    assert!(a > 0.0 && a < 1.0);
    assert!(b > 0.0 && b < 1.0);
    assert!(b > a);
    assert_eq!(res.location, "B");
    // P(B1) = 0.7 before the reading; 0.7 * 0.9 / 0.66
    assert!((b - 0.63 / 0.66).abs() < 1e-9);
    assert!((a - 0.59 / 0.66).abs() < 1e-9);
}

#[test]
fn isolated_location_without_propagation_never_changes() {
    let problem = Problem { locations: vec!["cellar".into()], readings: vec![vec![]; 5], ..Default::default() };
    let solver = HazardSolver::default();
    let session = solver.prepare(&problem).unwrap();
    for step in 0..5 {
        let res = solver.solve_at(&session, step).unwrap();
        assert!((res.probability - 0.5).abs() < 1e-12, "step {} drifted to {}", step, res.probability);
    }
}

#[test]
fn conflicting_readings_are_reported() {
    let problem = parse_problem("R a\nS s1:a:0.9:0.1\nM s1:T s1:F\n").unwrap();
    let err = HazardSolver::default().solve(&problem).unwrap_err();
    assert_eq!(err, HazardError::ConflictingEvidence { sensor: "s1".into(), step: 0 });
}

#[test]
fn readings_from_undeclared_sensors_are_reported() {
    let problem = parse_problem("R a\nM ghost:T\n").unwrap();
    let err = HazardSolver::default().solve(&problem).unwrap_err();
    assert_eq!(err, HazardError::UnknownSensor { sensor: "ghost".into(), step: 0 });
}

#[test]
fn connection_to_an_undeclared_location_is_reported() {
    let problem = parse_problem("R a\nC a,b\nM\n").unwrap();
    let err = HazardSolver::default().solve(&problem).unwrap_err();
    assert!(matches!(err, HazardError::MalformedTopology { .. }));
}

#[test]
fn file_in_file_out() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("museum.txt");
    fs::write(
        &input,
        "R hall gallery vault\n\
         C hall,gallery gallery,vault\n\
         S s1:hall:0.95:0.05 s2:vault:0.9:0.1\n\
         P 0.6\n\
         M s1:F s2:F\n\
         M s1:F\n\
         M s1:F s2:T\n",
    )
    .unwrap();

    let problem = parse_problem(&fs::read_to_string(&input).unwrap()).unwrap();
    let res = HazardSolver::default().solve(&problem).unwrap();
    assert_eq!(res.step, 2);
    assert_eq!(res.location, "vault");

    let out_dir = dir.path().join("output");
    let path = write_solution(&out_dir, &input, &res).unwrap();
    assert_eq!(path, out_dir.join("museum.txt"));
    let written = fs::read_to_string(path).unwrap();
    assert_eq!(written, format!("vault {}\n", res.probability));
}

#[test]
fn sequential_and_parallel_runs_agree_on_a_larger_facility() {
    let text = "\
R r0 r1 r2 r3 r4 r5
C r0,r1 r1,r2 r2,r3 r3,r4 r4,r5 r5,r0 r1,r4
S a:r0:0.8:0.2 b:r3:0.9:0.05 c:r5:0.7:0.1
P 0.35
M a:F
M a:F b:F
M c:T
M b:T c:T
";
    let problem = parse_problem(text).unwrap();
    let seq = solver(QueryMode::Sequential).solve(&problem).unwrap();
    let par = solver(QueryMode::Parallel).solve(&problem).unwrap();
    assert_eq!(seq, par);
    for b in &seq.beliefs {
        assert!((0.0..=1.0).contains(&b.probability));
    }
}

#[test]
fn hundreds_of_alternating_readings_do_not_underflow() {
    let mut text = String::from("R gallery annex\nC gallery,annex\nS s1:gallery:0.9:0.1\nP 0.3\n");
    for step in 0..600 {
        text.push_str(if step % 2 == 0 { "M s1:T\n" } else { "M s1:F\n" });
    }
    let problem = parse_problem(&text).unwrap();
    let res = HazardSolver::default().solve(&problem).unwrap();
    assert_eq!(res.step, 599);
    for b in &res.beliefs {
        assert!(b.probability.is_finite() && (0.0..=1.0).contains(&b.probability));
    }
}

//! JSON shape of the records exchanged with the surrounding application.

#![cfg(feature = "serde")]

use u_timetable::models::{CourseRecord, LecturerRecord};
use u_timetable::{Algorithm, Optimizer, Outcome, RunConfig};

#[test]
fn test_records_from_json() {
    let courses: Vec<CourseRecord> = serde_json::from_str(
        r#"[{"id": 1, "name": "Algebra", "duration": 2, "required_rooms": [0, 1], "lecturer_id": 10}]"#,
    )
    .expect("course json");
    let lecturers: Vec<LecturerRecord> = serde_json::from_str(
        r#"[{"id": 10, "name": "Dr. Noether", "available_slots": [[0, 0], [0, 1], [1, 2], [1, 3]]}]"#,
    )
    .expect("lecturer json");

    assert_eq!(courses[0].required_rooms, vec![0, 1]);
    assert_eq!(lecturers[0].available_slots.len(), 4);
    assert!(lecturers[0].preferred_slots.is_empty());

    let result = Optimizer::new(&courses, &lecturers, RunConfig::pso(5))
        .expect("valid input")
        .run();
    let json = serde_json::to_value(&result).expect("result json");
    assert_eq!(json["sessions"][0]["course_id"], 1);
    assert!(json["trace"].is_array());
    assert!(json["outcome"].is_string());
}

#[test]
fn test_run_config_from_partial_json() {
    let config: RunConfig =
        serde_json::from_str(r#"{"algorithm": "ga", "seed": 9, "max_steps": 30}"#)
            .expect("config json");
    assert_eq!(config.algorithm, Algorithm::Ga);
    assert_eq!(config.seed, 9);
    assert_eq!(config.ga_config().max_generations, 30);
    assert_eq!(config.ga.population_size, 100);
}

#[test]
fn test_run_config_accepts_bundle_key_names() {
    let config: RunConfig = serde_json::from_str(
        r#"{
            "algorithm": "pso",
            "seed": 3,
            "iteration_or_generation_budget": 60,
            "patience": 10,
            "pso": {"particles": 20, "inertia_min": 0.4, "inertia_max": 0.9, "c1": 1.5, "c2": 2.5, "v_max": 1.0},
            "ga": {"population": 60, "mutation_rate_min": 0.1, "mutation_rate_max": 0.3,
                   "tournament_size": 4, "elite_size": 3, "crossover": "uniform"}
        }"#,
    )
    .expect("config json");

    assert_eq!(config.algorithm, Algorithm::Pso);
    assert_eq!(config.max_steps, Some(60));
    assert_eq!(config.pso.swarm_size, 20);
    assert!((config.pso.cognitive - 1.5).abs() < 1e-12);
    assert!((config.pso.social - 2.5).abs() < 1e-12);
    assert!((config.pso.max_velocity - 1.0).abs() < 1e-12);
    assert_eq!(config.ga.population_size, 60);
    assert_eq!(config.ga.tournament_size, 4);
    assert_eq!(config.ga.elite_size, 3);

    let pso = config.pso_config();
    assert_eq!(pso.max_iterations, 60);
    assert_eq!(pso.stagnation_limit, 10);
    assert_eq!(config.ga_config().max_generations, 60);
    assert!(config.validate().is_ok());
}

#[test]
fn test_outcome_is_snake_case() {
    let json = serde_json::to_string(&Outcome::InfeasibleAfterBudget).expect("outcome json");
    assert_eq!(json, r#""infeasible_after_budget""#);
}

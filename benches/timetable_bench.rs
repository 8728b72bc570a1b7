//! Criterion benchmarks for the timetabling engines.
//!
//! Uses synthetic instances of growing size so the measurements cover
//! decoding, constraint evaluation and the engine loops together.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_timetable::evaluator::SoftWeights;
use u_timetable::ga::{GaConfig, GaRunner};
use u_timetable::models::{CourseRecord, Instance, LecturerRecord};
use u_timetable::problem::{TimetableProblem, VectorProblem};
use u_timetable::pso::{PsoConfig, PsoRunner};

// ===========================================================================
// Synthetic instance: `n` courses shared among `n / 4 + 1` lecturers
// ===========================================================================

fn synthetic_problem(n: u32) -> TimetableProblem {
    let lecturer_count = n / 4 + 1;
    let lecturers: Vec<LecturerRecord> = (0..lecturer_count)
        .map(|id| LecturerRecord::new(id, format!("Lecturer {id}")))
        .collect();
    let courses: Vec<CourseRecord> = (0..n)
        .map(|id| {
            let rooms = vec![id % 8, (id + 3) % 8];
            CourseRecord::new(id, format!("Course {id}"), 1 + id % 3, rooms, id % lecturer_count)
        })
        .collect();
    let instance = Instance::from_records(&courses, &lecturers).expect("synthetic instance is valid");
    TimetableProblem::new(instance, SoftWeights::default())
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for n in [10u32, 40, 120] {
        let problem = synthetic_problem(n);
        let genes = problem.initial_vector(&mut StdRng::seed_from_u64(42));
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, genes), |b, (p, g)| {
            b.iter(|| black_box(p.evaluate(black_box(g))))
        });
    }
    group.finish();
}

fn bench_pso(c: &mut Criterion) {
    let mut group = c.benchmark_group("pso_timetable");
    group.sample_size(10);

    for (n, swarm, iters) in [(10u32, 30usize, 50usize), (40, 50, 30), (120, 50, 20)] {
        let problem = synthetic_problem(n);
        let config = PsoConfig::default()
            .with_swarm_size(swarm)
            .with_max_iterations(iters)
            .with_stagnation_limit(0);
        group.bench_with_input(
            BenchmarkId::new(format!("c{}_s{}_i{}", n, swarm, iters), n),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(42);
                    black_box(PsoRunner::run(black_box(p), black_box(c), &mut rng))
                })
            },
        );
    }
    group.finish();
}

fn bench_ga(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_timetable");
    group.sample_size(10);

    for (n, pop, gen) in [(10u32, 50usize, 50usize), (40, 100, 30), (120, 100, 20)] {
        let problem = synthetic_problem(n);
        let config = GaConfig::default()
            .with_population_size(pop)
            .with_max_generations(gen)
            .with_stagnation_limit(0);
        group.bench_with_input(
            BenchmarkId::new(format!("c{}_p{}_g{}", n, pop, gen), n),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(42);
                    black_box(GaRunner::run(black_box(p), black_box(c), &mut rng))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_pso, bench_ga);
criterion_main!(benches);

//! # Kinematics Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arm_lib::kinematics::{Joint6D, Pose6D, Solver};

fn kinematics_benchmark(c: &mut Criterion) {
    let solver = Solver::default();

    let joints = Joint6D::new(10.0, 20.0, 100.0, 30.0, 40.0, 50.0);
    let pose = solver.solve_fk(&joints).metres_to_mm();

    // Same target without the rotation matrix, as MoveL builds it
    let euler_pose = Pose6D::from_euler(pose.x, pose.y, pose.z, pose.a, pose.b, pose.c);

    c.bench_function("Solver::solve_fk", |b| {
        b.iter(|| solver.solve_fk(black_box(&joints)))
    });

    c.bench_function("Solver::solve_ik", |b| {
        b.iter(|| solver.solve_ik(black_box(&pose), black_box(&joints)))
    });

    c.bench_function("Solver::solve_ik::euler", |b| {
        b.iter(|| solver.solve_ik(black_box(&euler_pose), &Joint6D::default()))
    });
}

criterion_group!(benches, kinematics_benchmark);
criterion_main!(benches);

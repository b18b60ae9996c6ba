use RustedAlgebra::math_solver::MathSolver;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_reference_problems(c: &mut Criterion) {
    let solver = MathSolver::new();
    let mut group = c.benchmark_group("reference problems");
    for (name, text) in [
        ("linear", "Solve for x: 2x + 5 = 13"),
        ("quadratic", "Find the roots of x^2 - 5x + 6 = 0"),
        ("system", "Solve the system: x + y = 5 and 2x - y = 1"),
    ] {
        group.bench_function(name, |b| b.iter(|| solver.solve_text(black_box(text))));
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let solver = MathSolver::new();
    c.bench_function("analyze word problem", |b| {
        b.iter(|| solver.analyze(black_box("what is x if three times x plus two equals eleven?")))
    });
}

criterion_group!(benches, bench_reference_problems, bench_normalize);
criterion_main!(benches);

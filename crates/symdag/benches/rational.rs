//! Benchmarks for checked rational arithmetic and approximation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use symdag_rational::{ApproxConfig, Rational};

/// Partial sum of the harmonic series, which grows denominators quickly.
fn harmonic(n: i64) -> Rational {
    (1..=n).fold(Rational::ZERO, |acc, k| {
        acc.try_add(Rational::new(1, k).unwrap()).unwrap()
    })
}

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("rational_arith");

    for n in [4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("harmonic", n), &n, |b, &n| {
            b.iter(|| black_box(harmonic(n)));
        });
    }

    let a = Rational::new(355, 113).unwrap();
    let b = Rational::new(-22, 7).unwrap();
    group.bench_function("mul_div", |bench| {
        bench.iter(|| black_box(black_box(a).try_mul(b).and_then(|p| p.try_div(a))));
    });
    group.bench_function("pow", |bench| {
        bench.iter(|| black_box(black_box(b).try_pow(-9)));
    });

    group.finish();
}

fn bench_approximate(c: &mut Criterion) {
    let mut group = c.benchmark_group("stern_brocot");

    for (name, value) in [
        ("pi", std::f64::consts::PI),
        ("sqrt2", std::f64::consts::SQRT_2),
        ("tenth", 0.1),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(Rational::approximate(black_box(value))));
        });
    }

    let coarse = ApproxConfig::default().with_epsilon(1e-4);
    group.bench_function("pi_coarse", |b| {
        b.iter(|| black_box(Rational::approximate_with(std::f64::consts::PI, &coarse)));
    });

    group.finish();
}

criterion_group!(benches, bench_arithmetic, bench_approximate);
criterion_main!(benches);

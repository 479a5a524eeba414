use criterion::{criterion_group, criterion_main, Criterion};
use tern_arith::Interval;

fn bench_interval_mul(c: &mut Criterion) {
    let a = Interval::new(-123456789i64, 987654321i64, 30);
    let b = Interval::new(-314159265i64, 271828182i64, 28);
    c.bench_function("interval_mul_corner_products", |bench| {
        bench.iter(|| {
            let _ = a.mul(&b);
        });
    });
}

fn bench_canonicalize(c: &mut Criterion) {
    let wide = Interval::new(-123456789i64, 987654321i64, 40);
    c.bench_function("interval_canonicalize", |bench| {
        bench.iter(|| {
            let _ = wide.canonicalize();
        });
    });
}

criterion_group!(benches, bench_interval_mul, bench_canonicalize);
criterion_main!(benches);

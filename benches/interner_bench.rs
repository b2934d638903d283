use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use probe_tables::Interner;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn name(n: u64) -> String {
    format!("Ns{}.Type{:08x}", n % 16, n as u32)
}

fn bench_intern_fresh(c: &mut Criterion) {
    let names: Vec<String> = lcg(1).take(10_000).map(name).collect();
    c.bench_function("interner_intern_10k_fresh", |b| {
        b.iter_batched(
            || (Interner::new(), names.clone()),
            |(mut i, names)| {
                for n in names {
                    black_box(i.intern(n));
                }
                black_box(i)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lookup_hit(c: &mut Criterion) {
    c.bench_function("interner_get_hit", |b| {
        let mut i = Interner::new();
        let names: Vec<String> = lcg(7).take(10_000).map(name).collect();
        for n in &names {
            i.intern(n.clone());
        }
        let mut it = names.iter().cycle();
        b.iter(|| black_box(i.get(it.next().unwrap().as_str())))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_intern_fresh, bench_lookup_hit
}
criterion_main!(benches);

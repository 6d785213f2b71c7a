use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dynseq_core::DynSeq;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [128usize, 1024, 8192] {
        let base: DynSeq<u32> = (0..size as u32).collect();

        group.bench_with_input(BenchmarkId::new("front", size), &base, |b, base| {
            b.iter(|| {
                let mut seq = base.clone();
                seq.insert(seq.begin(), black_box(7)).unwrap();
                seq
            });
        });

        group.bench_with_input(BenchmarkId::new("random", size), &base, |b, base| {
            let mut rng = StdRng::seed_from_u64(0x5eed);
            b.iter(|| {
                let mut seq = base.clone();
                for _ in 0..16 {
                    let at = rng.gen_range(0..=seq.len());
                    seq.insert(seq.begin() + at, black_box(1)).unwrap();
                }
                seq
            });
        });
    }

    group.finish();
}

fn bench_erase(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase");

    for size in [128usize, 1024, 8192] {
        let base: DynSeq<u32> = (0..size as u32).collect();

        group.bench_with_input(BenchmarkId::new("front", size), &base, |b, base| {
            b.iter(|| {
                let mut seq = base.clone();
                seq.erase(seq.begin()).unwrap();
                seq
            });
        });

        group.bench_with_input(BenchmarkId::new("range_half", size), &base, |b, base| {
            b.iter(|| {
                let mut seq = base.clone();
                let half = seq.len() / 2;
                seq.erase_range(seq.begin(), seq.begin() + half).unwrap();
                seq
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_erase);
criterion_main!(benches);

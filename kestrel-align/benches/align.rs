use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kestrel_align::{align_affine, align_linear_space, align_pair, MatchMismatch, Mode, SubstitutionMatrix};

fn random_seq(len: usize, alphabet: &[u8], seed: u64) -> Vec<u8> {
    let mut seq = Vec::with_capacity(len);
    let mut state = seed;
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        seq.push(alphabet[((state >> 33) % alphabet.len() as u64) as usize]);
    }
    seq
}

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("align_pair");
    let m = MatchMismatch::default();
    let a = random_seq(500, b"ACGT", 42);
    let b = random_seq(500, b"ACGT", 7);
    for mode in Mode::ALL {
        group.bench_with_input(BenchmarkId::new(mode.name(), 500), &mode, |bench, &mode| {
            bench.iter(|| align_pair(mode, black_box(&a), black_box(&b), &m, 1).unwrap())
        });
    }
    group.finish();
}

fn bench_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_variants");
    let b62 = SubstitutionMatrix::blosum62();
    let aa = b"ACDEFGHIKLMNPQRSTVWY";
    let a = random_seq(300, aa, 42);
    let b = random_seq(300, aa, 7);

    group.bench_function("full_grid_300", |bench| {
        bench.iter(|| align_pair(Mode::Global, black_box(&a), black_box(&b), &b62, 5).unwrap())
    });
    group.bench_function("linear_space_300", |bench| {
        bench.iter(|| align_linear_space(black_box(&a), black_box(&b), &b62, 5).unwrap())
    });
    group.bench_function("affine_300", |bench| {
        bench.iter(|| align_affine(black_box(&a), black_box(&b), &b62, 11, 1).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_modes, bench_variants);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kestrel_phylo::{large_parsimony, neighbor_joining, upgma, DistanceMatrix, PhyloTree};
use kestrel_seq::Dna8;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_seqs(n: usize, len: usize, seed: u64) -> Vec<Dna8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let bytes: Vec<u8> = (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect();
            Dna8::new(bytes).unwrap()
        })
        .collect()
}

fn bench_construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct");

    for n in [16, 64] {
        let d = DistanceMatrix::from_hamming(&random_seqs(n, 200, 7)).unwrap();
        group.bench_with_input(BenchmarkId::new("upgma", n), &d, |b, d| {
            b.iter(|| upgma(black_box(d)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("neighbor_joining", n), &d, |b, d| {
            b.iter(|| neighbor_joining(black_box(d)).unwrap())
        });
    }

    group.finish();
}

fn bench_parsimony(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsimony");
    group.sample_size(10);

    let seqs = random_seqs(8, 50, 11);
    let d = DistanceMatrix::from_hamming(&seqs).unwrap();
    let start = neighbor_joining(&d).unwrap();
    group.bench_function("nni_8x50", |b| {
        b.iter(|| large_parsimony(black_box(&start), &seqs).unwrap())
    });

    group.finish();
}

fn bench_newick(c: &mut Criterion) {
    let names: Vec<String> = (0..64).map(|i| format!("t{}", i)).collect();
    let d = DistanceMatrix::from_hamming(&random_seqs(64, 100, 3)).unwrap();
    let text = upgma(&d).unwrap().to_tree(&names).unwrap().to_newick();
    c.bench_function("newick_parse_64", |b| {
        b.iter(|| PhyloTree::from_newick(black_box(&text)).unwrap())
    });
}

criterion_group!(benches, bench_construct, bench_parsimony, bench_newick);
criterion_main!(benches);

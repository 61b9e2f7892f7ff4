use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kestrel_seq::{read_fasta, Dna8, FmIndex, KmerIter};
use std::io::Cursor;

fn random_dna(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut state: u64 = 42;
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        seq.push(bases[((state >> 33) % 4) as usize]);
    }
    seq
}

fn make_fasta(n_seqs: usize, seq_len: usize) -> Vec<u8> {
    let mut text = Vec::new();
    let body = random_dna(n_seqs * seq_len);
    for (i, chunk) in body.chunks(seq_len).enumerate() {
        text.extend_from_slice(format!(">seq_{}\n", i).as_bytes());
        for line in chunk.chunks(80) {
            text.extend_from_slice(line);
            text.push(b'\n');
        }
    }
    text
}

fn bench_fasta_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("fasta_parse");

    // ~1MB: 1000 seqs × 1000bp
    let f_1mb = make_fasta(1000, 1000);
    group.bench_function("1MB", |b| {
        b.iter(|| read_fasta(Cursor::new(black_box(&f_1mb))).unwrap().len())
    });

    group.finish();
}

fn bench_dna8(c: &mut Criterion) {
    let mut group = c.benchmark_group("dna8");

    let seq_10k = Dna8::new(random_dna(10_000)).unwrap();
    group.bench_function("gc_content_10kb", |b| b.iter(|| black_box(&seq_10k).gc_content()));
    group.bench_function("reverse_complement_10kb", |b| {
        b.iter(|| black_box(&seq_10k).reverse_complement())
    });
    group.bench_function("translate_10kb", |b| b.iter(|| black_box(&seq_10k).translate()));
    group.bench_function("min_gc_skew_10kb", |b| b.iter(|| black_box(&seq_10k).min_gc_skew()));

    group.finish();
}

fn bench_kmer(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmer");

    let seq_10k = random_dna(10_000);
    group.bench_with_input(BenchmarkId::new("iter_k21", 10_000), &seq_10k, |b, seq| {
        b.iter(|| KmerIter::new(black_box(seq), 21).unwrap().count())
    });

    let dna = Dna8::new(&seq_10k).unwrap();
    group.bench_with_input(BenchmarkId::new("freq_array_k8", 10_000), &dna, |b, dna| {
        b.iter(|| black_box(dna).freq_array(8).unwrap())
    });

    let short = Dna8::new(&seq_10k[..500]).unwrap();
    group.bench_with_input(BenchmarkId::new("frequent_mismatches_k6_d1", 500), &short, |b, dna| {
        b.iter(|| black_box(dna).frequent_kmers_mismatches(6, 1, true).unwrap())
    });

    group.finish();
}

fn bench_fm_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("fm_index");

    let text = random_dna(20_000);
    group.bench_function("build_20kb", |b| b.iter(|| FmIndex::build(black_box(&text))));

    let fm = FmIndex::build(&text);
    group.bench_function("search_12mer", |b| {
        b.iter(|| fm.search(black_box(&text[5000..5012])))
    });

    group.finish();
}

criterion_group!(benches, bench_fasta_parse, bench_dna8, bench_kmer, bench_fm_index);
criterion_main!(benches);

//! Profile matrices over aligned DNA8 k-mers.
//!
//! Rows are k-mer positions; each row holds one entry per base in the 2-bit
//! code order `A, C, T, G`.

use rand::Rng;

use kestrel_core::{KestrelError, Result};

use crate::alphabet::{base_code, DNA_BASES};
use crate::types::{hamming8, Dna8};

/// DNA8 strings of possibly varying length.
pub type Dna8List = Vec<Dna8>;

/// Integer base counts per position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountProfile(Vec<[usize; 4]>);

/// Base probabilities per position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FracProfile(Vec<[f64; 4]>);

/// A list of DNA8 k-mers, expected to share one length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Kmers(Vec<Dna8>);

impl Kmers {
    /// Wrap a list of k-mers.
    pub fn new(kmers: Vec<Dna8>) -> Self {
        Self(kmers)
    }

    /// The k-mers in order.
    pub fn as_slice(&self) -> &[Dna8] {
        &self.0
    }

    /// Unwrap into the underlying list.
    pub fn into_inner(self) -> Vec<Dna8> {
        self.0
    }

    /// Append a k-mer.
    pub fn push(&mut self, kmer: Dna8) {
        self.0.push(kmer);
    }

    /// Whether all k-mers have the same length. True for an empty list.
    pub fn uniform(&self) -> bool {
        match self.0.first() {
            None => true,
            Some(first) => self.0.iter().all(|s| s.len() == first.len()),
        }
    }

    /// Length of the first k-mer, or zero for an empty list.
    pub fn k(&self) -> usize {
        self.0.first().map_or(0, |s| s.len())
    }

    /// Number of k-mers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(KestrelError::InvalidInput("k-mer list is empty".into()));
        }
        if !self.uniform() {
            return Err(KestrelError::NotUniform(format!(
                "{} k-mers, first has length {}",
                self.0.len(),
                self.k()
            )));
        }
        Ok(())
    }

    fn counts(&self) -> Vec<[usize; 4]> {
        let mut counts = vec![[0usize; 4]; self.k()];
        for s in &self.0 {
            for (row, &b) in counts.iter_mut().zip(s.iter()) {
                row[base_code(b)] += 1;
            }
        }
        counts
    }

    fn laplace(&self) -> FracProfile {
        let denom = (self.0.len() + 4) as f64;
        FracProfile(
            self.counts()
                .iter()
                .map(|row| row.map(|c| (c + 1) as f64 / denom))
                .collect(),
        )
    }

    fn hamming_score(&self) -> usize {
        let n = self.0.len();
        self.counts()
            .iter()
            .map(|row| n - row.iter().copied().max().unwrap_or(0))
            .sum()
    }

    /// Integer base counts per position.
    pub fn count_profile(&self) -> Result<CountProfile> {
        self.check()?;
        Ok(CountProfile(self.counts()))
    }

    /// Base frequencies per position.
    pub fn frac_profile(&self) -> Result<FracProfile> {
        Ok(self.count_profile()?.frac())
    }

    /// Frequencies with a pseudocount of 1 per base over `|kmers| + 4`.
    pub fn laplace_profile(&self) -> Result<FracProfile> {
        self.check()?;
        Ok(self.laplace())
    }

    /// `∑ (|kmers| - modal count)` over columns.
    pub fn consensus_hamming(&self) -> Result<usize> {
        self.check()?;
        Ok(self.hamming_score())
    }

    /// Modal base per column, upper case. Ties go to the first base in
    /// `A, C, T, G` order.
    pub fn consensus(&self) -> Result<Dna8> {
        let counts = self.count_profile()?;
        let bytes = counts
            .0
            .iter()
            .map(|row| {
                let mut best = 0;
                for b in 1..4 {
                    if row[b] > row[best] {
                        best = b;
                    }
                }
                DNA_BASES[best]
            })
            .collect();
        Ok(Dna8::from_validated(bytes))
    }

    /// Shannon entropy of the frequency profile, summed over all columns.
    pub fn entropy(&self) -> Result<f64> {
        Ok(self.frac_profile()?.entropy())
    }

    /// Total Hamming distance from `p` to each k-mer.
    pub fn distance_to(&self, p: &[u8]) -> usize {
        self.0.iter().map(|s| hamming8(s, p)).sum()
    }
}

impl From<Vec<Dna8>> for Kmers {
    fn from(kmers: Vec<Dna8>) -> Self {
        Self(kmers)
    }
}

impl CountProfile {
    /// Per-position counts in `A, C, T, G` order.
    pub fn rows(&self) -> &[[usize; 4]] {
        &self.0
    }

    /// Normalise each row by the number of k-mers counted.
    pub fn frac(&self) -> FracProfile {
        FracProfile(
            self.0
                .iter()
                .map(|row| {
                    let n: usize = row.iter().sum();
                    if n == 0 {
                        [0.0; 4]
                    } else {
                        row.map(|c| c as f64 / n as f64)
                    }
                })
                .collect(),
        )
    }
}

impl FracProfile {
    /// Build a profile from per-position probabilities in `A, C, T, G` order.
    ///
    /// # Errors
    ///
    /// Returns [`KestrelError::InvalidInput`] if any entry is negative or not
    /// finite.
    pub fn new(rows: Vec<[f64; 4]>) -> Result<Self> {
        if let Some(i) = rows.iter().position(|r| r.iter().any(|p| !p.is_finite() || *p < 0.0)) {
            return Err(KestrelError::InvalidInput(format!(
                "profile row {} holds a negative or non-finite probability",
                i
            )));
        }
        Ok(Self(rows))
    }

    /// Per-position probabilities in `A, C, T, G` order.
    pub fn rows(&self) -> &[[f64; 4]] {
        &self.0
    }

    /// Profile length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the profile has no rows.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Product of per-position probabilities of `kmer`.
    pub fn kmer_probability(&self, kmer: &[u8]) -> f64 {
        self.0
            .iter()
            .zip(kmer)
            .map(|(row, &b)| row[base_code(b)])
            .product()
    }

    /// The window of `s` with the highest probability; the earliest window
    /// wins ties. Empty when `s` is shorter than the profile.
    pub fn most_prob_kmer(&self, s: &Dna8) -> Dna8 {
        let k = self.0.len();
        if k == 0 || s.len() < k {
            return Dna8::default();
        }
        let mut best = 0;
        let mut best_p = self.kmer_probability(&s[..k]);
        for (i, w) in s.windows(k).enumerate().skip(1) {
            let p = self.kmer_probability(w);
            if p > best_p {
                best = i;
                best_p = p;
            }
        }
        s.subseq(best..best + k).unwrap_or_default()
    }

    /// Most probable k-mer of every string.
    pub fn most_prob_kmers(&self, l: &[Dna8]) -> Kmers {
        Kmers(l.iter().map(|s| self.most_prob_kmer(s)).collect())
    }

    /// A window of `s` drawn with probability proportional to its profile
    /// probability. Uniform when every window has probability zero.
    pub fn random_kmer<R: Rng + ?Sized>(&self, s: &Dna8, rng: &mut R) -> Dna8 {
        let k = self.0.len();
        if k == 0 || s.len() < k {
            return Dna8::default();
        }
        let weights: Vec<f64> = s.windows(k).map(|w| self.kmer_probability(w)).collect();
        let total: f64 = weights.iter().sum();
        let pick = if total > 0.0 {
            let mut r = rng.gen::<f64>() * total;
            let mut pick = weights.len() - 1;
            for (i, &w) in weights.iter().enumerate() {
                if r < w {
                    pick = i;
                    break;
                }
                r -= w;
            }
            pick
        } else {
            rng.gen_range(0..weights.len())
        };
        s.subseq(pick..pick + k).unwrap_or_default()
    }

    /// `-∑ p log2 p` over non-zero entries.
    pub fn entropy(&self) -> f64 {
        -self
            .0
            .iter()
            .flatten()
            .filter(|&&p| p > 0.0)
            .map(|&p| p * p.log2())
            .sum::<f64>()
    }

    /// `-∑ p log2 q` over entries where `p` is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`KestrelError::LengthMismatch`] if the profiles differ in
    /// length.
    pub fn cross_entropy(&self, q: &FracProfile) -> Result<f64> {
        if self.len() != q.len() {
            return Err(KestrelError::length_mismatch(self.len(), q.len()));
        }
        let mut h = 0.0;
        for (pr, qr) in self.0.iter().zip(&q.0) {
            for (&p, &q) in pr.iter().zip(qr) {
                if p > 0.0 {
                    h -= p * q.log2();
                }
            }
        }
        Ok(h)
    }
}

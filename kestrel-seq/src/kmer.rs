//! K-mer iteration and enumeration over DNA8.
//!
//! [`KmerIter`] is a zero-allocation window iterator. The `Dna8` methods in
//! this module enumerate the `4^k` k-mer lattice: Hamming-ball variants,
//! in-place increment, and dense frequency arrays indexed by the base-4 value
//! of a k-mer under `A=0, C=1, T=2, G=3` (first base most significant).

use kestrel_core::{KestrelError, Result};

use crate::alphabet::{base_code, base_from_code, DNA_BASES};
use crate::types::Dna8;

/// Largest `k` accepted by the dense frequency array.
pub const MAX_FREQ_K: usize = 15;

/// Iterator over k-mer windows of a byte slice.
///
/// Yields `&[u8]` slices of length `k`. Implements [`ExactSizeIterator`]
/// and [`DoubleEndedIterator`].
pub struct KmerIter<'a> {
    inner: std::slice::Windows<'a, u8>,
    remaining: usize,
}

impl<'a> KmerIter<'a> {
    /// Create a new k-mer iterator. A sequence shorter than `k` yields nothing.
    pub fn new(seq: &'a [u8], k: usize) -> Result<Self> {
        if k == 0 {
            return Err(KestrelError::InvalidInput(
                "k-mer size must be at least 1".into(),
            ));
        }
        Ok(Self {
            inner: seq.windows(k),
            remaining: (seq.len() + 1).saturating_sub(k),
        })
    }
}

impl<'a> Iterator for KmerIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for KmerIter<'a> {}

impl<'a> DoubleEndedIterator for KmerIter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.inner.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

/// Base-4 value of a DNA8 k-mer, first base most significant.
pub fn kmer_index(kmer: &[u8]) -> usize {
    kmer.iter().fold(0, |n, &b| n << 2 | base_code(b))
}

/// Upper-case k-mer for a base-4 value.
pub fn index_to_kmer(mut index: usize, k: usize) -> Dna8 {
    let mut kmer = vec![b'A'; k];
    for b in kmer.iter_mut().rev() {
        *b = DNA_BASES[index & 3];
        index >>= 2;
    }
    Dna8::from_validated(kmer)
}

/// `∑_{h=0..min(d,k)} C(k,h)·3^h`, the size of a Hamming ball.
pub fn hamming_ball_size(k: usize, d: usize) -> usize {
    let mut total = 0;
    let mut binom = 1usize;
    let mut pow3 = 1usize;
    for h in 0..=d.min(k) {
        total += binom * pow3;
        binom = binom * (k - h) / (h + 1);
        pow3 *= 3;
    }
    total
}

fn check_freq_k(k: usize) -> Result<()> {
    if k == 0 || k > MAX_FREQ_K {
        return Err(KestrelError::InvalidInput(format!(
            "k must be in 1..={} for a frequency array, got {}",
            MAX_FREQ_K, k
        )));
    }
    Ok(())
}

fn max_indices(freq: &[usize], k: usize) -> Vec<Dna8> {
    let max = freq.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    freq.iter()
        .enumerate()
        .filter(|(_, &n)| n == max)
        .map(|(i, _)| index_to_kmer(i, k))
        .collect()
}

fn variants_rec(buf: &mut [u8], start: usize, d: usize, out: &mut Vec<Dna8>) {
    out.push(Dna8::from_validated(buf.to_vec()));
    if d == 0 {
        return;
    }
    for i in start..buf.len() {
        let orig = buf[i];
        let code = base_code(orig);
        for c in (0..4).filter(|&c| c != code) {
            buf[i] = base_from_code(c, orig);
            variants_rec(buf, i + 1, d - 1, out);
        }
        buf[i] = orig;
    }
}

impl Dna8 {
    /// Every k-mer within Hamming distance `d`, including the receiver.
    ///
    /// Each position keeps the case of the receiver. The result holds
    /// [`hamming_ball_size`]`(len, d)` distinct sequences.
    pub fn hamming_variants(&self, d: usize) -> Vec<Dna8> {
        let mut out = Vec::with_capacity(hamming_ball_size(self.len(), d));
        let mut buf = self.to_vec();
        variants_rec(&mut buf, 0, d, &mut out);
        out
    }

    /// Increment as a little-endian base-4 number under `A<C<T<G`.
    ///
    /// Position 0 changes fastest and case is kept per position. Returns
    /// `true` when the value rolls over from all-`G` to all-`A`.
    pub fn inc(&mut self) -> bool {
        for b in self.bytes_mut() {
            let code = base_code(*b);
            *b = base_from_code(code + 1, *b);
            if code != 3 {
                return false;
            }
        }
        true
    }

    /// Dense k-mer counts of length `4^k`.
    ///
    /// # Errors
    ///
    /// Returns an error if `k` is zero or above [`MAX_FREQ_K`].
    pub fn freq_array(&self, k: usize) -> Result<Vec<usize>> {
        check_freq_k(k)?;
        let mut freq = vec![0usize; 1 << (2 * k)];
        for w in KmerIter::new(self, k)? {
            freq[kmer_index(w)] += 1;
        }
        Ok(freq)
    }

    /// All most-frequent k-mers, upper case, in base-4 order.
    pub fn frequent_kmers(&self, k: usize) -> Result<Vec<Dna8>> {
        let freq = self.freq_array(k)?;
        Ok(max_indices(&freq, k))
    }

    /// Most-frequent k-mers counting occurrences with up to `d` mismatches.
    ///
    /// With `with_rc`, occurrences of a k-mer's reverse complement count
    /// toward it too.
    pub fn frequent_kmers_mismatches(&self, k: usize, d: usize, with_rc: bool) -> Result<Vec<Dna8>> {
        check_freq_k(k)?;
        let mut freq = vec![0usize; 1 << (2 * k)];
        for w in KmerIter::new(self, k)? {
            let w = Dna8::from_validated(w.to_vec());
            for v in w.hamming_variants(d) {
                freq[kmer_index(&v)] += 1;
            }
            if with_rc {
                for v in w.reverse_complement().hamming_variants(d) {
                    freq[kmer_index(&v)] += 1;
                }
            }
        }
        Ok(max_indices(&freq, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d8(s: &str) -> Dna8 {
        Dna8::new(s).unwrap()
    }

    #[test]
    fn iter_basic() {
        let kmers: Vec<&[u8]> = KmerIter::new(b"ACGT", 2).unwrap().collect();
        assert_eq!(kmers, vec![b"AC", b"CG", b"GT"]);
        assert_eq!(KmerIter::new(b"ACGTACGT", 3).unwrap().len(), 6);
        assert_eq!(KmerIter::new(b"AC", 3).unwrap().len(), 0);
        assert!(KmerIter::new(b"ACGT", 0).is_err());
    }

    #[test]
    fn iter_double_ended() {
        let mut iter = KmerIter::new(b"ACGT", 2).unwrap();
        assert_eq!(iter.next_back(), Some(b"GT".as_slice()));
        assert_eq!(iter.next(), Some(b"AC".as_slice()));
        assert_eq!(iter.next(), Some(b"CG".as_slice()));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn index_round_trip() {
        assert_eq!(kmer_index(b"A"), 0);
        assert_eq!(kmer_index(b"GT"), 14);
        assert_eq!(kmer_index(b"gt"), 14);
        assert_eq!(index_to_kmer(14, 2), d8("GT"));
        assert_eq!(index_to_kmer(0, 3), d8("AAA"));
    }

    #[test]
    fn variant_counts() {
        assert_eq!(d8("ACGT").hamming_variants(2).len(), 67);
        assert_eq!(d8("ACG").hamming_variants(1).len(), 10);
        assert_eq!(d8("AC").hamming_variants(5).len(), 16);
        assert_eq!(d8("ACG").hamming_variants(0), vec![d8("ACG")]);
    }

    #[test]
    fn variants_keep_case() {
        let v = d8("aC").hamming_variants(1);
        for s in ["aC", "cC", "tC", "gC", "aA", "aT", "aG"] {
            assert!(v.contains(&d8(s)), "missing {}", s);
        }
        assert_eq!(v.len(), 7);
    }

    #[test]
    fn inc_little_endian() {
        let mut s = d8("AAA");
        assert!(!s.inc());
        assert_eq!(s, d8("CAA"));
        let mut s = d8("gA");
        assert!(!s.inc());
        assert_eq!(s, d8("aC"));
        let mut s = d8("GG");
        assert!(s.inc());
        assert_eq!(s, d8("AA"));
    }

    #[test]
    fn inc_visits_every_word() {
        let mut s = d8("AAA");
        let mut seen = std::collections::BTreeSet::new();
        loop {
            seen.insert(s.clone());
            if s.inc() {
                break;
            }
        }
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn freq_array_counts() {
        let f = d8("ACGTacgt").freq_array(2).unwrap();
        assert_eq!(f.len(), 16);
        assert_eq!(f[kmer_index(b"AC")], 2);
        assert_eq!(f[kmer_index(b"TA")], 1);
        assert_eq!(f.iter().sum::<usize>(), 7);
        assert!(d8("ACGT").freq_array(0).is_err());
        assert!(d8("ACGT").freq_array(MAX_FREQ_K + 1).is_err());
    }

    #[test]
    fn frequent_words() {
        let s = d8("ACGTTGCATGTCGCATGATGCATGAGAGCT");
        assert_eq!(s.frequent_kmers(4).unwrap(), vec![d8("CATG"), d8("GCAT")]);
        assert_eq!(
            s.frequent_kmers_mismatches(4, 1, false).unwrap(),
            vec![d8("ATGC"), d8("ATGT"), d8("GATG")]
        );
        assert_eq!(
            s.frequent_kmers_mismatches(4, 1, true).unwrap(),
            vec![d8("ACAT"), d8("ATGT")]
        );
        assert!(d8("AC").frequent_kmers(3).unwrap().is_empty());
    }

    #[test]
    fn ball_size() {
        assert_eq!(hamming_ball_size(4, 2), 67);
        assert_eq!(hamming_ball_size(3, 0), 1);
        assert_eq!(hamming_ball_size(2, 9), 16);
    }
}

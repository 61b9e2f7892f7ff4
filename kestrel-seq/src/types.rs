//! Concrete sequence type aliases and their operations.
//!
//! - [`Seq`]: arbitrary bytes, case-sensitive search and Hamming distance
//! - [`Dna`], [`Rna`], [`Aa`]: case-tolerant; unknown bytes pass through
//! - [`Dna8`], [`Rna8`], [`Aa20`]: strict alphabets with branch-free
//!   case-preserving bit operations

use kestrel_core::{KestrelError, Result};

use crate::alphabet::{
    base_code, complement8, is_pair, is_purine, reverse_transcribe8, rna_complement8,
    same_base, transcribe8, AaAlphabet, Aa20Alphabet, ByteAlphabet, Dna8Alphabet, DnaAlphabet,
    Rna8Alphabet, RnaAlphabet, CASE_BIT,
};
use crate::codon;
use crate::kmer::KmerIter;
use crate::seq::ValidatedSeq;

/// Arbitrary byte sequence.
pub type Seq = ValidatedSeq<ByteAlphabet>;

/// Case-tolerant DNA.
pub type Dna = ValidatedSeq<DnaAlphabet>;

/// Case-tolerant RNA.
pub type Rna = ValidatedSeq<RnaAlphabet>;

/// Case-tolerant amino acid sequence.
pub type Aa = ValidatedSeq<AaAlphabet>;

/// Strict DNA over `ACTGactg`.
pub type Dna8 = ValidatedSeq<Dna8Alphabet>;

/// Strict RNA over `ACUGacug`.
pub type Rna8 = ValidatedSeq<Rna8Alphabet>;

/// Strict peptide over the 20 proteinogenic amino acids.
pub type Aa20 = ValidatedSeq<Aa20Alphabet>;

/// Base counts in `A, C, T/U, G` order.
pub type BaseFreq = (usize, usize, usize, usize);

fn base_freq8(s: &[u8]) -> BaseFreq {
    let mut f = [0usize; 4];
    for &b in s {
        f[base_code(b)] += 1;
    }
    (f[0], f[1], f[2], f[3])
}

fn tolerant_freq(s: &[u8], t_or_u: u8) -> BaseFreq {
    let mut f = (0, 0, 0, 0);
    for &b in s {
        match b.to_ascii_uppercase() {
            b'A' => f.0 += 1,
            b'C' => f.1 += 1,
            b'G' => f.3 += 1,
            x if x == t_or_u => f.2 += 1,
            _ => {}
        }
    }
    f
}

// ---------------------------------------------------------------------------
// Seq
// ---------------------------------------------------------------------------

impl Seq {
    /// Start positions of every overlapping occurrence of `m`,
    /// byte-identical and case-sensitive.
    pub fn all_index(&self, m: &[u8]) -> Vec<usize> {
        if m.is_empty() || m.len() > self.len() {
            return Vec::new();
        }
        self.windows(m.len())
            .enumerate()
            .filter(|(_, w)| *w == m)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of positions at which two sequences differ.
    ///
    /// # Errors
    ///
    /// Returns [`KestrelError::LengthMismatch`] if the lengths differ.
    pub fn hamming(&self, other: &Seq) -> Result<usize> {
        if self.len() != other.len() {
            return Err(KestrelError::length_mismatch(self.len(), other.len()));
        }
        Ok(self.iter().zip(other.iter()).filter(|(a, b)| a != b).count())
    }
}

// ---------------------------------------------------------------------------
// Tolerant DNA / RNA
// ---------------------------------------------------------------------------

impl Dna {
    /// Reverse complement. `ACGTacgt` map case-preservingly, other bytes are
    /// copied unchanged.
    pub fn reverse_complement(&self) -> Dna {
        let rc = self
            .iter()
            .rev()
            .map(|&b| match b.to_ascii_uppercase() {
                b'A' | b'C' | b'G' | b'T' => complement8(b),
                _ => b,
            })
            .collect();
        Dna::from_validated(rc)
    }

    /// Transcribe DNA to RNA (`T`→`U`, `t`→`u`).
    pub fn transcribe(&self) -> Rna {
        Rna::from_validated(self.iter().map(|&b| transcribe8(b)).collect())
    }

    /// Counts of `A, C, T, G`, ignoring case. Other bytes are not counted.
    pub fn base_freq(&self) -> BaseFreq {
        tolerant_freq(self, b'T')
    }

    /// Convert to strict DNA8.
    pub fn to_dna8(&self) -> Result<Dna8> {
        Dna8::new(self.as_ref())
    }
}

impl Rna {
    /// Reverse complement. `ACGUacgu` map case-preservingly, other bytes are
    /// copied unchanged.
    pub fn reverse_complement(&self) -> Rna {
        let rc = self
            .iter()
            .rev()
            .map(|&b| match b.to_ascii_uppercase() {
                b'A' | b'C' | b'G' | b'U' => rna_complement8(b),
                _ => b,
            })
            .collect();
        Rna::from_validated(rc)
    }

    /// Reverse-transcribe RNA to DNA (`U`→`T`).
    pub fn reverse_transcribe(&self) -> Dna {
        Dna::from_validated(self.iter().map(|&b| reverse_transcribe8(b)).collect())
    }

    /// Counts of `A, C, U, G`, ignoring case.
    pub fn base_freq(&self) -> BaseFreq {
        tolerant_freq(self, b'U')
    }
}

impl Aa {
    /// Convert to a strict 20-letter peptide.
    pub fn to_aa20(&self) -> Result<Aa20> {
        Aa20::new(self.as_ref())
    }
}

// ---------------------------------------------------------------------------
// DNA8
// ---------------------------------------------------------------------------

impl Dna8 {
    /// Counts of `A, C, T, G`, ignoring case.
    pub fn base_freq(&self) -> BaseFreq {
        base_freq8(self)
    }

    /// Case-preserving reverse complement.
    pub fn reverse_complement(&self) -> Dna8 {
        Dna8::from_validated(self.iter().rev().map(|&b| complement8(b)).collect())
    }

    /// Transcribe to RNA8, preserving case.
    pub fn transcribe(&self) -> Rna8 {
        Rna8::from_validated(self.iter().map(|&b| transcribe8(b)).collect())
    }

    /// Translate codon by codon. Stops are emitted as `*`; a trailing
    /// partial codon is ignored.
    pub fn translate(&self) -> Aa {
        Aa::from_validated(codon::translate_sequence(self))
    }

    /// Fraction of bases that are `C` or `G`. Zero for an empty sequence.
    pub fn gc_content(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let gc = self.iter().filter(|&&b| b & 2 != 0).count();
        gc as f64 / self.len() as f64
    }

    /// Overlapping occurrences of `m`, ignoring case.
    pub fn all_index(&self, m: &[u8]) -> Vec<usize> {
        if m.is_empty() || m.len() > self.len() {
            return Vec::new();
        }
        self.windows(m.len())
            .enumerate()
            .filter(|(_, w)| w.iter().zip(m).all(|(&a, &b)| (a ^ b) & !CASE_BIT == 0))
            .map(|(i, _)| i)
            .collect()
    }

    /// Hamming distance by base identity, ignoring case.
    ///
    /// Lengths are expected to match; only the common prefix is compared.
    pub fn hamming(&self, t: &[u8]) -> usize {
        hamming8(self, t)
    }

    /// Minimum Hamming distance between `p` and any window of the sequence.
    ///
    /// Returns `p.len()` when the sequence is shorter than `p`.
    pub fn motif_hamming(&self, p: &[u8]) -> usize {
        if p.is_empty() || p.len() > self.len() {
            return p.len();
        }
        self.windows(p.len())
            .map(|w| hamming8(w, p))
            .min()
            .unwrap_or(0)
    }

    /// Occurrences of `m` with at most `d` mismatches.
    pub fn approx_all_index(&self, m: &[u8], d: usize) -> Vec<usize> {
        if m.is_empty() || m.len() > self.len() {
            return Vec::new();
        }
        self.windows(m.len())
            .enumerate()
            .filter(|(_, w)| hamming8(w, m) <= d)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of occurrences of `m` with at most `d` mismatches.
    pub fn approx_count(&self, m: &[u8], d: usize) -> usize {
        if m.is_empty() || m.len() > self.len() {
            return 0;
        }
        self.windows(m.len())
            .filter(|w| hamming8(w, m) <= d)
            .count()
    }

    /// Positions where the running `G - C` skew reaches its minimum.
    ///
    /// The skew includes the base at each reported index, so index 0 is a
    /// candidate. Whenever a new lower minimum appears the list restarts.
    /// Empty for an empty sequence.
    pub fn min_gc_skew(&self) -> Vec<usize> {
        let mut min = i64::MAX;
        let mut skew = 0i64;
        let mut at = Vec::new();
        for (i, &b) in self.iter().enumerate() {
            match base_code(b) {
                1 => skew -= 1,
                3 => skew += 1,
                _ => {}
            }
            if skew < min {
                min = skew;
                at.clear();
                at.push(i);
            } else if skew == min {
                at.push(i);
            }
        }
        at
    }

    /// Reverse-complement palindromes with lengths in `[min, max]`.
    ///
    /// `min` is raised to at least 2 and rounded up to even; `max` is capped
    /// at the sequence length and rounded down to even. Results are
    /// `(index, length)` pairs by window centre, then by length.
    pub fn pal_find_all_index(&self, min: usize, max: usize) -> Vec<(usize, usize)> {
        let min = (min.max(2) + 1) & !1;
        let max = max.min(self.len()) & !1;
        let mut found = Vec::new();
        if max < min {
            return found;
        }
        let s: &[u8] = self;
        for c in 1..s.len() {
            let mut len = 2;
            while len <= max && c + len / 2 <= s.len() && c >= len / 2 {
                let (i, j) = (c - len / 2, c + len / 2 - 1);
                if !is_pair(s[i], s[j]) {
                    break;
                }
                if len >= min {
                    found.push((i, len));
                }
                len += 2;
            }
        }
        found
    }

    /// Transition/transversion ratio against an equal-length sequence.
    ///
    /// Follows IEEE division when there are no transversions: infinite if
    /// transitions were seen, NaN for sequences with no substitutions.
    ///
    /// # Errors
    ///
    /// Returns [`KestrelError::LengthMismatch`] if the lengths differ.
    pub fn ti_tv_ratio(&self, other: &Dna8) -> Result<f64> {
        if self.len() != other.len() {
            return Err(KestrelError::length_mismatch(self.len(), other.len()));
        }
        let (mut ti, mut tv) = (0usize, 0usize);
        for (&a, &b) in self.iter().zip(other.iter()) {
            if same_base(a, b) {
                continue;
            }
            if is_purine(a) == is_purine(b) {
                ti += 1;
            } else {
                tv += 1;
            }
        }
        Ok(ti as f64 / tv as f64)
    }

    /// Iterate over the k-mer windows of the sequence.
    pub fn kmers(&self, k: usize) -> Result<KmerIter<'_>> {
        KmerIter::new(self, k)
    }
}

/// Hamming distance between DNA8 byte strings by `(a ^ b) & 6`.
pub fn hamming8(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(&x, &y)| (x ^ y) & 6 != 0).count()
}

// ---------------------------------------------------------------------------
// RNA8
// ---------------------------------------------------------------------------

impl Rna8 {
    /// Counts of `A, C, U, G`, ignoring case.
    pub fn base_freq(&self) -> BaseFreq {
        base_freq8(self)
    }

    /// Case-preserving reverse complement.
    pub fn reverse_complement(&self) -> Rna8 {
        Rna8::from_validated(self.iter().rev().map(|&b| rna_complement8(b)).collect())
    }

    /// Reverse-transcribe to DNA8.
    pub fn reverse_transcribe(&self) -> Dna8 {
        Dna8::from_validated(self.iter().map(|&b| reverse_transcribe8(b)).collect())
    }

    /// Translate codon by codon. Stops are emitted as `*`.
    pub fn translate(&self) -> Aa {
        Aa::from_validated(codon::translate_sequence(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::Sequence;

    fn d8(s: &str) -> Dna8 {
        Dna8::new(s).unwrap()
    }

    #[test]
    fn reverse_complement_preserves_case() {
        assert_eq!(d8("Atacaga").reverse_complement().as_bytes(), b"tctgtaT");
    }

    #[test]
    fn transcribe_case() {
        assert_eq!(d8("GaTtACA").transcribe().as_bytes(), b"GaUuACA");
        assert_eq!(
            Rna8::new("GaUuACA").unwrap().reverse_transcribe(),
            d8("GaTtACA")
        );
    }

    #[test]
    fn tolerant_ops_pass_unknowns() {
        let d = Dna::new("ACNnt-").unwrap();
        assert_eq!(d.reverse_complement().as_bytes(), b"-anNGT");
        assert_eq!(d.transcribe().as_bytes(), b"ACNnu-");
        assert_eq!(d.base_freq(), (1, 1, 1, 0));
        assert_eq!(Rna::new("AUgu").unwrap().reverse_complement().as_bytes(), b"acAU");
        assert_eq!(Rna::new("AUgu").unwrap().base_freq(), (1, 0, 2, 1));
    }

    #[test]
    fn base_freq_ignores_case() {
        assert_eq!(d8("AaCgTTg").base_freq(), (2, 1, 2, 2));
    }

    #[test]
    fn seq_all_index_case_sensitive() {
        let s = Seq::new("GATATATGCATATACTT").unwrap();
        assert_eq!(s.all_index(b"ATAT"), vec![1, 3, 9]);
        assert!(s.all_index(b"atat").is_empty());
    }

    #[test]
    fn dna8_all_index_ignores_case() {
        assert_eq!(d8("GATatATGCATATACTT").all_index(b"ATAT"), vec![1, 3, 9]);
    }

    #[test]
    fn seq_hamming_checks_length() {
        let a = Seq::new("GAGCCTACTAACGGGAT").unwrap();
        let b = Seq::new("CATCGTAATGACGGCCT").unwrap();
        assert_eq!(a.hamming(&b).unwrap(), 7);
        let c = Seq::new("CAT").unwrap();
        assert!(matches!(
            a.hamming(&c),
            Err(KestrelError::LengthMismatch { left: 17, right: 3 })
        ));
    }

    #[test]
    fn dna8_hamming_ignores_case() {
        assert_eq!(d8("GAGCCTACTAACGGGAT").hamming(b"catcgtaatgacggcct"), 7);
    }

    #[test]
    fn min_skew() {
        assert_eq!(d8("accagtgct").min_gc_skew(), vec![2, 3]);
        assert_eq!(
            d8("TAAAGACTGCCGAGAGGCCAACACGAGTGCTAGAACGAGGGGCGTAAACGCGGGTCCGAT").min_gc_skew(),
            vec![10, 23]
        );
    }

    #[test]
    fn min_skew_counts_from_first_base() {
        assert_eq!(d8("GGG").min_gc_skew(), vec![0]);
        assert_eq!(d8("GAG").min_gc_skew(), vec![0, 1]);
        assert_eq!(d8("TAT").min_gc_skew(), vec![0, 1, 2]);
        assert!(d8("").min_gc_skew().is_empty());
    }

    #[test]
    fn palindromes() {
        assert_eq!(
            d8("CAATGCATG").pal_find_all_index(4, 8),
            vec![(3, 4), (2, 6), (5, 4)]
        );
        assert!(d8("CAATGCATG").pal_find_all_index(10, 12).is_empty());
        // odd bounds round inward
        assert_eq!(d8("CAATGCATG").pal_find_all_index(5, 7), vec![(2, 6)]);
    }

    #[test]
    fn motif_hamming_min_window() {
        assert_eq!(d8("TTACCTTAAC").motif_hamming(b"AAA"), 1);
        assert_eq!(d8("AC").motif_hamming(b"AAA"), 3);
    }

    #[test]
    fn approximate_matching() {
        let s = d8("CGCCCGAATCCAGAACGCATTCCCATATTTCGGGACCACTGGCCTCCACGGTACGGACGTCAATCAAATGCCTAGCGGCTTGTGGTTTCTCCTACGCTCC");
        assert_eq!(
            s.approx_all_index(b"ATTCTGGA", 3),
            vec![6, 7, 26, 27, 78]
        );
        assert_eq!(d8("AACAAGCTGATAAACATTTAAAGAG").approx_count(b"AAAAA", 2), 11);
    }

    #[test]
    fn ti_tv() {
        let a = d8("GCAACGCACAACGAAAACCCTTAGGGACTGGATTATTTCGTGATCGTTGTAGTTATTGGAAGTACGGGCATCAACCCAGTT");
        let b = d8("TTATCTGACAAAGAAAGCCGTCAACGGCTGGATAATTTCGCGATCGTGCTGGTTACTGGCGGTACGAGTGTTCCTTTGGGT");
        let r = a.ti_tv_ratio(&b).unwrap();
        assert!((r - 1.214_285_714_285_714_2).abs() < 1e-9, "{}", r);
        assert!(a.ti_tv_ratio(&d8("A")).is_err());
    }

    #[test]
    fn ti_tv_without_transversions() {
        assert_eq!(d8("AC").ti_tv_ratio(&d8("GT")).unwrap(), f64::INFINITY);
        assert!(d8("ACgt").ti_tv_ratio(&d8("ACGT")).unwrap().is_nan());
    }

    #[test]
    fn gc_and_translate() {
        assert!((d8("GgCA").gc_content() - 0.75).abs() < 1e-12);
        assert_eq!(d8("").gc_content(), 0.0);
        assert_eq!(d8("ATGGCCtaa").translate().as_bytes(), b"MA*");
        assert_eq!(Rna8::new("AUGUGGU").unwrap().translate().as_bytes(), b"MW");
    }

    #[test]
    fn kmer_windows() {
        let s = d8("ACGT");
        let kmers: Vec<&[u8]> = s.kmers(3).unwrap().collect();
        assert_eq!(kmers, vec![b"ACG".as_slice(), b"CGT".as_slice()]);
    }
}

//! Sequences, motifs, string indices and assembly for the kestrel crates.
//!
//! Sequence types are case-preserving wrappers checked against an alphabet
//! at construction:
//!
//! - **Tolerant types**: [`Seq`], [`Dna`], [`Rna`], [`Aa`]
//! - **Strict 8-bit types**: [`Dna8`], [`Rna8`], [`Aa20`] with bit-trick
//!   complement, transcription and translation
//! - **K-mers**: [`KmerIter`], frequency arrays and mismatch-tolerant counting
//! - **Profiles and motifs**: [`Kmers`], [`FracProfile`], median string,
//!   greedy, randomized and Gibbs motif search
//! - **String indices**: KMP, [`Bwt`], suffix and LCP arrays, [`FmIndex`]
//! - **Assembly**: [`DeBruijn`] graphs and overlap reconstruction
//! - **FASTA**: streaming [`FastaReader`]
//!
//! # Example
//!
//! ```
//! use kestrel_seq::Dna8;
//!
//! let dna = Dna8::new("ATGgcc").unwrap();
//! assert_eq!(dna.reverse_complement().to_text(), "ggcCAT");
//! assert_eq!(dna.transcribe().to_text(), "AUGgcc");
//! assert_eq!(dna.translate().to_text(), "MA");
//! ```

pub mod alphabet;
pub mod assembly;
pub mod bwt;
pub mod codon;
pub mod fasta;
pub mod fm_index;
pub mod kmer;
pub mod motif;
pub mod pattern;
pub mod profile;
pub mod seq;
pub mod suffix;
pub mod types;

pub use alphabet::{
    Aa20Alphabet, AaAlphabet, Alphabet, ByteAlphabet, Dna8Alphabet, DnaAlphabet, Rna8Alphabet,
    RnaAlphabet,
};
pub use assembly::{DeBruijn, PairedDeBruijn, Str, StrFreq, StrKmers};
pub use bwt::Bwt;
pub use codon::{translate_codon, translate_sequence};
pub use fasta::{read_fasta, FastaReader, FastaRecord};
pub use fm_index::FmIndex;
pub use kmer::KmerIter;
pub use motif::{MotifResult, MotifSearchConfig};
pub use profile::{CountProfile, FracProfile, Kmers};
pub use seq::ValidatedSeq;
pub use types::{Aa, Aa20, BaseFreq, Dna, Dna8, Rna, Rna8, Seq};

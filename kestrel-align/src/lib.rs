//! Pairwise sequence alignment for the kestrel crates.
//!
//! One scored DP grid serves four modes (global, local, fitting, overlap)
//! with a linear gap penalty. A linear-space global variant and an
//! affine-gap global variant share the same [`Scorer`] plug-in.
//!
//! # Quick start
//!
//! ```
//! use kestrel_align::{align_pair, Mode, SubstitutionMatrix};
//!
//! let b62 = SubstitutionMatrix::blosum62();
//! let a = align_pair(Mode::Global, b"PLEASANTLY", b"MEANLY", &b62, 5).unwrap();
//! assert_eq!(a.score, 8);
//! assert_eq!(a.aligned2, b"-MEA--N-LY");
//! ```

pub mod affine;
pub mod engine;
pub mod linear;
pub mod scoring;
pub mod types;

pub use affine::align_affine;
pub use engine::{align_pair, align_pair_named, edit_distance, Grid, Rule};
pub use linear::align_linear_space;
pub use scoring::{constant_gap_score, linear_gap_score, MatchMismatch, Scorer, SubstitutionMatrix, GAP};
pub use types::{Alignment, Mode};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dna_seq(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')], 0..=max_len)
    }

    fn ungapped(t: &[u8]) -> Vec<u8> {
        t.iter().copied().filter(|&c| c != GAP).collect()
    }

    proptest! {
        #[test]
        fn linear_space_matches_global_score(
            a in dna_seq(30),
            b in dna_seq(30),
            indel in 0i32..4,
        ) {
            let m = MatchMismatch::default();
            let full = align_pair(Mode::Global, &a, &b, &m, indel).unwrap();
            let lin = align_linear_space(&a, &b, &m, indel).unwrap();
            prop_assert_eq!(lin.score, full.score);
            prop_assert_eq!(ungapped(&lin.aligned1), a);
            prop_assert_eq!(ungapped(&lin.aligned2), b);
        }

        #[test]
        fn traceback_rescores_to_grid_score(
            a in dna_seq(25),
            b in dna_seq(25),
            mode in prop_oneof![Just(Mode::Global), Just(Mode::Local), Just(Mode::Fitting), Just(Mode::Overlap)],
        ) {
            let m = MatchMismatch::default();
            let r = align_pair(mode, &a, &b, &m, 1).unwrap();
            prop_assert_eq!(r.aligned1.len(), r.aligned2.len());
            prop_assert_eq!(linear_gap_score(&r.aligned1, &r.aligned2, &m, 1).unwrap(), r.score);
        }

        #[test]
        fn local_score_nonnegative(a in dna_seq(30), b in dna_seq(30)) {
            let r = align_pair(Mode::Local, &a, &b, &MatchMismatch::default(), 1).unwrap();
            prop_assert!(r.score >= 0);
        }

        #[test]
        fn affine_with_equal_penalties_is_linear(
            a in dna_seq(20),
            b in dna_seq(20),
            indel in 1i32..4,
        ) {
            let m = MatchMismatch::default();
            let aff = align_affine(&a, &b, &m, indel, indel).unwrap();
            let lin = align_pair(Mode::Global, &a, &b, &m, indel).unwrap();
            prop_assert_eq!(aff.score, lin.score);
        }

        #[test]
        fn edit_distance_symmetric(a in dna_seq(20), b in dna_seq(20)) {
            let d = edit_distance(&a, &b);
            prop_assert_eq!(d, edit_distance(&b, &a));
            prop_assert!(d <= a.len().max(b.len()));
        }
    }
}

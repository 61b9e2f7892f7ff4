//! Peptide masses and spectrum-driven sequencing for the kestrel crates.
//!
//! - **Mass tables**: compile-time residue masses in [`table`], integer and
//!   monoisotopic
//! - **Spectra**: linear and cyclic theoretical spectra in [`spectrum`]
//! - **Multisets**: [`MassCounts`] for spectrum consistency and scoring
//! - **Convolution**: [`convolution`] and the alphabet cut
//!   [`MassCounts::cut_aa`]
//! - **Sequencing**: [`leaderboard_sequence`], [`cyclopeptide_sequencing`]
//!   and [`convolution_cyclopeptide_sequencing`]
//!
//! # Example
//!
//! ```
//! use kestrel_mass::{cyclic_spectrum, cyclopeptide_sequencing};
//!
//! let spec = cyclic_spectrum(&[113, 128, 186]);
//! assert_eq!(spec, vec![0, 113, 128, 186, 241, 299, 314, 427]);
//! let found = cyclopeptide_sequencing(&spec).unwrap();
//! assert_eq!(found.len(), 6);
//! ```

pub mod convolution;
pub mod leaderboard;
pub mod multiset;
pub mod spectrum;
pub mod table;

pub use convolution::{convolution, convolve_spectra};
pub use leaderboard::{
    convolution_cyclopeptide_sequencing, cyclopeptide_sequencing, leaderboard_sequence, Candidate,
    LeaderboardConfig,
};
pub use multiset::MassCounts;
pub use spectrum::{
    cyclic_spectrum, cyclic_spectrum_mass, linear_spectrum, linear_spectrum_mass, IntSpec,
    MassSpec,
};
pub use table::{
    integer_mass, monoisotopic_mass, peptide_integer_mass, peptide_masses,
    peptide_monoisotopic_mass, AaInt, AaMass, AA18_INTEGER, AA20_INTEGER, AA20_MONOISOTOPIC,
};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn peptide() -> impl Strategy<Value = Vec<u32>> {
        proptest::collection::vec(proptest::sample::select(AA18_INTEGER.to_vec()), 0..12)
    }

    proptest! {
        #[test]
        fn spectra_sorted_ending_in_parent_mass(p in peptide()) {
            let pm: u32 = p.iter().sum();
            for spec in [linear_spectrum(&p), cyclic_spectrum(&p)] {
                prop_assert!(spec.windows(2).all(|w| w[0] <= w[1]));
                prop_assert_eq!(spec[0], 0);
                prop_assert_eq!(*spec.last().unwrap(), pm);
            }
        }

        #[test]
        fn spectrum_sizes(p in peptide()) {
            let n = p.len();
            prop_assert_eq!(linear_spectrum(&p).len(), n * (n + 1) / 2 + 1);
            let cyc = if n < 2 { n + 1 } else { n * (n - 1) + 2 };
            prop_assert_eq!(cyclic_spectrum(&p).len(), cyc);
        }

        #[test]
        fn linear_spectrum_within_cyclic(p in peptide()) {
            let lin: MassCounts = linear_spectrum(&p).into_iter().collect();
            let cyc: MassCounts = cyclic_spectrum(&p).into_iter().collect();
            prop_assert!(lin.is_subset(&cyc));
        }

        #[test]
        fn float_spectra_end_in_parent_mass(p in proptest::collection::vec(57.0f64..187.0, 1..10)) {
            let pm: f64 = p.iter().sum();
            for spec in [linear_spectrum_mass(&p), cyclic_spectrum_mass(&p)] {
                prop_assert!(spec.windows(2).all(|w| w[0] <= w[1]));
                prop_assert!((spec[spec.len() - 1] - pm).abs() < 1e-6);
            }
        }

        #[test]
        fn leaderboard_hits_parent_mass(p in proptest::collection::vec(proptest::sample::select(AA18_INTEGER.to_vec()), 1..5)) {
            let spec = cyclic_spectrum(&p);
            let cfg = LeaderboardConfig { n: 10, nr: 1 };
            let res = leaderboard_sequence(&spec, &AA18_INTEGER, &cfg).unwrap();
            prop_assert!(!res.is_empty());
            prop_assert_eq!(res[0].total, *spec.last().unwrap());
        }
    }
}

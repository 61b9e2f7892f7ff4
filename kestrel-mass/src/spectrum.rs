//! Theoretical spectra of linear and cyclic peptides.
//!
//! A spectrum is the sorted multiset of the masses of every contiguous
//! sub-peptide, plus 0 for the empty one. The last element is the parent
//! mass.

use std::ops::{Add, Sub};

/// Sorted integer spectrum.
pub type IntSpec = Vec<u32>;

/// Sorted monoisotopic spectrum.
pub type MassSpec = Vec<f64>;

/// Unsorted sub-peptide masses from prefix sums. Cyclic peptides add the
/// wrap-around runs as the complement of each inner run.
fn sub_masses<T>(p: &[T], cyclic: bool) -> Vec<T>
where
    T: Copy + Default + Add<Output = T> + Sub<Output = T>,
{
    let n = p.len();
    let mut prefix = Vec::with_capacity(n + 1);
    let mut acc = T::default();
    prefix.push(acc);
    for &m in p {
        acc = acc + m;
        prefix.push(acc);
    }
    let total = prefix[n];

    let mut spec = Vec::with_capacity(if cyclic { n * n + 2 } else { n * (n + 1) / 2 + 1 });
    spec.push(T::default());
    for i in 0..n {
        for j in i + 1..=n {
            let run = prefix[j] - prefix[i];
            spec.push(run);
            if cyclic && i > 0 && j < n {
                spec.push(total - run);
            }
        }
    }
    spec
}

/// Spectrum of a linear peptide: `n(n+1)/2 + 1` masses.
///
/// The summed residue masses must fit in a `u32`.
pub fn linear_spectrum(p: &[u32]) -> IntSpec {
    let mut spec = sub_masses(p, false);
    spec.sort_unstable();
    spec
}

/// Spectrum of a cyclic peptide: `n(n-1) + 2` masses for `n > 1`.
///
/// The summed residue masses must fit in a `u32`.
pub fn cyclic_spectrum(p: &[u32]) -> IntSpec {
    let mut spec = sub_masses(p, true);
    spec.sort_unstable();
    spec
}

/// [`linear_spectrum`] over monoisotopic masses.
pub fn linear_spectrum_mass(p: &[f64]) -> MassSpec {
    let mut spec = sub_masses(p, false);
    spec.sort_by(f64::total_cmp);
    spec
}

/// [`cyclic_spectrum`] over monoisotopic masses.
pub fn cyclic_spectrum_mass(p: &[f64]) -> MassSpec {
    let mut spec = sub_masses(p, true);
    spec.sort_by(f64::total_cmp);
    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    const NQEL: [u32; 4] = [114, 128, 129, 113];

    #[test]
    fn linear_nqel() {
        assert_eq!(
            linear_spectrum(&[113, 129, 128, 114]),
            vec![0, 113, 114, 128, 129, 242, 242, 257, 370, 371, 484]
        );
    }

    #[test]
    fn cyclic_nqel() {
        assert_eq!(
            cyclic_spectrum(&NQEL),
            vec![0, 113, 114, 128, 129, 227, 242, 242, 257, 355, 356, 370, 371, 484]
        );
    }

    #[test]
    fn tiny_peptides() {
        assert_eq!(linear_spectrum(&[]), vec![0]);
        assert_eq!(cyclic_spectrum(&[]), vec![0]);
        assert_eq!(cyclic_spectrum(&[57]), vec![0, 57]);
        assert_eq!(cyclic_spectrum(&[57, 71]), vec![0, 57, 71, 128]);
    }

    #[test]
    fn float_spectra() {
        let gly_ala = [57.02146, 71.03711];
        let lin = linear_spectrum_mass(&gly_ala);
        assert_eq!(lin.len(), 4);
        assert_eq!(lin[0], 0.0);
        assert!((lin[3] - 128.05857).abs() < 1e-9);

        let cyc = cyclic_spectrum_mass(&[57.02146, 71.03711, 87.03203]);
        assert_eq!(cyc.len(), 8);
        assert!((cyc[7] - 215.0906).abs() < 1e-9);
        assert!(cyc.windows(2).all(|w| w[0] <= w[1]));
    }
}

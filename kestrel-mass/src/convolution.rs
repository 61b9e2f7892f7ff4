//! Spectral convolution and the alphabets derived from it.

use kestrel_core::{cut, Scored};

use crate::multiset::MassCounts;

/// Lightest and heaviest mass accepted as a residue by [`MassCounts::cut_aa`].
pub const AA_MASS_RANGE: std::ops::RangeInclusive<u32> = 57..=200;

/// The most frequent positive difference `x - y` with `x` from `a` and `y`
/// from `b`, as `(difference, multiplicity)`.
///
/// Ties go to the smaller difference. `None` if no difference is positive.
pub fn convolve_spectra(a: &[u32], b: &[u32]) -> Option<(u32, usize)> {
    let mut diffs = MassCounts::new();
    for &x in a {
        for &y in b {
            if x > y {
                diffs.add(x - y);
            }
        }
    }
    let mut best: Option<(u32, usize)> = None;
    for (d, c) in diffs.iter() {
        if best.map_or(true, |(_, bc)| c > bc) {
            best = Some((d, c));
        }
    }
    best
}

/// Positive pairwise differences within one spectrum.
pub fn convolution(spec: &[u32]) -> MassCounts {
    let mut conv = MassCounts::new();
    for (i, &x) in spec.iter().enumerate() {
        for &y in &spec[i + 1..] {
            if x != y {
                conv.add(x.abs_diff(y));
            }
        }
    }
    conv
}

struct Ranked {
    mass: u32,
    count: usize,
}

impl Scored for Ranked {
    fn score(&self) -> f64 {
        self.count as f64
    }
}

impl MassCounts {
    /// The `m` most frequent masses in [`AA_MASS_RANGE`], plus any tied with
    /// the last. Most frequent first; lighter first among equals.
    pub fn cut_aa(&self, m: usize) -> Vec<u32> {
        let mut ranked: Vec<Ranked> = self
            .iter()
            .filter(|(mass, _)| AA_MASS_RANGE.contains(mass))
            .map(|(mass, count)| Ranked { mass, count })
            .collect();
        let r = cut(&mut ranked, m);
        ranked[..r].iter().map(|x| x.mass).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_convolution() {
        let conv = convolution(&[0, 137, 186, 323]);
        assert_eq!(conv.iter().collect::<Vec<_>>(), vec![(49, 1), (137, 2), (186, 2), (323, 1)]);
    }

    #[test]
    fn convolution_ignores_order() {
        assert_eq!(convolution(&[323, 0, 186, 137]), convolution(&[0, 137, 186, 323]));
    }

    #[test]
    fn two_spectra() {
        assert_eq!(convolve_spectra(&[0, 137, 186, 323], &[0, 137, 186, 323]), Some((137, 2)));
        assert_eq!(convolve_spectra(&[57, 71], &[0]), Some((57, 1)));
        assert_eq!(convolve_spectra(&[0], &[0, 57]), None);
        assert_eq!(convolve_spectra(&[], &[]), None);
    }

    #[test]
    fn alphabet_cut_with_ties() {
        let conv = convolution(&[0, 57, 118, 179, 236, 240, 301]);
        assert_eq!(conv.get(61), 4);
        assert_eq!(conv.cut_aa(2), vec![61, 122]);
        let conv = convolution(&[0, 57, 71, 128]);
        assert_eq!(conv.cut_aa(1), vec![57, 71]);
        assert_eq!(conv.cut_aa(0), Vec::<u32>::new());
    }
}

//! Amino acid residue masses.
//!
//! Both tables have 25 entries indexed by `aa - b'A'` over `A..=Y`. The
//! letters `B J O U X` are holes holding zero; `Z` falls past the end.

use kestrel_seq::alphabet::CASE_BIT;
use kestrel_seq::Aa20;

/// Integer-coded peptide: one residue mass per position.
pub type AaInt = Vec<u32>;

/// Monoisotopic-mass-coded peptide.
pub type AaMass = Vec<f64>;

/// Monoisotopic residue masses in daltons.
#[rustfmt::skip]
pub const AA20_MONOISOTOPIC: [f64; 25] = [
    71.03711,  0.0,       103.00919, 115.02694, 129.04259, // A B C D E
    147.06841, 57.02146,  137.05891, 113.08406, 0.0,       // F G H I J
    128.09496, 113.08406, 131.04049, 114.04293, 0.0,       // K L M N O
    97.05276,  128.05858, 156.10111, 87.03203,  101.04768, // P Q R S T
    0.0,       99.06841,  186.07931, 0.0,       163.06333, // U V W X Y
];

/// Nominal (integer) residue masses.
#[rustfmt::skip]
pub const AA20_INTEGER: [u32; 25] = [
    71,  0,   103, 115, 129, // A B C D E
    147, 57,  137, 113, 0,   // F G H I J
    128, 113, 131, 114, 0,   // K L M N O
    97,  128, 156, 87,  101, // P Q R S T
    0,   99,  186, 0,   163, // U V W X Y
];

/// The 18 distinct integer masses, ascending. `I`/`L` and `K`/`Q` collide.
pub const AA18_INTEGER: [u32; 18] = [
    57, 71, 87, 97, 99, 101, 103, 113, 114, 115, 128, 129, 131, 137, 147, 156, 163, 186,
];

#[inline]
fn slot(aa: u8) -> Option<usize> {
    let up = aa & !CASE_BIT;
    if !(b'A'..=b'Y').contains(&up) {
        return None;
    }
    Some((up - b'A') as usize)
}

/// Integer mass of one residue, either case. `None` for non-residues.
pub fn integer_mass(aa: u8) -> Option<u32> {
    slot(aa).map(|i| AA20_INTEGER[i]).filter(|&m| m != 0)
}

/// Monoisotopic mass of one residue, either case. `None` for non-residues.
pub fn monoisotopic_mass(aa: u8) -> Option<f64> {
    slot(aa).map(|i| AA20_MONOISOTOPIC[i]).filter(|&m| m != 0.0)
}

/// Residue letters sharing integer mass `m`, in alphabetical order.
pub fn residues_with_mass(m: u32) -> Vec<u8> {
    (b'A'..=b'Y').filter(|&aa| integer_mass(aa) == Some(m)).collect()
}

/// Per-residue integer masses of a peptide.
pub fn peptide_masses(p: &Aa20) -> AaInt {
    p.iter().filter_map(|&aa| integer_mass(aa)).collect()
}

/// Per-residue monoisotopic masses of a peptide.
pub fn peptide_monoisotopic_masses(p: &Aa20) -> AaMass {
    p.iter().filter_map(|&aa| monoisotopic_mass(aa)).collect()
}

/// Integer mass of the whole peptide.
pub fn peptide_integer_mass(p: &Aa20) -> u32 {
    p.iter().filter_map(|&aa| integer_mass(aa)).sum()
}

/// Monoisotopic mass of the whole peptide.
pub fn peptide_monoisotopic_mass(p: &Aa20) -> f64 {
    p.iter().filter_map(|&aa| monoisotopic_mass(aa)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_seq::alphabet::AA20_ALPHABET;

    #[test]
    fn holes_and_range() {
        for aa in [b'B', b'J', b'O', b'U', b'X', b'Z', b'*', b'a' - 1] {
            assert_eq!(integer_mass(aa), None);
            assert_eq!(monoisotopic_mass(aa), None);
        }
        assert_eq!(integer_mass(b'w'), Some(186));
        assert_eq!(monoisotopic_mass(b'G'), Some(57.02146));
    }

    #[test]
    fn twenty_residues_eighteen_masses() {
        let mut masses: Vec<u32> = AA20_ALPHABET.iter().filter_map(|&aa| integer_mass(aa)).collect();
        assert_eq!(masses.len(), 20);
        masses.sort_unstable();
        masses.dedup();
        assert_eq!(masses, AA18_INTEGER);
        assert_eq!(residues_with_mass(113), b"IL");
        assert_eq!(residues_with_mass(128), b"KQ");
    }

    #[test]
    fn integer_is_nominal_monoisotopic() {
        for &aa in AA20_ALPHABET {
            let (i, f) = (integer_mass(aa).unwrap(), monoisotopic_mass(aa).unwrap());
            assert_eq!(i, f.trunc() as u32, "{}", aa as char);
        }
    }

    #[test]
    fn peptide_totals() {
        let p = Aa20::new("NQel").unwrap();
        assert_eq!(peptide_masses(&p), vec![114, 128, 129, 113]);
        assert_eq!(peptide_integer_mass(&p), 484);
        let mono = peptide_monoisotopic_mass(&p);
        assert!((mono - 484.22816).abs() < 1e-9);
        assert_eq!(peptide_monoisotopic_masses(&p).len(), 4);
    }
}

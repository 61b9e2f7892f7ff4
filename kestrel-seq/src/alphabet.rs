//! Alphabet definitions and the case-preserving DNA8 bit helpers.
//!
//! Each alphabet is a zero-sized marker type that implements [`Alphabet`].
//! Strict alphabets (`Dna8`, `Rna8`, `Aa20`) list their valid bytes in both
//! cases; tolerant alphabets accept any byte.
//!
//! The DNA8 helpers rely on bits 1-2 of the ASCII codes: `x & 6` is
//! `A=0, C=2, T=4, G=6` in either case, and `U` shares `T`'s pattern.

/// Bit 5, the ASCII lower-case bit.
pub const CASE_BIT: u8 = 0x20;

/// The 20 proteinogenic amino acids in canonical order.
pub const AA20_ALPHABET: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

/// Upper-case DNA bases in 2-bit code order.
pub const DNA_BASES: &[u8; 4] = b"ACTG";

// XOR of two pairing bases, case bit cleared.
const PAIR_AT: u8 = b'A' ^ b'T';
const PAIR_CG: u8 = b'C' ^ b'G';

/// 2-bit code of a DNA8/RNA8 base: `A=0, C=1, T/U=2, G=3`.
#[inline]
pub fn base_code(x: u8) -> usize {
    ((x & 6) >> 1) as usize
}

/// Upper-case base for a 2-bit code with the case bit of `like` applied.
#[inline]
pub fn base_from_code(code: usize, like: u8) -> u8 {
    DNA_BASES[code & 3] | (like & CASE_BIT)
}

/// Case-preserving DNA complement of an `ACTGactg` byte.
#[inline]
pub fn complement8(x: u8) -> u8 {
    x ^ (((!x & 2) >> 1) * 17) ^ 4
}

/// Case-preserving RNA complement of an `ACUGacug` byte.
#[inline]
pub fn rna_complement8(x: u8) -> u8 {
    match x & !CASE_BIT {
        b'A' => b'U' | (x & CASE_BIT),
        b'U' => b'A' | (x & CASE_BIT),
        _ => complement8(x),
    }
}

/// `T`/`t` becomes `U`/`u`; every other byte is returned unchanged.
#[inline]
pub fn transcribe8(x: u8) -> u8 {
    if x & !CASE_BIT == b'T' {
        x + 1
    } else {
        x
    }
}

/// `U`/`u` becomes `T`/`t`; every other byte is returned unchanged.
#[inline]
pub fn reverse_transcribe8(x: u8) -> u8 {
    if x & !CASE_BIT == b'U' {
        x - 1
    } else {
        x
    }
}

/// Whether two DNA8 bases pair (A-T or C-G), ignoring case.
#[inline]
pub fn is_pair(a: u8, b: u8) -> bool {
    let x = (a ^ b) & !CASE_BIT;
    x == PAIR_AT || x == PAIR_CG
}

/// Whether two DNA8 bases are the same base, ignoring case.
#[inline]
pub fn same_base(a: u8, b: u8) -> bool {
    (a ^ b) & 6 == 0
}

/// Whether a DNA8 base is a purine (`A` or `G`).
#[inline]
pub fn is_purine(x: u8) -> bool {
    let c = base_code(x);
    c == 0 || c == 3
}

/// Trait for sequence alphabets.
pub trait Alphabet: Clone + 'static {
    /// Human-readable name (e.g. "DNA8").
    const NAME: &'static str;

    /// The set of valid bytes, both cases. Empty for tolerant alphabets.
    const VALID_BYTES: &'static [u8];

    /// Check whether a byte is valid.
    fn is_valid(b: u8) -> bool {
        Self::VALID_BYTES.contains(&b)
    }
}

macro_rules! tolerant_alphabet {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Alphabet for $name {
            const NAME: &'static str = $label;
            const VALID_BYTES: &'static [u8] = b"";

            fn is_valid(_: u8) -> bool {
                true
            }
        }
    };
}

macro_rules! strict_alphabet {
    ($(#[$doc:meta])* $name:ident, $label:literal, $bytes:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Alphabet for $name {
            const NAME: &'static str = $label;
            const VALID_BYTES: &'static [u8] = $bytes;
        }
    };
}

tolerant_alphabet!(
    /// Arbitrary bytes; comparisons are case-sensitive.
    ByteAlphabet,
    "Seq"
);
tolerant_alphabet!(
    /// DNA, case-tolerant; unknown bytes pass through unchanged.
    DnaAlphabet,
    "DNA"
);
tolerant_alphabet!(
    /// RNA, case-tolerant; unknown bytes pass through unchanged.
    RnaAlphabet,
    "RNA"
);
tolerant_alphabet!(
    /// Amino acids, case-tolerant.
    AaAlphabet,
    "AA"
);
strict_alphabet!(
    /// Strict 8-symbol DNA: `ACTGactg`.
    Dna8Alphabet,
    "DNA8",
    b"ACTGactg"
);
strict_alphabet!(
    /// Strict 8-symbol RNA: `ACUGacug`.
    Rna8Alphabet,
    "RNA8",
    b"ACUGacug"
);
strict_alphabet!(
    /// The 20 proteinogenic amino acids in either case.
    Aa20Alphabet,
    "AA20",
    b"ACDEFGHIKLMNPQRSTVWYacdefghiklmnpqrstvwy"
);

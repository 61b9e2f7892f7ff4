//! Standard genetic code over DNA8/RNA8 codons.
//!
//! The table is indexed by the 2-bit base codes of the three codon bytes, so a
//! DNA codon and its RNA transcript translate identically.

/// Amino acid per codon index; `*` marks stop.
pub const CODONS: &[u8; 64] =
    b"KNNKTTTTIIIMRSSRQHHQPPPPLLLLRRRR*YY*SSSSLFFL*CCWEDDEAAAAVVVVGGGG";

/// The amino acid symbol used for stop codons.
pub const STOP: u8 = b'*';

/// 6-bit table index of a codon.
#[inline]
pub fn codon_index(b0: u8, b1: u8, b2: u8) -> usize {
    (((b0 & 6) << 3) | ((b1 & 6) << 1) | ((b2 & 6) >> 1)) as usize
}

/// Translate one codon of DNA8 or RNA8 bytes.
#[inline]
pub fn translate_codon(b0: u8, b1: u8, b2: u8) -> u8 {
    CODONS[codon_index(b0, b1, b2)]
}

/// Whether the codon is `ATG`/`AUG`, ignoring case.
pub fn is_start(b0: u8, b1: u8, b2: u8) -> bool {
    b0.to_ascii_uppercase() == b'A'
        && matches!(b1.to_ascii_uppercase(), b'T' | b'U')
        && b2.to_ascii_uppercase() == b'G'
}

/// Translate consecutive codons. A trailing partial codon is ignored.
pub fn translate_sequence(seq: &[u8]) -> Vec<u8> {
    seq.chunks_exact(3)
        .map(|c| translate_codon(c[0], c[1], c[2]))
        .collect()
}

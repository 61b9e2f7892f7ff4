//! Core trait definitions shared across the kestrel crates.

/// A biological sequence (DNA, RNA, peptide, or raw bytes).
pub trait Sequence {
    /// The raw byte representation of the sequence.
    fn as_bytes(&self) -> &[u8];

    /// Length in residues/bases.
    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the sequence is empty.
    fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl Sequence for [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl Sequence for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

/// A type that carries a numeric score (alignment score, spectrum score, ...).
pub trait Scored {
    /// The score value.
    fn score(&self) -> f64;
}

/// Sort `list` by score, best first, and return how many entries make the
/// top `n` once ties for last place are included.
///
/// The sort is stable. The result is `list.len()` when `n` covers the list
/// or every entry past `n` ties with entry `n - 1`.
pub fn cut<T: Scored>(list: &mut [T], n: usize) -> usize {
    list.sort_by(|a, b| b.score().total_cmp(&a.score()));
    if n == 0 {
        return 0;
    }
    let mut r = n;
    while r < list.len() && list[r - 1].score() == list[r].score() {
        r += 1;
    }
    r.min(list.len())
}

/// A type that can produce a summary of its contents.
pub trait Summarizable {
    /// A one-line summary suitable for display.
    fn summary(&self) -> String;
}

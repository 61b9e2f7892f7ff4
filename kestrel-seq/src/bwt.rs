//! Burrows-Wheeler Transform.
//!
//! The text is terminated by the sentinel `$`, so `$` may not occur in it.
//! The transform is read off a sort-based suffix array; inversion walks the
//! LF mapping. [`crate::FmIndex`] keeps its terminator out of band and
//! indexes any bytes.

use kestrel_core::{KestrelError, Result};

use crate::suffix::suffix_array;

/// Sentinel byte appended to the text.
pub const SENTINEL: u8 = b'$';

/// Burrows-Wheeler Transform of a byte string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bwt {
    bwt: Vec<u8>,
    primary_index: usize,
}

impl Bwt {
    /// Build the BWT of `text`; the sentinel is appended internally.
    ///
    /// # Errors
    ///
    /// Returns [`KestrelError::InvalidInput`] if `text` contains `$`.
    pub fn build(text: &[u8]) -> Result<Self> {
        if let Some(i) = text.iter().position(|&b| b == SENTINEL) {
            return Err(KestrelError::InvalidInput(format!(
                "text holds the '$' sentinel at position {}",
                i
            )));
        }
        let mut augmented = Vec::with_capacity(text.len() + 1);
        augmented.extend_from_slice(text);
        augmented.push(SENTINEL);
        let n = augmented.len();
        let sa = suffix_array(&augmented);
        let primary_index = sa.iter().position(|&p| p == 0).unwrap_or(0);
        Ok(Self {
            bwt: sa.iter().map(|&p| augmented[(p + n - 1) % n]).collect(),
            primary_index,
        })
    }

    /// Wrap an existing transform that contains exactly one sentinel.
    pub fn from_transform(bwt: Vec<u8>) -> Result<Self> {
        let mut at = bwt.iter().enumerate().filter(|(_, &b)| b == SENTINEL);
        match (at.next(), at.next()) {
            (Some((primary_index, _)), None) => Ok(Self { bwt, primary_index }),
            _ => Err(KestrelError::InvalidInput(
                "transform must contain exactly one '$'".into(),
            )),
        }
    }

    /// The transform, sentinel included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bwt
    }

    /// Row of the sentinel in the transform.
    pub fn primary_index(&self) -> usize {
        self.primary_index
    }

    /// Length including the sentinel.
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    /// Whether the transform holds only the sentinel.
    pub fn is_empty(&self) -> bool {
        self.bwt.len() <= 1
    }

    /// Reconstruct the original text, without the sentinel.
    pub fn invert(&self) -> Vec<u8> {
        let n = self.bwt.len();
        if n <= 1 {
            return vec![];
        }

        let mut counts = [0usize; 256];
        for &b in &self.bwt {
            counts[b as usize] += 1;
        }
        let mut c_table = [0usize; 256];
        let mut cumulative = 0;
        for (c, &count) in counts.iter().enumerate() {
            c_table[c] = cumulative;
            cumulative += count;
        }

        // occ[i]: rank of bwt[i] among equal bytes before it
        let mut running = [0usize; 256];
        let occ: Vec<usize> = self
            .bwt
            .iter()
            .map(|&b| {
                let r = running[b as usize];
                running[b as usize] += 1;
                r
            })
            .collect();

        let mut result = vec![0u8; n - 1];
        let mut idx = self.primary_index;
        for i in (0..n - 1).rev() {
            idx = c_table[self.bwt[idx] as usize] + occ[idx];
            result[i] = self.bwt[idx];
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_transform() {
        assert_eq!(Bwt::build(b"GCGTGCCTGGTCA").unwrap().as_bytes(), b"ACTGGCT$TGCGGC");
        assert_eq!(Bwt::build(b"panamabananas").unwrap().as_bytes(), b"smnpbnnaaaaa$a");
    }

    #[test]
    fn invert_known() {
        let bwt = Bwt::from_transform(b"TTCCTAACG$A".to_vec()).unwrap();
        assert_eq!(bwt.invert(), b"TACATCACGT");
    }

    #[test]
    fn from_transform_rejects_missing_sentinel() {
        assert!(Bwt::from_transform(b"ACGT".to_vec()).is_err());
        assert!(Bwt::from_transform(b"A$C$".to_vec()).is_err());
    }

    #[test]
    fn roundtrips() {
        for text in [&b""[..], b"A", b"aaaa", b"ACGTACGT", b"mississippi", b"banana", b"a b!c"] {
            let bwt = Bwt::build(text).unwrap();
            assert_eq!(bwt.len(), text.len() + 1);
            assert_eq!(bwt.invert(), text);
        }
        assert!(Bwt::build(b"").unwrap().is_empty());
    }

    #[test]
    fn sentinel_in_text_rejected() {
        assert!(matches!(Bwt::build(b"ab$ab"), Err(KestrelError::InvalidInput(_))));
        assert!(Bwt::build(b"$").is_err());
    }
}

//! Fixed-size bit set over `u64` blocks.
//!
//! [`BitSet`] marks membership for dense integer keys such as node indices.
//! Used as the leaf set of a [`FromList`](crate::graph::FromList).

/// A fixed-length set of bits backed by `u64` blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitSet {
    blocks: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// An all-zero set able to hold `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            blocks: vec![0u64; (len + 63) / 64],
            len,
        }
    }

    /// Build a set from a slice of booleans.
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut set = Self::new(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b {
                set.insert(i);
            }
        }
        set
    }

    /// Number of addressable bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set addresses zero bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set bit `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`.
    pub fn insert(&mut self, i: usize) {
        assert!(i < self.len, "index out of bounds");
        self.blocks[i / 64] |= 1u64 << (i % 64);
    }

    /// Clear bit `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`.
    pub fn remove(&mut self, i: usize) {
        assert!(i < self.len, "index out of bounds");
        self.blocks[i / 64] &= !(1u64 << (i % 64));
    }

    /// Whether bit `i` is set. Out-of-range indices read as unset.
    pub fn contains(&self, i: usize) -> bool {
        i < self.len && (self.blocks[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Number of set bits in positions `[0, i)`.
    pub fn rank1(&self, i: usize) -> usize {
        let i = i.min(self.len);
        let full = i / 64;
        let mut count: usize = self.blocks[..full]
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum();
        let rem = i % 64;
        if rem > 0 {
            let mask = (1u64 << rem) - 1;
            count += (self.blocks[full] & mask).count_ones() as usize;
        }
        count
    }

    /// Iterate over set bit positions in increasing order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks.iter().enumerate().flat_map(|(bi, &block)| {
            let mut word = block;
            std::iter::from_fn(move || {
                if word == 0 {
                    return None;
                }
                let tz = word.trailing_zeros() as usize;
                word &= word - 1;
                Some(bi * 64 + tz)
            })
        })
    }
}

//! FM-index with a partial suffix array and checkpointed ranks.
//!
//! Only every `sa_step`-th text position keeps its suffix-array entry and
//! ranks are stored every `checkpoint_step` rows; the rest is recovered by
//! walking the LF mapping or scanning from the nearest checkpoint.
//!
//! The transform lives in a `u16` symbol space: byte `b` is `b + 1` and `0`
//! is the terminator, so every byte value may occur in the text.

use kestrel_core::{KestrelError, Result};

use crate::suffix::suffix_array;

/// Out-of-band terminator symbol, below every byte.
const TERMINATOR: u16 = 0;

/// Number of distinct symbols: the terminator plus all bytes.
const SYMBOLS: usize = 257;

/// Marks symbols absent from the text.
const ABSENT: u16 = u16::MAX;

/// Default sparseness of the partial suffix array.
pub const DEFAULT_SA_STEP: usize = 5;

/// Default spacing of rank checkpoints.
pub const DEFAULT_CHECKPOINT_STEP: usize = 32;

/// FM-index over an arbitrary byte text.
#[derive(Debug, Clone)]
pub struct FmIndex {
    bwt: Vec<u16>,
    /// Dense symbol number per transform symbol; [`ABSENT`] if unused.
    symbol: Vec<u16>,
    /// First row of each symbol in the sorted first column.
    first_occurrence: Vec<usize>,
    /// `checkpoints[r][c]`: count of symbol `c` in `bwt[..r * checkpoint_step]`.
    checkpoints: Vec<Vec<usize>>,
    checkpoint_step: usize,
    /// `(row, text position)` for rows whose position is a multiple of `sa_step`.
    partial_sa: Vec<(usize, usize)>,
    sa_step: usize,
}

impl FmIndex {
    /// Build with the default steps.
    pub fn build(text: &[u8]) -> Self {
        Self::build_unchecked(text, DEFAULT_SA_STEP, DEFAULT_CHECKPOINT_STEP)
    }

    /// Build with explicit suffix-array and checkpoint spacing.
    ///
    /// # Errors
    ///
    /// Returns an error if either step is zero.
    pub fn with_steps(text: &[u8], sa_step: usize, checkpoint_step: usize) -> Result<Self> {
        if sa_step == 0 || checkpoint_step == 0 {
            return Err(KestrelError::InvalidInput(
                "FM-index steps must be at least 1".into(),
            ));
        }
        Ok(Self::build_unchecked(text, sa_step, checkpoint_step))
    }

    fn build_unchecked(text: &[u8], sa_step: usize, checkpoint_step: usize) -> Self {
        // The empty suffix sorts first; slice order puts prefixes first too.
        let mut sa = Vec::with_capacity(text.len() + 1);
        sa.push(text.len());
        sa.extend(suffix_array(text));
        let bwt: Vec<u16> = sa
            .iter()
            .map(|&p| match p {
                0 => TERMINATOR,
                p => u16::from(text[p - 1]) + 1,
            })
            .collect();

        let mut present = [false; SYMBOLS];
        for &c in &bwt {
            present[c as usize] = true;
        }
        let mut symbol = vec![ABSENT; SYMBOLS];
        let mut n_sym = 0u16;
        for (c, _) in present.iter().enumerate().filter(|(_, &p)| p) {
            symbol[c] = n_sym;
            n_sym += 1;
        }
        let n_sym = n_sym as usize;

        let mut counts = vec![0usize; n_sym];
        let mut checkpoints = Vec::with_capacity(bwt.len() / checkpoint_step + 1);
        for (row, &b) in bwt.iter().enumerate() {
            if row % checkpoint_step == 0 {
                checkpoints.push(counts.clone());
            }
            counts[symbol[b as usize] as usize] += 1;
        }
        if bwt.len() % checkpoint_step == 0 {
            checkpoints.push(counts.clone());
        }

        let mut first_occurrence = vec![0usize; n_sym];
        let mut cumulative = 0;
        for (c, &n) in counts.iter().enumerate() {
            first_occurrence[c] = cumulative;
            cumulative += n;
        }

        let partial_sa = sa
            .iter()
            .enumerate()
            .filter(|(_, &p)| p % sa_step == 0)
            .map(|(row, &p)| (row, p))
            .collect();

        Self {
            bwt,
            symbol,
            first_occurrence,
            checkpoints,
            checkpoint_step,
            partial_sa,
            sa_step,
        }
    }

    /// Length of the indexed text, sentinel excluded.
    pub fn text_len(&self) -> usize {
        self.bwt.len() - 1
    }

    /// Occurrences of symbol `c` in `bwt[..row]`.
    fn rank(&self, c: usize, row: usize) -> usize {
        let cp = row / self.checkpoint_step;
        let start = cp * self.checkpoint_step;
        self.checkpoints[cp][c]
            + self.bwt[start..row]
                .iter()
                .filter(|&&s| self.symbol[s as usize] as usize == c)
                .count()
    }

    fn lf(&self, row: usize) -> usize {
        let c = self.symbol[self.bwt[row] as usize] as usize;
        self.first_occurrence[c] + self.rank(c, row)
    }

    /// Half-open row range of suffixes prefixed by `pattern`.
    fn backward_search(&self, pattern: &[u8]) -> (usize, usize) {
        let (mut lo, mut hi) = (0, self.bwt.len());
        for &b in pattern.iter().rev() {
            let c = self.symbol[b as usize + 1];
            if c == ABSENT {
                return (0, 0);
            }
            let c = c as usize;
            lo = self.first_occurrence[c] + self.rank(c, lo);
            hi = self.first_occurrence[c] + self.rank(c, hi);
            if lo >= hi {
                return (0, 0);
            }
        }
        (lo, hi)
    }

    /// Text position of the suffix in `row`.
    fn locate(&self, mut row: usize) -> usize {
        let mut steps = 0;
        loop {
            if let Ok(i) = self.partial_sa.binary_search_by_key(&row, |&(r, _)| r) {
                return (self.partial_sa[i].1 + steps) % self.bwt.len();
            }
            row = self.lf(row);
            steps += 1;
        }
    }

    /// Number of occurrences of `pattern`. Zero for an empty pattern.
    pub fn count(&self, pattern: &[u8]) -> usize {
        if pattern.is_empty() {
            return 0;
        }
        let (lo, hi) = self.backward_search(pattern);
        hi - lo
    }

    /// Sorted start positions of `pattern` in the text.
    pub fn search(&self, pattern: &[u8]) -> Vec<usize> {
        if pattern.is_empty() {
            return vec![];
        }
        let (lo, hi) = self.backward_search(pattern);
        let mut positions: Vec<usize> = (lo..hi).map(|row| self.locate(row)).collect();
        positions.sort_unstable();
        positions
    }

    /// Step between sampled suffix-array entries.
    pub fn sa_step(&self) -> usize {
        self.sa_step
    }
}

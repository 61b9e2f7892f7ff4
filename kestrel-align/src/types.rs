//! Alignment modes and results.

use core::fmt;
use core::str::FromStr;

use kestrel_core::{KestrelError, Scored};

use crate::scoring::GAP;

/// Which ends of each sequence may be left unaligned for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Both sequences end to end.
    Global,
    /// Best-scoring pair of substrings.
    Local,
    /// All of `s1` against a substring of `s2`.
    Fitting,
    /// A suffix of `s1` against a prefix of `s2`.
    Overlap,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Global, Mode::Local, Mode::Fitting, Mode::Overlap];

    /// Lower-case mode name.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Global => "global",
            Mode::Local => "local",
            Mode::Fitting => "fitting",
            Mode::Overlap => "overlap",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = KestrelError;

    /// Case-insensitive; unknown names fail with [`KestrelError::BadMode`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KestrelError::BadMode(s.to_string()))
    }
}

/// The result of a pairwise alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alignment {
    pub score: i32,
    /// First sequence with `-` for gaps.
    pub aligned1: Vec<u8>,
    /// Second sequence with `-` for gaps.
    pub aligned2: Vec<u8>,
}

impl Alignment {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.aligned1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned1.is_empty()
    }

    /// Columns with identical residues.
    pub fn matches(&self) -> usize {
        self.columns().filter(|&(a, b)| a == b && a != GAP).count()
    }

    /// Columns with a gap in either row.
    pub fn gaps(&self) -> usize {
        self.columns().filter(|&(a, b)| a == GAP || b == GAP).count()
    }

    /// Fraction of columns that are exact matches, in `[0.0, 1.0]`.
    ///
    /// Returns 0.0 if the alignment is empty.
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.matches() as f64 / self.len() as f64
    }

    fn columns(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.aligned1.iter().copied().zip(self.aligned2.iter().copied())
    }
}

impl Scored for Alignment {
    fn score(&self) -> f64 {
        self.score as f64
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.score)?;
        writeln!(f, "{}", String::from_utf8_lossy(&self.aligned1))?;
        write!(f, "{}", String::from_utf8_lossy(&self.aligned2))
    }
}

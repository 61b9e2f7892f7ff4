//! Scored DP grid shared by the four alignment modes.
//!
//! Scores and back-links live in two flat row-major arrays with stride
//! `|s2| + 1`. Each cell stores the [`Rule`] that produced its score; a mode
//! chooses the rule for the top row, the left edge and the candidates tried
//! for interior cells, in tie-break order.

use kestrel_core::{KestrelError, Result};

use crate::scoring::{MatchMismatch, Scorer, GAP};
use crate::types::{Alignment, Mode};

/// How a cell's score was derived.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Gap in `s1`: from the left, emits `(-, s2[j-1])`.
    G1,
    /// Gap in `s2`: from above, emits `(s1[i-1], -)`.
    G2,
    /// Match or mismatch: from the diagonal.
    MM,
    /// Free restart at score zero; ends traceback.
    SP,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Corner,
    GridMax,
    BottomRowMax,
}

struct Plan {
    top: Rule,
    left: Rule,
    interior: &'static [Rule],
    pick: Pick,
}

impl Mode {
    fn plan(self) -> Plan {
        use Rule::*;
        match self {
            Mode::Global => Plan {
                top: G1,
                left: G2,
                interior: &[G2, G1, MM],
                pick: Pick::Corner,
            },
            Mode::Local => Plan {
                top: SP,
                left: SP,
                interior: &[SP, G2, G1, MM],
                pick: Pick::GridMax,
            },
            Mode::Fitting => Plan {
                top: SP,
                left: G2,
                interior: &[G2, G1, MM],
                pick: Pick::BottomRowMax,
            },
            Mode::Overlap => Plan {
                top: G1,
                left: SP,
                interior: &[G2, G1, MM],
                pick: Pick::BottomRowMax,
            },
        }
    }
}

pub(crate) fn check_penalty(name: &str, value: i32) -> Result<()> {
    if value < 0 {
        return Err(KestrelError::InvalidInput(format!(
            "{} penalty must not be negative, got {}",
            name, value
        )));
    }
    Ok(())
}

/// A filled DP grid.
#[derive(Debug, Clone)]
pub struct Grid<'a> {
    s1: &'a [u8],
    s2: &'a [u8],
    scores: Vec<i32>,
    rules: Vec<Rule>,
    stride: usize,
    pick: Pick,
}

impl<'a> Grid<'a> {
    /// Fill the grid for `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if `indel` is negative.
    pub fn fill<S: Scorer + ?Sized>(mode: Mode, s1: &'a [u8], s2: &'a [u8], scorer: &S, indel: i32) -> Result<Self> {
        check_penalty("indel", indel)?;
        Ok(Self::fill_unchecked(mode, s1, s2, scorer, indel))
    }

    pub(crate) fn fill_unchecked<S: Scorer + ?Sized>(mode: Mode, s1: &'a [u8], s2: &'a [u8], scorer: &S, indel: i32) -> Self {
        let plan = mode.plan();
        let stride = s2.len() + 1;
        let n = (s1.len() + 1) * stride;
        let mut scores = vec![0i32; n];
        let mut rules = vec![Rule::SP; n];

        let cand = |scores: &[i32], rule: Rule, x: usize| -> i32 {
            match rule {
                Rule::G1 => scores[x - 1] - indel,
                Rule::G2 => scores[x - stride] - indel,
                Rule::MM => {
                    let (i, j) = (x / stride, x % stride);
                    scores[x - stride - 1] + scorer.score(s1[i - 1], s2[j - 1])
                }
                Rule::SP => 0,
            }
        };

        for x in 1..stride {
            scores[x] = cand(&scores, plan.top, x);
            rules[x] = plan.top;
        }
        for i in 1..=s1.len() {
            let x = i * stride;
            scores[x] = cand(&scores, plan.left, x);
            rules[x] = plan.left;
        }
        for i in 1..=s1.len() {
            for x in i * stride + 1..(i + 1) * stride {
                let mut best_rule = plan.interior[0];
                let mut best = cand(&scores, best_rule, x);
                for &r in &plan.interior[1..] {
                    let v = cand(&scores, r, x);
                    if v > best {
                        best = v;
                        best_rule = r;
                    }
                }
                scores[x] = best;
                rules[x] = best_rule;
            }
        }

        Self {
            s1,
            s2,
            scores,
            rules,
            stride,
            pick: plan.pick,
        }
    }

    /// Cell scores, row-major with stride `|s2| + 1`.
    pub fn scores(&self) -> &[i32] {
        &self.scores
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Rule stored at cell `(i, j)`.
    pub fn rule(&self, i: usize, j: usize) -> Rule {
        self.rules[i * self.stride + j]
    }

    /// Cell where traceback starts. The first cell wins ties.
    pub fn end(&self) -> usize {
        let n = self.scores.len();
        let range = match self.pick {
            Pick::Corner => return n - 1,
            Pick::GridMax => 0..n,
            Pick::BottomRowMax => n - self.stride..n,
        };
        let mut best = range.start;
        for x in range {
            if self.scores[x] > self.scores[best] {
                best = x;
            }
        }
        best
    }

    /// Follow back-links from cell `x` to the origin or a restart.
    pub fn traceback(&self, mut x: usize) -> Alignment {
        let score = self.scores[x];
        let mut t1 = Vec::new();
        let mut t2 = Vec::new();
        while x > 0 {
            let (i, j) = (x / self.stride, x % self.stride);
            match self.rules[x] {
                Rule::SP => break,
                Rule::G1 => {
                    t1.push(GAP);
                    t2.push(self.s2[j - 1]);
                    x -= 1;
                }
                Rule::G2 => {
                    t1.push(self.s1[i - 1]);
                    t2.push(GAP);
                    x -= self.stride;
                }
                Rule::MM => {
                    t1.push(self.s1[i - 1]);
                    t2.push(self.s2[j - 1]);
                    x -= self.stride + 1;
                }
            }
        }
        t1.reverse();
        t2.reverse();
        Alignment {
            score,
            aligned1: t1,
            aligned2: t2,
        }
    }
}

/// Align `s1` against `s2` with a linear gap penalty `indel`.
///
/// # Errors
///
/// Returns an error if `indel` is negative.
pub fn align_pair<S: Scorer + ?Sized>(mode: Mode, s1: &[u8], s2: &[u8], scorer: &S, indel: i32) -> Result<Alignment> {
    let grid = Grid::fill(mode, s1, s2, scorer, indel)?;
    Ok(grid.traceback(grid.end()))
}

/// [`align_pair`] with the mode given by name.
///
/// # Errors
///
/// Returns [`KestrelError::BadMode`] for an unknown mode name.
pub fn align_pair_named<S: Scorer + ?Sized>(mode: &str, s1: &[u8], s2: &[u8], scorer: &S, indel: i32) -> Result<Alignment> {
    align_pair(mode.parse()?, s1, s2, scorer, indel)
}

/// Levenshtein distance.
pub fn edit_distance(s1: &[u8], s2: &[u8]) -> usize {
    let grid = Grid::fill_unchecked(Mode::Global, s1, s2, &MatchMismatch::new(0, -1), 1);
    grid.scores.last().map_or(0, |&s| s.unsigned_abs() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SubstitutionMatrix;

    fn text(a: &Alignment) -> (i32, String, String) {
        (
            a.score,
            String::from_utf8(a.aligned1.clone()).unwrap(),
            String::from_utf8(a.aligned2.clone()).unwrap(),
        )
    }

    #[test]
    fn global_blosum62() {
        let a = align_pair_named("global", b"PLEASANTLY", b"MEANLY", &SubstitutionMatrix::blosum62(), 5).unwrap();
        assert_eq!(text(&a), (8, "PLEASANTLY".into(), "-MEA--N-LY".into()));
    }

    #[test]
    fn local_pam250() {
        let a = align_pair_named("local", b"MEANLY", b"PENALTY", &SubstitutionMatrix::pam250(), 5).unwrap();
        assert_eq!(text(&a), (15, "EANL-Y".into(), "ENALTY".into()));
    }

    #[test]
    fn fitting() {
        let a = align_pair(Mode::Fitting, b"TAGATA", b"GTAGGCTTAAGGTTA", &MatchMismatch::default(), 1).unwrap();
        assert_eq!(text(&a), (2, "TAGA-T-A".into(), "TAGGCTTA".into()));
    }

    #[test]
    fn overlap() {
        let a = align_pair(Mode::Overlap, b"PAWHEAE", b"HEAGAWGHEE", &MatchMismatch::default(), 2).unwrap();
        assert_eq!(text(&a), (2, "HEAE".into(), "HEAG".into()));
    }

    #[test]
    fn local_dna() {
        let a = align_pair(Mode::Local, b"AAACGTAAA", b"TTTCGTTTT", &MatchMismatch::default(), 1).unwrap();
        assert_eq!(text(&a), (3, "CGT".into(), "CGT".into()));
    }

    #[test]
    fn global_score_is_last_cell() {
        let b62 = SubstitutionMatrix::blosum62();
        let grid = Grid::fill(Mode::Global, b"PLEASANTLY", b"MEANLY", &b62, 5).unwrap();
        assert_eq!(grid.scores().last(), Some(&8));
        assert_eq!(grid.stride(), 7);
        assert_eq!(grid.rule(0, 3), Rule::G1);
        assert_eq!(grid.rule(3, 0), Rule::G2);
    }

    #[test]
    fn empty_inputs() {
        let m = MatchMismatch::default();
        let a = align_pair(Mode::Global, b"", b"ACG", &m, 2).unwrap();
        assert_eq!(text(&a), (-6, "---".into(), "ACG".into()));
        let a = align_pair(Mode::Global, b"AC", b"", &m, 2).unwrap();
        assert_eq!(text(&a), (-4, "AC".into(), "--".into()));
        let a = align_pair(Mode::Local, b"", b"", &m, 2).unwrap();
        assert!(a.is_empty());
        assert_eq!(a.score, 0);
    }

    #[test]
    fn local_without_positive_cell_is_empty() {
        let a = align_pair(Mode::Local, b"AAA", b"CCC", &MatchMismatch::default(), 1).unwrap();
        assert_eq!(a.score, 0);
        assert!(a.is_empty());
    }

    #[test]
    fn errors() {
        let m = MatchMismatch::default();
        assert!(matches!(
            align_pair_named("semi", b"A", b"A", &m, 1),
            Err(KestrelError::BadMode(_))
        ));
        assert!(matches!(
            align_pair(Mode::Global, b"A", b"A", &m, -1),
            Err(KestrelError::InvalidInput(_))
        ));
    }

    #[test]
    fn levenshtein() {
        assert_eq!(edit_distance(b"PLEASANTLY", b"MEANLY"), 5);
        assert_eq!(edit_distance(b"", b"ABC"), 3);
        assert_eq!(edit_distance(b"kitten", b"sitting"), 3);
    }
}

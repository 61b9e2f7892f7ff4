//! Cyclic peptide sequencing from integer spectra.
//!
//! [`leaderboard_sequence`] is a beam search: every round extends each kept
//! candidate by every alphabet mass, retires candidates that reach the
//! parent mass and trims the rest to the best `n` by linear-spectrum score
//! (ties for last place kept). [`cyclopeptide_sequencing`] is the exact
//! branch-and-bound variant for error-free spectra.

use kestrel_core::{cut, KestrelError, Result, Scored};

use crate::convolution::convolution;
use crate::multiset::MassCounts;
use crate::spectrum::{cyclic_spectrum, linear_spectrum};
use crate::table::{AaInt, AA18_INTEGER};

/// Beam width and result count for [`leaderboard_sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaderboardConfig {
    /// Candidates kept per round, before ties.
    pub n: usize,
    /// Finished peptides returned, before ties.
    pub nr: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { n: 1000, nr: 1 }
    }
}

/// A partial or finished peptide in the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub masses: AaInt,
    pub total: u32,
    /// Shared spectrum peaks. Linear spectrum while in play, cyclic once
    /// the candidate reaches the parent mass.
    pub score: usize,
}

impl Candidate {
    fn empty() -> Self {
        Self {
            masses: Vec::new(),
            total: 0,
            score: 0,
        }
    }

    /// `None` when the total mass would overflow.
    fn extend(&self, m: u32) -> Option<Self> {
        let total = self.total.checked_add(m)?;
        let mut masses = Vec::with_capacity(self.masses.len() + 1);
        masses.extend_from_slice(&self.masses);
        masses.push(m);
        Some(Self {
            masses,
            total,
            score: 0,
        })
    }
}

impl Scored for Candidate {
    fn score(&self) -> f64 {
        self.score as f64
    }
}

fn sorted_spectrum(spectrum: &[u32]) -> Result<Vec<u32>> {
    if spectrum.is_empty() {
        return Err(KestrelError::InvalidInput("empty spectrum".into()));
    }
    let mut spec = spectrum.to_vec();
    spec.sort_unstable();
    Ok(spec)
}

/// Beam-search sequencing of a cyclic peptide against `spectrum`.
///
/// The parent mass is the heaviest entry of `spectrum`. Returns the best
/// `config.nr` peptides of exactly that mass by cyclic-spectrum score, plus
/// ties, best first. Rotations and reflections of one peptide are reported
/// separately.
///
/// # Errors
///
/// Returns an error if `spectrum` or `alphabet` is empty or the alphabet
/// holds a zero mass.
pub fn leaderboard_sequence(
    spectrum: &[u32],
    alphabet: &[u32],
    config: &LeaderboardConfig,
) -> Result<Vec<Candidate>> {
    let spec = sorted_spectrum(spectrum)?;
    if alphabet.is_empty() {
        return Err(KestrelError::InvalidInput("empty mass alphabet".into()));
    }
    if alphabet.contains(&0) {
        return Err(KestrelError::InvalidInput("mass alphabet contains 0".into()));
    }
    let pm = spec[spec.len() - 1];
    let counts: MassCounts = spec.iter().collect();

    let mut board = vec![Candidate::empty()];
    let mut done = Vec::new();
    let mut round = 0usize;
    while !board.is_empty() {
        round += 1;
        let mut next = Vec::with_capacity(board.len() * alphabet.len());
        for c in &board {
            for &m in alphabet {
                let Some(e) = c.extend(m) else { continue };
                if e.total == pm {
                    let theo: MassCounts = cyclic_spectrum(&e.masses).into_iter().collect();
                    done.push(Candidate {
                        score: theo.intersection_cardinality(&counts),
                        ..e
                    });
                } else if e.total < pm {
                    next.push(e);
                }
            }
        }
        if next.len() > config.n {
            for c in &mut next {
                let theo: MassCounts = linear_spectrum(&c.masses).into_iter().collect();
                c.score = theo.intersection_cardinality(&counts);
            }
            let r = cut(&mut next, config.n);
            next.truncate(r);
        }
        log::debug!(
            "leaderboard round {}: {} kept, {} finished",
            round,
            next.len(),
            done.len()
        );
        board = next;
    }

    let r = cut(&mut done, config.nr);
    done.truncate(r);
    Ok(done)
}

/// Every peptide over the residue masses present in `spectrum` whose cyclic
/// spectrum equals `spectrum`, in lexicographic mass order.
///
/// Candidates whose linear spectrum is not contained in `spectrum` are
/// pruned.
///
/// # Errors
///
/// Returns an error if `spectrum` is empty.
pub fn cyclopeptide_sequencing(spectrum: &[u32]) -> Result<Vec<AaInt>> {
    let spec = sorted_spectrum(spectrum)?;
    let pm = spec[spec.len() - 1];
    let counts: MassCounts = spec.iter().collect();
    let alphabet: Vec<u32> = AA18_INTEGER.into_iter().filter(|&m| counts.get(m) > 0).collect();

    let mut out = Vec::new();
    let mut board = vec![Candidate::empty()];
    while !board.is_empty() {
        let mut next = Vec::new();
        for c in &board {
            for &m in &alphabet {
                let Some(e) = c.extend(m) else { continue };
                if e.total == pm {
                    if cyclic_spectrum(&e.masses) == spec {
                        out.push(e.masses);
                    }
                } else {
                    let theo: MassCounts = linear_spectrum(&e.masses).into_iter().collect();
                    if theo.is_subset(&counts) {
                        next.push(e);
                    }
                }
            }
        }
        log::debug!("cyclopeptide round: {} consistent", next.len());
        board = next;
    }
    Ok(out)
}

/// [`leaderboard_sequence`] over the `m` most frequent masses of the
/// spectrum's own convolution (see [`MassCounts::cut_aa`]).
///
/// # Errors
///
/// Returns an error if `spectrum` is empty or its convolution yields no
/// mass in the residue range.
pub fn convolution_cyclopeptide_sequencing(
    spectrum: &[u32],
    m: usize,
    config: &LeaderboardConfig,
) -> Result<Vec<Candidate>> {
    let alphabet = convolution(spectrum).cut_aa(m);
    log::debug!("convolution alphabet ({}): {:?}", alphabet.len(), alphabet);
    if alphabet.is_empty() {
        return Err(KestrelError::InvalidInput(
            "spectral convolution has no residue-sized masses".into(),
        ));
    }
    leaderboard_sequence(spectrum, &alphabet, config)
}

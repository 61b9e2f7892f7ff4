//! Motif discovery over DNA8 strings.
//!
//! All searches score a motif set by [`Kmers::consensus_hamming`] and keep the
//! first set found on ties. The randomised searches take any [`Rng`]; the
//! `*_seeded` entry points build a [`StdRng`] from [`MotifSearchConfig::seed`]
//! so equal seeds give identical results.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kestrel_core::{KestrelError, Result};

use crate::profile::Kmers;
use crate::types::Dna8;

/// Knobs for the randomised motif searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotifSearchConfig {
    /// Independent restarts of the search.
    pub restarts: usize,
    /// Sampling steps per Gibbs restart.
    pub iterations: usize,
    /// Seed for the pseudorandom stream.
    pub seed: u64,
}

impl Default for MotifSearchConfig {
    fn default() -> Self {
        Self {
            restarts: 20,
            iterations: 200,
            seed: 0,
        }
    }
}

/// A motif set and its consensus Hamming score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotifResult {
    pub motifs: Kmers,
    pub score: usize,
}

fn check_input(l: &[Dna8], k: usize) -> Result<()> {
    if l.is_empty() {
        return Err(KestrelError::InvalidInput("no strings to search".into()));
    }
    if k == 0 {
        return Err(KestrelError::InvalidInput("motif length must be at least 1".into()));
    }
    if let Some((i, s)) = l.iter().enumerate().find(|(_, s)| s.len() < k) {
        return Err(KestrelError::InvalidInput(format!(
            "string {} has length {} < motif length {}",
            i,
            s.len(),
            k
        )));
    }
    Ok(())
}

fn scored(motifs: Vec<Dna8>) -> Result<MotifResult> {
    let motifs = Kmers::new(motifs);
    let score = motifs.consensus_hamming()?;
    Ok(MotifResult { motifs, score })
}

fn random_motifs<R: Rng + ?Sized>(l: &[Dna8], k: usize, rng: &mut R) -> Vec<Dna8> {
    l.iter()
        .map(|s| {
            let i = rng.gen_range(0..=s.len() - k);
            s.subseq(i..i + k).unwrap_or_default()
        })
        .collect()
}

/// Every length-`k` word minimising the summed [`Dna8::motif_hamming`]
/// over `l`, with that minimum.
pub fn median_string(l: &[Dna8], k: usize) -> Result<(Vec<Dna8>, usize)> {
    check_input(l, k)?;
    let mut p = Dna8::from_validated(vec![b'A'; k]);
    let mut best = usize::MAX;
    let mut medians = Vec::new();
    loop {
        let d: usize = l.iter().map(|s| s.motif_hamming(&p)).sum();
        if d < best {
            best = d;
            medians.clear();
        }
        if d == best {
            medians.push(p.clone());
        }
        if p.inc() {
            break;
        }
    }
    Ok((medians, best))
}

/// Greedy profile-driven search with Laplace pseudocounts.
///
/// Each window of the first string seeds a motif set; row `i` is then the
/// most probable k-mer of `l[i]` under the profile of rows `0..i`.
pub fn greedy_motif_search(l: &[Dna8], k: usize) -> Result<MotifResult> {
    check_input(l, k)?;
    let mut best = scored(l.iter().map(|s| s.subseq(0..k).unwrap_or_default()).collect())?;
    for i in 0..=l[0].len() - k {
        let mut motifs = Kmers::new(l[0].subseq(i..i + k).into_iter().collect());
        for s in &l[1..] {
            let profile = motifs.laplace_profile()?;
            motifs.push(profile.most_prob_kmer(s));
        }
        let score = motifs.consensus_hamming()?;
        if score < best.score {
            best = MotifResult { motifs, score };
        }
    }
    Ok(best)
}

fn randomized_run<R: Rng + ?Sized>(l: &[Dna8], k: usize, rng: &mut R) -> Result<MotifResult> {
    let mut best = scored(random_motifs(l, k, rng))?;
    loop {
        let motifs = best.motifs.laplace_profile()?.most_prob_kmers(l);
        let score = motifs.consensus_hamming()?;
        if score >= best.score {
            return Ok(best);
        }
        best = MotifResult { motifs, score };
    }
}

/// Random-restart profile iteration.
///
/// Each restart samples one k-mer per string, then replaces the set by the
/// most probable k-mers under its Laplace profile while the score strictly
/// decreases.
pub fn randomized_motif_search<R: Rng + ?Sized>(
    l: &[Dna8],
    k: usize,
    restarts: usize,
    rng: &mut R,
) -> Result<MotifResult> {
    check_input(l, k)?;
    let mut best = randomized_run(l, k, rng)?;
    for restart in 1..restarts {
        let run = randomized_run(l, k, rng)?;
        if run.score < best.score {
            log::debug!("randomized motif search: restart {} improved score to {}", restart, run.score);
            best = run;
        }
    }
    Ok(best)
}

fn gibbs_run<R: Rng + ?Sized>(
    l: &[Dna8],
    k: usize,
    iterations: usize,
    rng: &mut R,
) -> Result<MotifResult> {
    let mut motifs = random_motifs(l, k, rng);
    let mut best = scored(motifs.clone())?;
    for _ in 0..iterations {
        let i = rng.gen_range(0..l.len());
        let others: Vec<Dna8> = motifs
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, m)| m.clone())
            .collect();
        let profile = if others.is_empty() {
            Kmers::new(vec![motifs[i].clone()]).laplace_profile()?
        } else {
            Kmers::new(others).laplace_profile()?
        };
        motifs[i] = profile.random_kmer(&l[i], rng);
        let candidate = scored(motifs.clone())?;
        if candidate.score < best.score {
            best = candidate;
        }
    }
    Ok(best)
}

/// Gibbs sampling with `restarts` independent samplers of `iterations`
/// steps each.
pub fn gibbs_sampler<R: Rng + ?Sized>(
    l: &[Dna8],
    k: usize,
    iterations: usize,
    restarts: usize,
    rng: &mut R,
) -> Result<MotifResult> {
    check_input(l, k)?;
    let mut best = gibbs_run(l, k, iterations, rng)?;
    for restart in 1..restarts {
        let run = gibbs_run(l, k, iterations, rng)?;
        if run.score < best.score {
            log::debug!("gibbs sampler: restart {} improved score to {}", restart, run.score);
            best = run;
        }
    }
    Ok(best)
}

/// [`randomized_motif_search`] driven by a seeded [`StdRng`].
pub fn randomized_motif_search_seeded(
    l: &[Dna8],
    k: usize,
    config: &MotifSearchConfig,
) -> Result<MotifResult> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    randomized_motif_search(l, k, config.restarts, &mut rng)
}

/// [`gibbs_sampler`] driven by a seeded [`StdRng`].
pub fn gibbs_sampler_seeded(l: &[Dna8], k: usize, config: &MotifSearchConfig) -> Result<MotifResult> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    gibbs_sampler(l, k, config.iterations, config.restarts, &mut rng)
}

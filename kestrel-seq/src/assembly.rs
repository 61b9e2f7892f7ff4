//! De Bruijn graphs and overlap-based reconstruction.
//!
//! Graphs use the adjacency forms from [`kestrel_core::graph`]. In a
//! [`DeBruijn`] graph nodes are `(k-1)`-mers and every arc is labeled with the
//! index of its k-mer in [`DeBruijn::kmers`].

use std::collections::BTreeMap;

use kestrel_core::graph::{self, AdjacencyList, Half, LabeledAdjacencyList};
use kestrel_core::{KestrelError, Result};

use crate::types::Dna8;

/// Immutable byte-string key.
pub type Str = Box<[u8]>;

/// Equal-length strings.
pub type StrKmers = Vec<Str>;

/// String multiplicities.
pub type StrFreq = BTreeMap<Str, usize>;

/// Windows of length `k` in text order.
pub fn kmer_composition(text: &[u8], k: usize) -> StrKmers {
    if k == 0 {
        return Vec::new();
    }
    text.windows(k).map(Str::from).collect()
}

/// Multiplicity of each distinct string.
pub fn str_freq<S: AsRef<[u8]>>(kmers: &[S]) -> StrFreq {
    let mut freq = StrFreq::new();
    for k in kmers {
        *freq.entry(Str::from(k.as_ref())).or_insert(0) += 1;
    }
    freq
}

fn uniform_k<S: AsRef<[u8]>>(kmers: &[S]) -> Result<usize> {
    let k = match kmers.first() {
        None => return Err(KestrelError::InvalidInput("no k-mers".into())),
        Some(first) => first.as_ref().len(),
    };
    if let Some(bad) = kmers.iter().find(|s| s.as_ref().len() != k) {
        return Err(KestrelError::NotUniform(format!(
            "expected length {}, found {}",
            k,
            bad.as_ref().len()
        )));
    }
    if k < 2 {
        return Err(KestrelError::InvalidInput(
            "k-mers must have length at least 2".into(),
        ));
    }
    Ok(k)
}

/// Concatenate a path of strings that overlap by all but one byte: the
/// first string, then the last byte of each following string.
pub fn overlap_kmers<S: AsRef<[u8]>>(path: &[S]) -> Vec<u8> {
    let mut text = match path.first() {
        None => return Vec::new(),
        Some(first) => first.as_ref().to_vec(),
    };
    for s in &path[1..] {
        if let Some(&b) = s.as_ref().last() {
            text.push(b);
        }
    }
    text
}

/// Reconstruct a text from consecutive read pairs of k-mers separated by a
/// gap of `d`.
///
/// # Errors
///
/// Returns [`KestrelError::LengthMismatch`] when the two reads of a pair
/// differ in length, and [`KestrelError::NoSolution`] when the prefix and
/// suffix strings are shorter than `k + d` or disagree on their overlap.
pub fn overlap_read_pairs<S: AsRef<[u8]>>(pairs: &[(S, S)], k: usize, d: usize) -> Result<Vec<u8>> {
    if pairs.is_empty() {
        return Ok(Vec::new());
    }
    let mut first: Vec<&[u8]> = Vec::with_capacity(pairs.len());
    let mut second: Vec<&[u8]> = Vec::with_capacity(pairs.len());
    for (a, b) in pairs {
        let (a, b) = (a.as_ref(), b.as_ref());
        if a.len() != b.len() {
            return Err(KestrelError::length_mismatch(a.len(), b.len()));
        }
        first.push(a);
        second.push(b);
    }
    let prefix = overlap_kmers(&first);
    let suffix = overlap_kmers(&second);
    let shift = k + d;
    if prefix.len() != suffix.len() {
        return Err(KestrelError::length_mismatch(prefix.len(), suffix.len()));
    }
    if shift > prefix.len() {
        return Err(KestrelError::NoSolution(format!(
            "read-pair strings of length {} are shorter than k + d = {}",
            prefix.len(),
            shift
        )));
    }
    if prefix[shift..] != suffix[..suffix.len() - shift] {
        return Err(KestrelError::NoSolution(
            "read-pair prefix and suffix strings disagree".into(),
        ));
    }
    let mut text = prefix;
    text.extend_from_slice(&suffix[suffix.len() - shift..]);
    Ok(text)
}

/// Arcs `i -> j` wherever the suffix of k-mer `i` equals the prefix of
/// k-mer `j`, `i != j`.
pub fn overlap_graph<S: AsRef<[u8]>>(kmers: &[S]) -> AdjacencyList {
    let mut by_prefix: BTreeMap<&[u8], Vec<usize>> = BTreeMap::new();
    for (j, s) in kmers.iter().enumerate() {
        let s = s.as_ref();
        if !s.is_empty() {
            by_prefix.entry(&s[..s.len() - 1]).or_default().push(j);
        }
    }
    kmers
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let s = s.as_ref();
            if s.is_empty() {
                return Vec::new();
            }
            by_prefix
                .get(&s[1..])
                .map(|js| js.iter().copied().filter(|&j| j != i).collect())
                .unwrap_or_default()
        })
        .collect()
}

/// Node-centric de Bruijn graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeBruijn {
    /// Node labels, `(k-1)`-mers in first-seen order.
    pub nodes: Vec<Str>,
    /// Arcs labeled with indices into `kmers`.
    pub graph: LabeledAdjacencyList,
    /// Distinct k-mers; an arc label indexes this table.
    pub kmers: Vec<Str>,
    index: BTreeMap<Str, usize>,
    labels: BTreeMap<Str, usize>,
}

impl DeBruijn {
    fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            graph: Vec::new(),
            kmers: Vec::new(),
            index: BTreeMap::new(),
            labels: BTreeMap::new(),
        }
    }

    fn node(&mut self, label: &[u8]) -> usize {
        if let Some(&n) = self.index.get(label) {
            return n;
        }
        let n = self.nodes.len();
        self.nodes.push(Str::from(label));
        self.graph.push(Vec::new());
        self.index.insert(Str::from(label), n);
        n
    }

    fn add(&mut self, kmer: &[u8], multiplicity: usize) {
        let k = kmer.len();
        let from = self.node(&kmer[..k - 1]);
        let to = self.node(&kmer[1..]);
        let label = match self.labels.get(kmer) {
            Some(&l) => l,
            None => {
                let l = self.kmers.len();
                self.kmers.push(Str::from(kmer));
                self.labels.insert(Str::from(kmer), l);
                l
            }
        };
        for _ in 0..multiplicity {
            self.graph[from].push(Half { to, label });
        }
    }

    /// One arc per k-mer, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty list, ragged lengths, or `k < 2`.
    pub fn from_kmers<S: AsRef<[u8]>>(kmers: &[S]) -> Result<Self> {
        uniform_k(kmers)?;
        let mut g = Self::empty();
        for s in kmers {
            g.add(s.as_ref(), 1);
        }
        Ok(g)
    }

    /// One arc per unit of multiplicity.
    pub fn from_freq(freq: &StrFreq) -> Result<Self> {
        let keys: Vec<&Str> = freq.keys().collect();
        uniform_k(&keys)?;
        let mut g = Self::empty();
        for (s, &n) in freq {
            g.add(s, n);
        }
        Ok(g)
    }

    /// The path graph of the k-mer windows of `text`.
    pub fn from_text(text: &[u8], k: usize) -> Result<Self> {
        if k < 2 || k > text.len() {
            return Err(KestrelError::InvalidInput(format!(
                "k={} must be in 2..={}",
                k,
                text.len()
            )));
        }
        Self::from_kmers(&kmer_composition(text, k))
    }

    /// Node number of a `(k-1)`-mer.
    pub fn node_index(&self, label: &[u8]) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Total number of arcs.
    pub fn arc_count(&self) -> usize {
        self.graph.iter().map(Vec::len).sum()
    }

    /// Node numbers along an Eulerian path.
    pub fn eulerian_path(&self) -> Result<Vec<usize>> {
        graph::eulerian_path(&graph::unlabeled(&self.graph))
    }

    /// Spell the text of an Eulerian path.
    pub fn reconstruct(&self) -> Result<Vec<u8>> {
        let path = self.eulerian_path()?;
        let labels: Vec<&Str> = path.iter().map(|&n| &self.nodes[n]).collect();
        Ok(overlap_kmers(&labels))
    }

    /// Strings spelled by the maximal non-branching paths.
    pub fn contigs(&self) -> Vec<Vec<u8>> {
        graph::maximal_non_branching_paths(&graph::unlabeled(&self.graph))
            .iter()
            .map(|p| {
                let labels: Vec<&Str> = p.iter().map(|&n| &self.nodes[n]).collect();
                overlap_kmers(&labels)
            })
            .collect()
    }
}

impl Dna8 {
    /// De Bruijn graph of the k-mer windows of the sequence.
    pub fn de_bruijn(&self, k: usize) -> Result<DeBruijn> {
        DeBruijn::from_text(self, k)
    }
}

/// Paired de Bruijn graph over gapped read pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedDeBruijn {
    /// Node labels: prefix pairs or suffix pairs of the reads.
    pub nodes: Vec<(Str, Str)>,
    pub graph: AdjacencyList,
    /// Read length.
    pub k: usize,
    index: BTreeMap<(Str, Str), usize>,
}

impl PairedDeBruijn {
    fn node(&mut self, a: &[u8], b: &[u8]) -> usize {
        let key = (Str::from(a), Str::from(b));
        if let Some(&n) = self.index.get(&key) {
            return n;
        }
        let n = self.nodes.len();
        self.nodes.push(key.clone());
        self.graph.push(Vec::new());
        self.index.insert(key, n);
        n
    }

    /// One arc per read pair from its prefix pair to its suffix pair.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty list, ragged reads, or `k < 2`.
    pub fn from_read_pairs<S: AsRef<[u8]>>(pairs: &[(S, S)]) -> Result<Self> {
        let reads: Vec<&[u8]> = pairs
            .iter()
            .flat_map(|(a, b)| [a.as_ref(), b.as_ref()])
            .collect();
        let k = uniform_k(&reads)?;
        let mut g = Self {
            nodes: Vec::new(),
            graph: Vec::new(),
            k,
            index: BTreeMap::new(),
        };
        for (a, b) in pairs {
            let (a, b) = (a.as_ref(), b.as_ref());
            let from = g.node(&a[..k - 1], &b[..k - 1]);
            let to = g.node(&a[1..], &b[1..]);
            g.graph[from].push(to);
        }
        Ok(g)
    }

    /// Spell the text of an Eulerian path; reads are separated by `d`.
    ///
    /// Node pairs are `(k-1)`-mers, so they overlap with a gap of `d + 1`.
    pub fn reconstruct(&self, d: usize) -> Result<Vec<u8>> {
        let path = graph::eulerian_path(&self.graph)?;
        let pairs: Vec<(&Str, &Str)> = path
            .iter()
            .map(|&n| (&self.nodes[n].0, &self.nodes[n].1))
            .collect();
        overlap_read_pairs(&pairs, self.k - 1, d + 1)
    }
}

/// Longest suffix of `a` that is a prefix of `b` and longer than half of
/// both reads.
fn long_overlap(a: &[u8], b: &[u8]) -> Option<usize> {
    let max = a.len().min(b.len());
    (1..=max)
        .rev()
        .take_while(|&o| 2 * o > a.len() && 2 * o > b.len())
        .find(|&o| a[a.len() - o..] == b[..o])
}

/// Glue reads into one superstring by chaining overlaps longer than half a
/// read.
///
/// # Errors
///
/// Returns [`KestrelError::NoSolution`] unless the overlaps form a single
/// chain through every read.
pub fn assemble_overlapping<S: AsRef<[u8]>>(reads: &[S]) -> Result<Vec<u8>> {
    let n = reads.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut next: Vec<Option<(usize, usize)>> = vec![None; n];
    let mut has_prev = vec![false; n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if let Some(o) = long_overlap(reads[i].as_ref(), reads[j].as_ref()) {
                if next[i].map_or(true, |(_, best)| o > best) {
                    next[i] = Some((j, o));
                }
            }
        }
        if let Some((j, _)) = next[i] {
            has_prev[j] = true;
        }
    }
    let mut starts = (0..n).filter(|&i| !has_prev[i]);
    let start = match (starts.next(), starts.next()) {
        (Some(s), None) => s,
        _ => {
            return Err(KestrelError::NoSolution(
                "reads do not form a single overlap chain".into(),
            ))
        }
    };

    let mut text = reads[start].as_ref().to_vec();
    let mut visited = 1;
    let mut cur = start;
    while let Some((j, o)) = next[cur] {
        text.extend_from_slice(&reads[j].as_ref()[o..]);
        visited += 1;
        cur = j;
        if visited > n {
            break;
        }
    }
    if visited != n {
        return Err(KestrelError::NoSolution(format!(
            "overlap chain covers {} of {} reads",
            visited.min(n),
            n
        )));
    }
    Ok(text)
}

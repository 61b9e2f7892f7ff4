//! Maximum parsimony over DNA leaves.
//!
//! Small parsimony labels the internal nodes of a fixed tree so that the
//! total number of substitutions along its edges is minimal. Large
//! parsimony searches over unrooted topologies by nearest-neighbour
//! interchange, refitting small parsimony after every swap.

use kestrel_core::graph::AdjacencyList;
use kestrel_core::{KestrelError, Result};
use kestrel_seq::alphabet::{base_code, base_from_code};
use kestrel_seq::types::hamming8;
use kestrel_seq::Dna8;

use crate::tree::{NodeId, PhyloTree};
use crate::unrooted::UnrootedTree;

const INF: usize = usize::MAX / 4;

/// A fitted labelling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parsimony {
    /// Total substitutions over all edges.
    pub score: usize,
    /// One sequence per node; leaves keep their input.
    pub labels: Vec<Dna8>,
    /// Substitutions per edge. Indexed by child node for rooted trees
    /// (zero at the root) and by edge label for unrooted ones.
    pub edge_weights: Vec<usize>,
}

fn argmin(cost: &[usize; 4]) -> usize {
    let mut best = 0;
    for k in 1..4 {
        if cost[k] < cost[best] {
            best = k;
        }
    }
    best
}

// Sankoff-style fit with unit substitution cost. Nodes with a sequence are
// leaves; every other reachable node needs children. Returns the score
// and the chosen bases per node.
fn fit(
    children: &AdjacencyList,
    root: usize,
    leaf_seqs: &[Option<&[u8]>],
    len: usize,
) -> Result<(usize, Vec<Vec<u8>>)> {
    let n = children.len();
    let mut order = Vec::with_capacity(n);
    let mut parent = vec![None; n];
    let mut seen = vec![false; n];
    let mut stack = vec![root];
    seen[root] = true;
    while let Some(u) = stack.pop() {
        order.push(u);
        match (leaf_seqs[u].is_some(), children[u].is_empty()) {
            (true, false) => {
                return Err(KestrelError::InvalidInput(format!(
                    "node {} has a sequence but is not a leaf",
                    u
                )))
            }
            (false, true) => {
                return Err(KestrelError::InvalidInput(format!(
                    "leaf {} has no sequence",
                    u
                )))
            }
            _ => {}
        }
        for &c in &children[u] {
            if seen[c] {
                return Err(KestrelError::InvalidInput(format!(
                    "node {} reached twice; input is not a tree",
                    c
                )));
            }
            seen[c] = true;
            parent[c] = Some(u);
            stack.push(c);
        }
    }
    if order.len() != n {
        return Err(KestrelError::InvalidInput(format!(
            "tree is not connected: {} of {} nodes reachable",
            order.len(),
            n
        )));
    }

    let mut labels = vec![vec![0u8; len]; n];
    let mut cost = vec![[0usize; 4]; n];
    let mut choice = vec![0usize; n];
    let mut score = 0;
    for p in 0..len {
        for &u in order.iter().rev() {
            cost[u] = match leaf_seqs[u] {
                Some(s) => {
                    let mut c = [INF; 4];
                    c[base_code(s[p])] = 0;
                    c
                }
                None => {
                    let mut c = [0; 4];
                    for &ch in &children[u] {
                        let m = cost[ch].iter().copied().min().unwrap_or(INF);
                        for k in 0..4 {
                            c[k] += cost[ch][k].min(m + 1);
                        }
                    }
                    c
                }
            };
        }
        score += cost[root][argmin(&cost[root])];

        for &u in &order {
            choice[u] = match parent[u] {
                None => argmin(&cost[u]),
                Some(v) => {
                    let pc = choice[v];
                    let mut c = cost[u];
                    for (k, x) in c.iter_mut().enumerate() {
                        *x += usize::from(k != pc);
                    }
                    argmin(&c)
                }
            };
            labels[u][p] = base_from_code(choice[u], b'A');
        }
    }
    Ok((score, labels))
}

fn common_length<'a>(seqs: impl IntoIterator<Item = &'a Dna8>) -> Result<usize> {
    let mut len = None;
    for s in seqs {
        match len {
            None => len = Some(s.len()),
            Some(l) if l != s.len() => return Err(KestrelError::length_mismatch(l, s.len())),
            _ => {}
        }
    }
    Ok(len.unwrap_or(0))
}

fn to_dna(labels: Vec<Vec<u8>>) -> Result<Vec<Dna8>> {
    labels.into_iter().map(|l| Dna8::new(l)).collect()
}

/// Small parsimony on a rooted tree.
///
/// `leaves` pairs every leaf of `tree` with its sequence. Ties between
/// equally cheap bases go to the first in `A, C, T, G` order.
///
/// # Errors
///
/// Returns an error if a leaf has no sequence, a sequence is attached to
/// an internal node or the sequences differ in length.
pub fn small_parsimony(tree: &PhyloTree, leaves: &[(NodeId, Dna8)]) -> Result<Parsimony> {
    let n = tree.node_count();
    let len = common_length(leaves.iter().map(|(_, s)| s))?;
    let mut leaf_seqs: Vec<Option<&[u8]>> = vec![None; n];
    for (id, seq) in leaves {
        let slot = leaf_seqs.get_mut(*id).ok_or_else(|| {
            KestrelError::InvalidInput(format!("node {} out of range ({})", id, n))
        })?;
        *slot = Some(&seq[..]);
    }
    let children: AdjacencyList = tree.nodes().iter().map(|n| n.children.clone()).collect();

    let (score, mut labels) = fit(&children, tree.root(), &leaf_seqs, len)?;
    for (id, seq) in leaves {
        labels[*id] = seq.to_vec();
    }
    let edge_weights = tree
        .nodes()
        .iter()
        .map(|node| node.parent.map_or(0, |p| hamming8(&labels[node.id], &labels[p])))
        .collect();
    Ok(Parsimony {
        score,
        labels: to_dna(labels)?,
        edge_weights,
    })
}

/// Small parsimony on an unrooted tree whose leaves `0..seqs.len()` carry
/// `seqs`.
///
/// The tree is rooted at a virtual node on edge 0 for the fit; the
/// reported score counts the real edges only.
///
/// # Errors
///
/// Returns an error if `seqs` does not cover exactly the tree's leaves,
/// the sequences differ in length or the tree is disconnected.
pub fn small_parsimony_unrooted(tree: &UnrootedTree, seqs: &[Dna8]) -> Result<Parsimony> {
    if seqs.len() != tree.leaf_count() {
        return Err(KestrelError::InvalidInput(format!(
            "{} sequences for {} leaves",
            seqs.len(),
            tree.leaf_count()
        )));
    }
    let len = common_length(seqs)?;
    let n = tree.node_count();

    let Some((a, b)) = tree.edge_ends(0) else {
        if n == 1 {
            return Ok(Parsimony {
                score: 0,
                labels: seqs.to_vec(),
                edge_weights: Vec::new(),
            });
        }
        return Err(KestrelError::InvalidInput(format!(
            "tree is not connected: {} nodes and no edges",
            n
        )));
    };

    // orient every edge away from the virtual root `n`
    let mut children: AdjacencyList = vec![Vec::new(); n + 1];
    children[n] = vec![a, b];
    let mut seen = vec![false; n];
    seen[a] = true;
    seen[b] = true;
    let mut stack = vec![a, b];
    while let Some(u) = stack.pop() {
        for h in tree.neighbors(u) {
            if !seen[h.to] {
                seen[h.to] = true;
                children[u].push(h.to);
                stack.push(h.to);
            }
        }
    }

    let mut leaf_seqs: Vec<Option<&[u8]>> = vec![None; n + 1];
    for (slot, seq) in leaf_seqs.iter_mut().zip(seqs) {
        *slot = Some(&seq[..]);
    }
    let (_, mut labels) = fit(&children, n, &leaf_seqs, len)?;
    labels.truncate(n);
    for (label, seq) in labels.iter_mut().zip(seqs) {
        *label = seq.to_vec();
    }

    let mut edge_weights = vec![0; tree.edge_count()];
    for (u, halves) in tree.graph().iter().enumerate() {
        for h in halves.iter().filter(|h| u < h.to) {
            edge_weights[h.label] = hamming8(&labels[u], &labels[h.to]);
        }
    }
    Ok(Parsimony {
        score: edge_weights.iter().sum(),
        labels: to_dna(labels)?,
        edge_weights,
    })
}

/// Outcome of a nearest-neighbour interchange search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NniSearch {
    /// Best topology found, with substitution counts as edge weights.
    pub tree: UnrootedTree,
    pub parsimony: Parsimony,
    /// Score of the starting tree followed by each improvement.
    pub scores: Vec<usize>,
}

/// Greedy large parsimony from a starting unrooted tree.
///
/// Each round tries both interchanges across every internal edge and
/// moves to the best strictly cheaper neighbour (the first found on ties).
/// The search stops when no neighbour improves.
///
/// # Errors
///
/// Same as [`small_parsimony_unrooted`].
pub fn large_parsimony(start: &UnrootedTree, seqs: &[Dna8]) -> Result<NniSearch> {
    let mut tree = start.clone();
    let mut best = small_parsimony_unrooted(&tree, seqs)?;
    let mut scores = vec![best.score];

    loop {
        let mut step: Option<(UnrootedTree, Parsimony)> = None;
        for label in tree.internal_edges() {
            for which in 0..2 {
                let cand = tree.nni(label, which)?;
                let p = small_parsimony_unrooted(&cand, seqs)?;
                let bar = step.as_ref().map_or(best.score, |(_, q)| q.score);
                if p.score < bar {
                    step = Some((cand, p));
                }
            }
        }
        let Some((t, p)) = step else { break };
        log::debug!("nni: score {} -> {}", best.score, p.score);
        scores.push(p.score);
        tree = t;
        best = p;
    }

    for (label, &w) in best.edge_weights.iter().enumerate() {
        tree.set_weight(label, w as f64);
    }
    Ok(NniSearch {
        tree,
        parsimony: best,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dna(s: &str) -> Dna8 {
        Dna8::new(s).unwrap()
    }

    fn texts(p: &Parsimony, range: std::ops::Range<usize>) -> Vec<String> {
        p.labels[range].iter().map(|s| s.to_text()).collect()
    }

    #[test]
    fn rooted_four_leaves() {
        let tree = PhyloTree::from_newick("((a,b)ab,(c,d)cd)r;").unwrap();
        let id = |name: &str| {
            tree.nodes()
                .iter()
                .position(|n| n.name.as_deref() == Some(name))
                .unwrap()
        };
        let leaves = vec![
            (id("a"), dna("CAAATCCC")),
            (id("b"), dna("ATTGCGAC")),
            (id("c"), dna("CTGCGCTG")),
            (id("d"), dna("ATGGACGA")),
        ];
        let p = small_parsimony(&tree, &leaves).unwrap();
        assert_eq!(p.score, 16);
        assert_eq!(p.labels[id("ab")].to_text(), "ATAGACAC");
        assert_eq!(p.labels[id("cd")].to_text(), "ATGGACAA");
        assert_eq!(p.labels[id("r")].to_text(), "ATAGACAA");
        assert_eq!(p.labels[id("a")].to_text(), "CAAATCCC");
        assert_eq!(p.edge_weights.iter().sum::<usize>(), 16);
        assert_eq!(p.edge_weights[id("r")], 0);
    }

    #[test]
    fn rooted_errors() {
        let tree = PhyloTree::from_newick("(a,b);").unwrap();
        assert!(small_parsimony(&tree, &[(1, dna("AC"))]).is_err(), "missing leaf");
        assert!(matches!(
            small_parsimony(&tree, &[(1, dna("AC")), (2, dna("A"))]),
            Err(KestrelError::LengthMismatch { .. })
        ));
        assert!(small_parsimony(&tree, &[(0, dna("A")), (1, dna("A")), (2, dna("A"))]).is_err());
        assert!(small_parsimony(&tree, &[(1, dna("A")), (7, dna("A"))]).is_err());
    }

    #[test]
    fn identical_leaves_cost_nothing() {
        let tree = PhyloTree::from_newick("((a,b),c);").unwrap();
        let leaves: Vec<(NodeId, Dna8)> = tree.leaves().into_iter().map(|id| (id, dna("gatt"))).collect();
        let p = small_parsimony(&tree, &leaves).unwrap();
        assert_eq!(p.score, 0);
        assert_eq!(p.labels[tree.root()].to_text(), "GATT");
    }

    fn quartet() -> UnrootedTree {
        let mut t = UnrootedTree::new(4);
        t.add_node();
        t.add_node();
        for (a, b) in [(4, 0), (4, 1), (5, 2), (5, 3), (4, 5)] {
            t.add_edge(a, b, 1.0).unwrap();
        }
        t
    }

    #[test]
    fn unrooted_four_leaves() {
        let seqs: Vec<Dna8> = ["TCGGCCAA", "CCTGGCTG", "CACAGGAT", "TGAGTACC"]
            .iter()
            .map(|s| dna(s))
            .collect();
        let p = small_parsimony_unrooted(&quartet(), &seqs).unwrap();
        assert_eq!(p.score, 17);
        assert_eq!(texts(&p, 4..6), vec!["CCAGGCAA", "CAAGGAAA"]);
        assert_eq!(p.edge_weights.len(), 5);
        assert_eq!(p.edge_weights[4], hamming8(&p.labels[4], &p.labels[5]));
    }

    #[test]
    fn unrooted_errors() {
        let seqs = vec![dna("A"), dna("C")];
        assert!(small_parsimony_unrooted(&quartet(), &seqs).is_err());
        assert!(small_parsimony_unrooted(&UnrootedTree::new(2), &seqs).is_err());
        let one = small_parsimony_unrooted(&UnrootedTree::new(1), &seqs[..1]).unwrap();
        assert_eq!(one.score, 0);
    }

    #[test]
    fn nni_search_improves() {
        let seqs: Vec<Dna8> = ["GCAGGGTA", "TTTACGCG", "CGACCTGA", "GATTCCAC", "TCCGTAGT"]
            .iter()
            .map(|s| dna(s))
            .collect();
        let mut t = UnrootedTree::new(5);
        for _ in 0..3 {
            t.add_node();
        }
        for (a, b) in [(5, 0), (5, 1), (6, 2), (6, 3), (7, 4), (5, 7), (6, 7)] {
            t.add_edge(a, b, 1.0).unwrap();
        }
        let found = large_parsimony(&t, &seqs).unwrap();
        assert_eq!(found.scores, vec![23, 22, 21]);
        assert_eq!(found.parsimony.score, 21);
        assert_eq!(
            texts(&found.parsimony, 5..8),
            vec!["GCAGCGGA", "GCTGCGGA", "TCTGCGGA"]
        );
        let total: f64 = (0..found.tree.edge_count()).map(|l| found.tree.weight(l)).sum();
        assert_eq!(total, 21.0);
    }

    #[test]
    fn nni_search_stops_at_local_optimum() {
        let seqs: Vec<Dna8> = ["AAAA", "AAAA", "CCCC", "CCCC"].iter().map(|s| dna(s)).collect();
        let found = large_parsimony(&quartet(), &seqs).unwrap();
        assert_eq!(found.scores, vec![4]);
        assert_eq!(found.tree.edges().len(), 5);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn leaf_seqs(n: usize, len: usize) -> impl Strategy<Value = Vec<Dna8>> {
        proptest::collection::vec(
            proptest::collection::vec(proptest::sample::select(b"ACGT".to_vec()), len),
            n,
        )
        .prop_map(|v| v.into_iter().map(|s| Dna8::new(s).unwrap()).collect())
    }

    // caterpillar over n >= 3 leaves: internal nodes n..2n-2 in a chain
    fn caterpillar(n: usize) -> UnrootedTree {
        let mut t = UnrootedTree::new(n);
        let inner: Vec<usize> = (0..n - 2).map(|_| t.add_node()).collect();
        t.add_edge(inner[0], 0, 1.0).unwrap();
        for (i, &v) in inner.iter().enumerate() {
            t.add_edge(v, i + 1, 1.0).unwrap();
            if i + 1 < inner.len() {
                t.add_edge(v, inner[i + 1], 1.0).unwrap();
            }
        }
        t.add_edge(inner[inner.len() - 1], n - 1, 1.0).unwrap();
        t
    }

    proptest! {
        #[test]
        fn score_matches_edge_sum(seqs in leaf_seqs(6, 10)) {
            let t = caterpillar(6);
            let p = small_parsimony_unrooted(&t, &seqs).unwrap();
            prop_assert_eq!(p.score, p.edge_weights.iter().sum::<usize>());
            for (i, s) in seqs.iter().enumerate() {
                prop_assert_eq!(&p.labels[i], s);
            }
        }

        #[test]
        fn nni_never_worsens(seqs in leaf_seqs(5, 8)) {
            let t = caterpillar(5);
            let found = large_parsimony(&t, &seqs).unwrap();
            prop_assert!(found.scores.windows(2).all(|w| w[1] < w[0]));
            prop_assert_eq!(*found.scores.last().unwrap(), found.parsimony.score);
            let again = small_parsimony_unrooted(&found.tree, &seqs).unwrap();
            prop_assert_eq!(again.score, found.parsimony.score);
        }
    }
}

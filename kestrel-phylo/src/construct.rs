//! Distance-based tree construction.
//!
//! [`upgma`] builds an ultrametric rooted tree as a parent list;
//! [`neighbor_joining`] and [`additive_phylogeny`] build unrooted trees with
//! leaves `0..n` and internal nodes appended after them.

use kestrel_core::graph::{AdjacencyList, FromList};
use kestrel_core::{KestrelError, Result};

use crate::distance::{close, DistanceMatrix};
use crate::tree::{Node, PhyloTree};
use crate::unrooted::UnrootedTree;

/// One node of a UPGMA tree.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgmaNode {
    pub parent: Option<usize>,
    /// Length of the edge to the parent; NaN at the root.
    pub weight: f64,
    /// Height above the leaves.
    pub age: f64,
    pub leaf_count: usize,
}

/// UPGMA result: leaves `0..n` followed by one node per join, root last.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Upgma {
    pub nodes: Vec<UpgmaNode>,
}

impl Upgma {
    pub fn root(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Parent to children adjacency.
    pub fn to_adjacency(&self) -> AdjacencyList {
        let mut g = vec![Vec::new(); self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(p) = node.parent {
                g[p].push(id);
            }
        }
        g
    }

    pub fn from_list(&self) -> Result<FromList> {
        FromList::from_tree(&self.to_adjacency(), self.root())
    }

    /// Rooted tree with `names` on the leaves and edge weights as branch
    /// lengths.
    ///
    /// # Errors
    ///
    /// Returns an error if there are more names than leaves.
    pub fn to_tree<S: AsRef<str>>(&self, names: &[S]) -> Result<PhyloTree> {
        let leaves = self.nodes.iter().filter(|n| n.leaf_count == 1).count();
        if names.len() > leaves {
            return Err(KestrelError::InvalidInput(format!(
                "{} names for {} leaves",
                names.len(),
                leaves
            )));
        }
        let mut nodes: Vec<Node> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(id, u)| Node {
                branch_length: u.parent.map(|_| u.weight),
                name: names.get(id).map(|s| s.as_ref().to_string()),
                ..Node::new(id, u.parent)
            })
            .collect();
        for id in 0..nodes.len() {
            if let Some(p) = nodes[id].parent {
                nodes[p].children.push(id);
            }
        }
        PhyloTree::from_nodes(nodes, self.root())
    }
}

/// Build an ultrametric tree by average linkage.
///
/// Each step joins the closest pair of clusters (first pair on ties) under
/// a new node at half their distance.
///
/// # Errors
///
/// Returns an error for an empty or invalid matrix.
pub fn upgma(d: &DistanceMatrix) -> Result<Upgma> {
    let n = d.n();
    if n == 0 {
        return Err(KestrelError::InvalidInput("UPGMA needs at least one leaf".into()));
    }
    d.validate()?;

    let mut dist: Vec<Vec<f64>> = (0..n).map(|i| d.row(i).to_vec()).collect();
    let mut nodes = vec![
        UpgmaNode {
            parent: None,
            weight: f64::NAN,
            age: 0.0,
            leaf_count: 1,
        };
        n
    ];
    let mut active: Vec<usize> = (0..n).collect();

    while active.len() > 1 {
        let m = active.len();
        let (mut min_i, mut min_j) = (0, 1);
        for i in 0..m {
            for j in (i + 1)..m {
                if dist[i][j] < dist[min_i][min_j] {
                    min_i = i;
                    min_j = j;
                }
            }
        }

        let (node_i, node_j) = (active[min_i], active[min_j]);
        let size_i = nodes[node_i].leaf_count;
        let size_j = nodes[node_j].leaf_count;
        let new_id = nodes.len();
        nodes.push(UpgmaNode {
            parent: None,
            weight: f64::NAN,
            age: dist[min_i][min_j] / 2.0,
            leaf_count: size_i + size_j,
        });
        nodes[node_i].parent = Some(new_id);
        nodes[node_j].parent = Some(new_id);

        for k in 0..m {
            if k == min_i || k == min_j {
                continue;
            }
            let d_new = (dist[min_i][k] * size_i as f64 + dist[min_j][k] * size_j as f64)
                / (size_i + size_j) as f64;
            dist[min_i][k] = d_new;
            dist[k][min_i] = d_new;
        }
        active[min_i] = new_id;
        swap_remove(&mut dist, &mut active, min_j);
    }

    for id in 0..nodes.len() {
        if let Some(p) = nodes[id].parent {
            nodes[id].weight = nodes[p].age - nodes[id].age;
        }
    }
    Ok(Upgma { nodes })
}

// Drop row and column `j` of the working matrix by moving the last one
// into its place.
fn swap_remove(dist: &mut Vec<Vec<f64>>, active: &mut Vec<usize>, j: usize) {
    let last = active.len() - 1;
    if j != last {
        active[j] = active[last];
        dist.swap(j, last);
        for row in dist.iter_mut() {
            row.swap(j, last);
        }
    }
    active.pop();
    dist.pop();
    for row in dist.iter_mut() {
        row.pop();
    }
}

/// Build an unrooted tree by neighbour joining.
///
/// Limb lengths are not clamped, so non-additive input can produce
/// negative edge weights.
///
/// # Errors
///
/// Returns an error for fewer than two leaves or an invalid matrix.
pub fn neighbor_joining(d: &DistanceMatrix) -> Result<UnrootedTree> {
    let n = d.n();
    if n < 2 {
        return Err(KestrelError::InvalidInput(format!(
            "neighbour joining needs at least 2 leaves, got {}",
            n
        )));
    }
    d.validate()?;

    let mut tree = UnrootedTree::new(n);
    let mut dist: Vec<Vec<f64>> = (0..n).map(|i| d.row(i).to_vec()).collect();
    let mut active: Vec<usize> = (0..n).collect();

    while active.len() > 2 {
        let m = active.len();
        let total: Vec<f64> = dist.iter().map(|row| row.iter().sum()).collect();

        let (mut min_i, mut min_j) = (0, 1);
        let mut min_q = f64::INFINITY;
        for i in 0..m {
            for j in (i + 1)..m {
                let q = (m as f64 - 2.0) * dist[i][j] - total[i] - total[j];
                if q < min_q {
                    min_q = q;
                    min_i = i;
                    min_j = j;
                }
            }
        }

        let d_ij = dist[min_i][min_j];
        let delta = (total[min_i] - total[min_j]) / (m as f64 - 2.0);
        let v = tree.add_node();
        tree.add_edge(v, active[min_i], (d_ij + delta) / 2.0)?;
        tree.add_edge(v, active[min_j], (d_ij - delta) / 2.0)?;

        for k in 0..m {
            if k == min_i || k == min_j {
                continue;
            }
            let d_new = (dist[min_i][k] + dist[min_j][k] - d_ij) / 2.0;
            dist[min_i][k] = d_new;
            dist[k][min_i] = d_new;
        }
        active[min_i] = v;
        swap_remove(&mut dist, &mut active, min_j);
    }

    tree.add_edge(active[0], active[1], dist[0][1])?;
    Ok(tree)
}

/// Recover the weighted tree whose leaf path lengths equal `d`.
///
/// Leaves are peeled off from the last one down: each is attached, at
/// its limb length, to the point on the path between two earlier leaves
/// that the four-point condition places it.
///
/// # Errors
///
/// Returns [`KestrelError::ShapeViolation`] if `d` is not additive.
pub fn additive_phylogeny(d: &DistanceMatrix) -> Result<UnrootedTree> {
    let n = d.n();
    if !d.is_additive() {
        return Err(KestrelError::ShapeViolation(
            "distance matrix is not additive".into(),
        ));
    }
    let mut tree = UnrootedTree::new(n);
    if n < 2 {
        return Ok(tree);
    }

    // (leaf, limb, i, k, distance from i to the attachment point)
    let mut steps = Vec::with_capacity(n.saturating_sub(2));
    for m in (2..n).rev() {
        let limb = d.limb_length_within(m, m);
        let (i, k) = (0..m)
            .flat_map(|i| (0..m).map(move |k| (i, k)))
            .find(|&(i, k)| {
                i != k && close(d.get(i, k), d.get(i, m) - limb + d.get(m, k) - limb)
            })
            .ok_or_else(|| {
                KestrelError::ShapeViolation(format!("no attachment point for leaf {}", m))
            })?;
        steps.push((m, limb, i, k, d.get(i, m) - limb));
    }

    tree.add_edge(0, 1, d.get(0, 1))?;
    for &(m, limb, i, k, x) in steps.iter().rev() {
        let path = tree
            .path(i, k)
            .ok_or_else(|| KestrelError::ShapeViolation(format!("leaves {} and {} are not joined", i, k)))?;
        let mut attach = path[path.len() - 1];
        let mut acc = 0.0;
        for pair in path.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            if close(acc, x) {
                attach = u;
                break;
            }
            let w = tree
                .label_between(u, v)
                .map(|l| tree.weight(l))
                .unwrap_or_default();
            if acc + w > x && !close(acc + w, x) {
                attach = tree.split_edge(u, v, x - acc)?;
                break;
            }
            acc += w;
        }
        tree.add_edge(attach, m, limb)?;
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unrooted::same_leaf_distances;

    fn matrix(rows: &[[f64; 4]]) -> DistanceMatrix {
        DistanceMatrix::from_rows(rows).unwrap()
    }

    fn additive4() -> DistanceMatrix {
        matrix(&[
            [0.0, 13.0, 21.0, 22.0],
            [13.0, 0.0, 12.0, 13.0],
            [21.0, 12.0, 0.0, 13.0],
            [22.0, 13.0, 13.0, 0.0],
        ])
    }

    fn assert_edges(t: &UnrootedTree, want: &[(usize, usize, f64)]) {
        let got = t.edges();
        assert_eq!(got.len(), want.len(), "{:?}", got);
        for (g, w) in got.iter().zip(want) {
            assert_eq!((g.0, g.1), (w.0, w.1), "{:?}", got);
            assert!(close(g.2, w.2), "{:?}", got);
        }
    }

    #[test]
    fn upgma_four_leaves() {
        let d = matrix(&[
            [0.0, 20.0, 17.0, 11.0],
            [20.0, 0.0, 20.0, 13.0],
            [17.0, 20.0, 0.0, 10.0],
            [11.0, 13.0, 10.0, 0.0],
        ]);
        let u = upgma(&d).unwrap();
        assert_eq!(u.nodes.len(), 7);
        assert_eq!(u.root(), 6);

        let parents: Vec<Option<usize>> = u.nodes.iter().map(|n| n.parent).collect();
        assert_eq!(parents, vec![Some(5), Some(6), Some(4), Some(4), Some(5), Some(6), None]);
        let counts: Vec<usize> = u.nodes.iter().map(|n| n.leaf_count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 2, 3, 4]);

        assert_eq!(u.nodes[4].age, 5.0);
        assert_eq!(u.nodes[5].age, 7.0);
        assert!((u.nodes[6].age - 8.833).abs() < 1e-3);
        assert_eq!(u.nodes[0].weight, 7.0);
        assert_eq!(u.nodes[2].weight, 5.0);
        assert!(close(u.nodes[1].weight, 53.0 / 6.0));
        assert!(u.nodes[6].weight.is_nan());
    }

    #[test]
    fn upgma_to_tree() {
        let d = matrix(&[
            [0.0, 20.0, 17.0, 11.0],
            [20.0, 0.0, 20.0, 13.0],
            [17.0, 20.0, 0.0, 10.0],
            [11.0, 13.0, 10.0, 0.0],
        ]);
        let u = upgma(&d).unwrap();
        let tree = u.to_tree(&["a", "b", "c", "d"]).unwrap();
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.root(), 6);
        let top = 53.0 / 6.0;
        assert_eq!(
            tree.to_newick(),
            format!("(b:{},(a:7,(c:5,d:5):2):{});", top, top - 7.0)
        );
        assert!(u.to_tree(&["a", "b", "c", "d", "e"]).is_err());

        let fl = u.from_list().unwrap();
        assert_eq!(fl.common_ancestor(2, 3), Some(4));
        assert_eq!(fl.common_ancestor(0, 1), Some(6));
    }

    #[test]
    fn upgma_degenerate() {
        assert!(upgma(&DistanceMatrix::zeros(0)).is_err());
        let u = upgma(&DistanceMatrix::zeros(1)).unwrap();
        assert_eq!(u.nodes.len(), 1);
        assert_eq!(u.root(), 0);

        let mut bad = DistanceMatrix::zeros(3);
        bad.set(0, 1, -1.0);
        assert!(matches!(upgma(&bad), Err(KestrelError::ShapeViolation(_))));
    }

    #[test]
    fn nj_recovers_additive_tree() {
        let d = additive4();
        let t = neighbor_joining(&d).unwrap();
        assert_edges(
            &t,
            &[(0, 4, 11.0), (1, 4, 2.0), (2, 5, 6.0), (3, 5, 7.0), (4, 5, 4.0)],
        );
        let back = t.leaf_distances();
        for i in 0..4 {
            for j in 0..4 {
                assert!(close(back.get(i, j), d.get(i, j)));
            }
        }
    }

    #[test]
    fn nj_non_additive() {
        let d = matrix(&[
            [0.0, 23.0, 27.0, 20.0],
            [23.0, 0.0, 30.0, 28.0],
            [27.0, 30.0, 0.0, 30.0],
            [20.0, 28.0, 30.0, 0.0],
        ]);
        let t = neighbor_joining(&d).unwrap();
        assert_edges(
            &t,
            &[(0, 4, 8.0), (1, 5, 13.5), (2, 5, 16.5), (3, 4, 12.0), (4, 5, 2.0)],
        );
    }

    #[test]
    fn nj_small() {
        assert!(neighbor_joining(&DistanceMatrix::zeros(1)).is_err());
        let mut d = DistanceMatrix::zeros(2);
        d.set(0, 1, 3.0);
        let t = neighbor_joining(&d).unwrap();
        assert_eq!(t.edges(), vec![(0, 1, 3.0)]);
    }

    #[test]
    fn additive_tree_four_leaves() {
        let d = additive4();
        let t = additive_phylogeny(&d).unwrap();
        assert_edges(
            &t,
            &[(0, 4, 11.0), (1, 4, 2.0), (2, 5, 6.0), (3, 5, 7.0), (4, 5, 4.0)],
        );
        assert_eq!(t.leaf_distances(), d);
        assert!(same_leaf_distances(&t, &neighbor_joining(&d).unwrap()));
        // leaf 2 split 0-1 first, then leaf 3 split that node's limb
        assert_eq!(t.internal_edges(), vec![2]);
    }

    #[test]
    fn additive_tree_other_attachment() {
        let d = matrix(&[
            [0.0, 20.0, 9.0, 11.0],
            [20.0, 0.0, 17.0, 11.0],
            [9.0, 17.0, 0.0, 8.0],
            [11.0, 11.0, 8.0, 0.0],
        ]);
        let t = additive_phylogeny(&d).unwrap();
        assert_edges(
            &t,
            &[(0, 4, 6.0), (1, 5, 10.0), (2, 4, 3.0), (3, 5, 1.0), (4, 5, 4.0)],
        );
        assert_eq!(t.leaf_distances(), d);
    }

    #[test]
    fn additive_rejects_non_additive() {
        let mut d = additive4();
        d.set(0, 1, 22.0);
        assert!(matches!(additive_phylogeny(&d), Err(KestrelError::ShapeViolation(_))));
        assert_eq!(additive_phylogeny(&DistanceMatrix::zeros(1)).unwrap().node_count(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Random additive matrices from trees with positive integer weights.
    ///
    /// Each step picks an edge of weight at least 2, splits it at an
    /// integer point and hangs the next leaf there.
    fn additive_matrix() -> impl Strategy<Value = DistanceMatrix> {
        (2u32..20, proptest::collection::vec((any::<usize>(), any::<u32>(), 1u32..20), 1..6))
            .prop_map(|(first, steps)| {
                let n = steps.len() + 2;
                let mut t = UnrootedTree::new(n);
                t.add_edge(0, 1, first as f64).unwrap();
                for (m, &(pick, at, limb)) in (2..n).zip(&steps) {
                    let long: Vec<(usize, usize, f64)> =
                        t.edges().into_iter().filter(|e| e.2 >= 2.0).collect();
                    let (a, b, w) = long[pick % long.len()];
                    let d = 1 + at % (w as u32 - 1);
                    let v = t.split_edge(a, b, d as f64).unwrap();
                    t.add_edge(v, m, (limb + 1) as f64).unwrap();
                }
                t.leaf_distances()
            })
    }

    proptest! {
        #[test]
        fn additive_phylogeny_reproduces_matrix(d in additive_matrix()) {
            prop_assert!(d.is_additive());
            let t = additive_phylogeny(&d).unwrap();
            prop_assert_eq!(t.leaf_distances(), d.clone());
            let nj = neighbor_joining(&d).unwrap();
            let back = nj.leaf_distances();
            for i in 0..d.n() {
                for j in 0..d.n() {
                    prop_assert!((back.get(i, j) - d.get(i, j)).abs() < 1e-6);
                }
            }
        }

        #[test]
        fn upgma_ages_grow_to_root(rows in proptest::collection::vec(1u32..50, 6)) {
            // 4x4 from six upper-triangle entries, shifted into a metric
            let mut d = DistanceMatrix::zeros(4);
            let mut it = rows.iter();
            for i in 0..4 {
                for j in i + 1..4 {
                    d.set(i, j, 50.0 + *it.next().unwrap() as f64);
                }
            }
            let u = upgma(&d).unwrap();
            prop_assert_eq!(u.nodes[u.root()].leaf_count, 4);
            for node in &u.nodes {
                if let Some(p) = node.parent {
                    prop_assert!(u.nodes[p].age >= node.age);
                    prop_assert!(node.weight >= 0.0);
                }
            }
        }
    }
}

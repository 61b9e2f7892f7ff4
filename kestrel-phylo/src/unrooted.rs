//! Unrooted weighted trees.
//!
//! Nodes `0..leaf_count` are the leaves in input order; internal nodes are
//! appended after them. Every edge is stored as two [`Half`]s sharing a
//! label, and the label indexes the edge weight.

use kestrel_core::graph::{Half, LabeledAdjacencyList};
use kestrel_core::{KestrelError, Result, Summarizable};

use crate::distance::{close, DistanceMatrix};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnrootedTree {
    graph: LabeledAdjacencyList,
    weights: Vec<f64>,
    leaves: usize,
}

impl UnrootedTree {
    /// A forest of `leaves` isolated leaves.
    pub fn new(leaves: usize) -> Self {
        Self {
            graph: vec![Vec::new(); leaves],
            weights: Vec::new(),
            leaves,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    pub fn graph(&self) -> &LabeledAdjacencyList {
        &self.graph
    }

    pub fn neighbors(&self, v: usize) -> &[Half] {
        &self.graph[v]
    }

    /// Weight of edge `label`.
    pub fn weight(&self, label: usize) -> f64 {
        self.weights[label]
    }

    pub fn set_weight(&mut self, label: usize, w: f64) {
        self.weights[label] = w;
    }

    /// Append an internal node and return its id.
    pub fn add_node(&mut self) -> usize {
        self.graph.push(Vec::new());
        self.graph.len() - 1
    }

    /// Join `a` and `b` with an edge of weight `w`; returns the edge label.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is out of range or `a == b`.
    pub fn add_edge(&mut self, a: usize, b: usize, w: f64) -> Result<usize> {
        let n = self.graph.len();
        if a >= n || b >= n || a == b {
            return Err(KestrelError::InvalidInput(format!(
                "cannot join {} and {} in a tree of {} nodes",
                a, b, n
            )));
        }
        let label = self.weights.len();
        self.weights.push(w);
        self.graph[a].push(Half { to: b, label });
        self.graph[b].push(Half { to: a, label });
        Ok(label)
    }

    pub(crate) fn label_between(&self, a: usize, b: usize) -> Option<usize> {
        self.graph[a].iter().find(|h| h.to == b).map(|h| h.label)
    }

    /// Endpoints of edge `label`, lower node id first in adjacency order.
    pub fn edge_ends(&self, label: usize) -> Option<(usize, usize)> {
        self.graph.iter().enumerate().find_map(|(a, hs)| {
            hs.iter().find(|h| h.label == label).map(|h| (a, h.to))
        })
    }

    /// All edges as `(a, b, weight)` with `a < b`, sorted.
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        let mut out: Vec<(usize, usize, f64)> = self
            .graph
            .iter()
            .enumerate()
            .flat_map(|(a, hs)| {
                hs.iter()
                    .filter(move |h| a < h.to)
                    .map(move |h| (a, h.to, self.weights[h.label]))
            })
            .collect();
        out.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        out
    }

    /// Insert a new node on edge `a`-`b` at distance `d` from `a`.
    ///
    /// # Errors
    ///
    /// Returns an error if `a` and `b` are not adjacent.
    pub fn split_edge(&mut self, a: usize, b: usize, d: f64) -> Result<usize> {
        let label = self
            .label_between(a, b)
            .ok_or_else(|| KestrelError::InvalidInput(format!("no edge between {} and {}", a, b)))?;
        let w = self.weights[label];
        let v = self.add_node();
        for h in self.graph[a].iter_mut().filter(|h| h.label == label) {
            h.to = v;
        }
        self.graph[b].retain(|h| h.label != label);
        self.graph[v].push(Half { to: a, label });
        self.weights[label] = d;
        self.add_edge(v, b, w - d)?;
        Ok(v)
    }

    /// Nodes on the path from `a` to `b`, both included.
    pub fn path(&self, a: usize, b: usize) -> Option<Vec<usize>> {
        let mut from: Vec<Option<usize>> = vec![None; self.graph.len()];
        let mut seen = vec![false; self.graph.len()];
        seen[a] = true;
        let mut stack = vec![a];
        while let Some(u) = stack.pop() {
            if u == b {
                break;
            }
            for h in &self.graph[u] {
                if !seen[h.to] {
                    seen[h.to] = true;
                    from[h.to] = Some(u);
                    stack.push(h.to);
                }
            }
        }
        if !seen[b] {
            return None;
        }
        let mut path = vec![b];
        let mut cur = b;
        while let Some(p) = from[cur] {
            path.push(p);
            cur = p;
        }
        path.reverse();
        Some(path)
    }

    /// Path lengths between every pair of leaves.
    ///
    /// Unreachable pairs get `f64::INFINITY`.
    pub fn leaf_distances(&self) -> DistanceMatrix {
        let mut m = DistanceMatrix::zeros(self.leaves);
        let mut dist = vec![f64::INFINITY; self.graph.len()];
        for a in 0..self.leaves {
            dist.iter_mut().for_each(|d| *d = f64::INFINITY);
            dist[a] = 0.0;
            let mut stack = vec![a];
            while let Some(u) = stack.pop() {
                for h in &self.graph[u] {
                    if dist[h.to].is_infinite() {
                        dist[h.to] = dist[u] + self.weights[h.label];
                        stack.push(h.to);
                    }
                }
            }
            for b in a + 1..self.leaves {
                m.set(a, b, dist[b]);
            }
        }
        m
    }

    /// Labels of edges whose endpoints both have degree three.
    pub fn internal_edges(&self) -> Vec<usize> {
        (0..self.weights.len())
            .filter(|&l| {
                self.edge_ends(l)
                    .map_or(false, |(a, b)| self.graph[a].len() == 3 && self.graph[b].len() == 3)
            })
            .collect()
    }

    /// Nearest-neighbour interchange across internal edge `label`.
    ///
    /// With `a`-`b` the edge, `x` the second other neighbour of `a` and
    /// `y, z` the other neighbours of `b`, swap `x` with `y`
    /// (`which == 0`) or with `z` (`which == 1`). Edge labels and weights
    /// travel with their subtrees.
    ///
    /// # Errors
    ///
    /// Returns an error if `label` is not an internal edge or `which > 1`.
    pub fn nni(&self, label: usize, which: usize) -> Result<UnrootedTree> {
        let not_internal = || KestrelError::InvalidInput(format!("edge {} is not internal", label));
        let (a, b) = self.edge_ends(label).ok_or_else(not_internal)?;
        if which > 1 || self.graph[a].len() != 3 || self.graph[b].len() != 3 {
            return Err(not_internal());
        }
        let others = |u: usize, skip: usize| -> Vec<Half> {
            self.graph[u].iter().copied().filter(|h| h.to != skip).collect()
        };
        let hx = others(a, b)[1];
        let hy = others(b, a)[which];

        let mut t = self.clone();
        for h in t.graph[a].iter_mut().filter(|h| **h == hx) {
            *h = hy;
        }
        for h in t.graph[b].iter_mut().filter(|h| **h == hy) {
            *h = hx;
        }
        for h in t.graph[hx.to].iter_mut().filter(|h| h.label == hx.label) {
            h.to = b;
        }
        for h in t.graph[hy.to].iter_mut().filter(|h| h.label == hy.label) {
            h.to = a;
        }
        Ok(t)
    }
}

impl Summarizable for UnrootedTree {
    fn summary(&self) -> String {
        format!(
            "UnrootedTree: {} nodes ({} leaves), {} edges",
            self.node_count(),
            self.leaves,
            self.edge_count()
        )
    }
}

/// Whether two trees give every leaf pair the same path length.
pub fn same_leaf_distances(a: &UnrootedTree, b: &UnrootedTree) -> bool {
    if a.leaves != b.leaves {
        return false;
    }
    let (da, db) = (a.leaf_distances(), b.leaf_distances());
    (0..a.leaves).all(|i| (0..a.leaves).all(|j| close(da.get(i, j), db.get(i, j))))
}

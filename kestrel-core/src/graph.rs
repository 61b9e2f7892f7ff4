//! Directed graph primitives shared by assembly and phylogeny.
//!
//! Graphs are adjacency lists indexed by node number. A
//! [`LabeledAdjacencyList`] carries a `usize` label on every arc; callers use
//! it as an index into a side table (edge weights, k-mer multiplicities).
//! [`FromList`] is a compact parent-pointer form of a rooted tree.

use crate::bitset::BitSet;
use crate::{KestrelError, Result};

/// Unlabeled adjacency list: `g[v]` lists the heads of arcs leaving `v`.
pub type AdjacencyList = Vec<Vec<usize>>;

/// One half of a labeled arc: the head node and the arc label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Half {
    pub to: usize,
    pub label: usize,
}

/// Labeled adjacency list: `g[v]` lists the labeled arcs leaving `v`.
pub type LabeledAdjacencyList = Vec<Vec<Half>>;

/// Total number of arcs.
pub fn arc_count(g: &AdjacencyList) -> usize {
    g.iter().map(Vec::len).sum()
}

/// Drop the labels of a labeled adjacency list.
pub fn unlabeled(g: &LabeledAdjacencyList) -> AdjacencyList {
    g.iter()
        .map(|to| to.iter().map(|h| h.to).collect())
        .collect()
}

/// Reverse every arc. Heads keep the order in which their tails are visited.
pub fn transpose(g: &AdjacencyList) -> AdjacencyList {
    let mut t = vec![Vec::new(); g.len()];
    for (from, to) in g.iter().enumerate() {
        for &v in to {
            t[v].push(from);
        }
    }
    t
}

/// Reverse every arc of a labeled graph, keeping labels.
pub fn labeled_transpose(g: &LabeledAdjacencyList) -> LabeledAdjacencyList {
    let mut t = vec![Vec::new(); g.len()];
    for (from, to) in g.iter().enumerate() {
        for h in to {
            t[h.to].push(Half {
                to: from,
                label: h.label,
            });
        }
    }
    t
}

/// In-degree of every node.
pub fn in_degrees(g: &AdjacencyList) -> Vec<usize> {
    let mut deg = vec![0usize; g.len()];
    for to in g {
        for &v in to {
            deg[v] += 1;
        }
    }
    deg
}

/// Find a path that uses every arc exactly once.
///
/// The start node is the unique node with one more outgoing than incoming
/// arc; for a balanced graph it is the first node with an outgoing arc, and
/// the result is a cycle that returns to it.
///
/// # Errors
///
/// Returns an error if the degree balance rules out an Eulerian path or the
/// arcs are not all reachable from the start.
pub fn eulerian_path(g: &AdjacencyList) -> Result<Vec<usize>> {
    let n_arcs = arc_count(g);
    if n_arcs == 0 {
        return Err(KestrelError::InvalidInput("graph has no arcs".into()));
    }
    let ind = in_degrees(g);

    let mut start = None;
    let mut n_end = 0;
    for (v, to) in g.iter().enumerate() {
        let out = to.len() as isize;
        match out - ind[v] as isize {
            0 => {}
            1 if start.is_none() => start = Some(v),
            -1 if n_end == 0 => n_end += 1,
            _ => {
                return Err(KestrelError::InvalidInput(format!(
                    "graph is not Eulerian: node {} has in-degree {} and out-degree {}",
                    v, ind[v], out
                )))
            }
        }
    }
    let start = match start {
        Some(s) => s,
        None if n_end == 0 => g.iter().position(|to| !to.is_empty()).unwrap_or(0),
        None => {
            return Err(KestrelError::InvalidInput(
                "graph is not Eulerian: end node without start node".into(),
            ))
        }
    };

    // Hierholzer with an explicit stack.
    let mut next = vec![0usize; g.len()];
    let mut stack = vec![start];
    let mut path = Vec::with_capacity(n_arcs + 1);
    while let Some(&v) = stack.last() {
        if next[v] < g[v].len() {
            stack.push(g[v][next[v]]);
            next[v] += 1;
        } else {
            path.push(v);
            stack.pop();
        }
    }
    if path.len() != n_arcs + 1 {
        return Err(KestrelError::InvalidInput(
            "graph is not Eulerian: arcs are not connected".into(),
        ));
    }
    path.reverse();
    Ok(path)
}

/// All maximal non-branching paths.
///
/// A path is non-branching when every interior node has exactly one incoming
/// and one outgoing arc. Isolated cycles of such nodes are reported with the
/// start node repeated at the end.
pub fn maximal_non_branching_paths(g: &AdjacencyList) -> Vec<Vec<usize>> {
    let ind = in_degrees(g);
    let one_in_one_out = |v: usize| ind[v] == 1 && g[v].len() == 1;

    let mut paths = Vec::new();
    let mut used = vec![false; g.len()];
    for (v, to) in g.iter().enumerate() {
        if one_in_one_out(v) || to.is_empty() {
            continue;
        }
        used[v] = true;
        for &w in to {
            let mut path = vec![v, w];
            let mut cur = w;
            while one_in_one_out(cur) {
                used[cur] = true;
                cur = g[cur][0];
                path.push(cur);
            }
            paths.push(path);
        }
    }
    for v in 0..g.len() {
        if used[v] || !one_in_one_out(v) {
            continue;
        }
        let mut cycle = vec![v];
        let mut cur = v;
        loop {
            used[cur] = true;
            cur = g[cur][0];
            cycle.push(cur);
            if cur == v {
                break;
            }
        }
        paths.push(cycle);
    }
    paths
}

/// One node of a [`FromList`]: its parent and its path length from the root.
///
/// The root has `from == None` and `len == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathEnd {
    pub from: Option<usize>,
    pub len: usize,
}

/// Rooted tree stored as parent pointers plus a leaf set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FromList {
    pub paths: Vec<PathEnd>,
    pub leaves: BitSet,
    /// Longest root-to-node path, counted in nodes.
    pub max_len: usize,
}

impl FromList {
    /// Build from a directed tree adjacency list rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is out of range or a node is reached twice.
    pub fn from_tree(g: &AdjacencyList, root: usize) -> Result<Self> {
        if root >= g.len() {
            return Err(KestrelError::InvalidInput(format!(
                "root {} out of range ({})",
                root,
                g.len()
            )));
        }
        let mut paths = vec![PathEnd { from: None, len: 0 }; g.len()];
        let mut leaves = BitSet::new(g.len());
        paths[root].len = 1;
        let mut max_len = 1;
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            if g[v].is_empty() {
                leaves.insert(v);
            }
            for &c in &g[v] {
                if paths[c].len != 0 {
                    return Err(KestrelError::InvalidInput(format!(
                        "node {} reached twice; input is not a tree",
                        c
                    )));
                }
                let len = paths[v].len + 1;
                paths[c] = PathEnd { from: Some(v), len };
                max_len = max_len.max(len);
                stack.push(c);
            }
        }
        Ok(Self {
            paths,
            leaves,
            max_len,
        })
    }

    /// The root node (first node without a parent that was reached).
    pub fn root(&self) -> Option<usize> {
        self.paths
            .iter()
            .position(|p| p.from.is_none() && p.len == 1)
    }

    /// Nodes from `n` up to the root, inclusive.
    pub fn path_to_root(&self, n: usize) -> Vec<usize> {
        let mut path = vec![n];
        let mut cur = n;
        while let Some(p) = self.paths[cur].from {
            path.push(p);
            cur = p;
        }
        path
    }

    /// Lowest common ancestor of `a` and `b`, or `None` if they are in
    /// different trees.
    pub fn common_ancestor(&self, a: usize, b: usize) -> Option<usize> {
        let (mut a, mut b) = (a, b);
        while self.paths[a].len > self.paths[b].len {
            a = self.paths[a].from?;
        }
        while self.paths[b].len > self.paths[a].len {
            b = self.paths[b].from?;
        }
        while a != b {
            a = self.paths[a].from?;
            b = self.paths[b].from?;
        }
        Some(a)
    }

    /// Convert back to a directed adjacency list (parent → children).
    pub fn to_adjacency(&self) -> AdjacencyList {
        let mut g = vec![Vec::new(); self.paths.len()];
        for (n, p) in self.paths.iter().enumerate() {
            if let Some(f) = p.from {
                g[f].push(n);
            }
        }
        g
    }
}

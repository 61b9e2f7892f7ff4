//! Rooted phylogenetic trees.
//!
//! Uses arena-style storage: nodes live in a flat `Vec<Node>` and are
//! referenced by `NodeId` (a `usize` index).

use kestrel_core::graph::{AdjacencyList, FromList};
use kestrel_core::{KestrelError, Result, Summarizable};

/// Index into the tree's node arena.
pub type NodeId = usize;

/// A single node in a phylogenetic tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Index of this node in the arena.
    pub id: NodeId,
    /// Parent node (None for root).
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Weight of the edge to the parent, if one was given.
    pub branch_length: Option<f64>,
    /// Taxon or clade label.
    pub name: Option<String>,
}

impl Node {
    pub(crate) fn new(id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            branch_length: None,
            name: None,
        }
    }

    /// True if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A rooted phylogenetic tree stored as an arena of nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhyloTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl PhyloTree {
    /// Create a new tree with a single unnamed root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(0, None)],
            root: 0,
        }
    }

    /// Create a tree from pre-built nodes and a root index.
    ///
    /// # Errors
    ///
    /// Returns an error if `nodes` is empty, `root` is out of range or has a
    /// parent, ids do not match positions, or a child does not point back
    /// at its parent.
    pub fn from_nodes(nodes: Vec<Node>, root: NodeId) -> Result<Self> {
        if nodes.is_empty() {
            return Err(KestrelError::InvalidInput("empty node list".into()));
        }
        if root >= nodes.len() {
            return Err(KestrelError::InvalidInput(format!(
                "root index {} out of range ({})",
                root,
                nodes.len()
            )));
        }
        if nodes[root].parent.is_some() {
            return Err(KestrelError::InvalidInput(format!("root {} has a parent", root)));
        }
        for (i, node) in nodes.iter().enumerate() {
            if node.id != i {
                return Err(KestrelError::InvalidInput(format!(
                    "node at index {} has id {}",
                    i, node.id
                )));
            }
            for &c in &node.children {
                if nodes.get(c).and_then(|n| n.parent) != Some(node.id) {
                    return Err(KestrelError::InvalidInput(format!(
                        "child {} of node {} does not link back",
                        c, node.id
                    )));
                }
            }
        }
        Ok(Self { nodes, root })
    }

    /// Add a child to `parent` and return its `NodeId`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: Option<String>,
        branch_length: Option<f64>,
    ) -> Result<NodeId> {
        if parent >= self.nodes.len() {
            return Err(KestrelError::InvalidInput(format!(
                "parent index {} out of range ({})",
                parent,
                self.nodes.len()
            )));
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            name,
            branch_length,
            ..Node::new(id, Some(parent))
        });
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Access a node by id.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a node by id.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// All nodes, indexed by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// All leaf node ids.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.id)
            .collect()
    }

    /// Pre-order (parent before children) traversal yielding node ids.
    pub fn iter_preorder(&self) -> PreorderIter<'_> {
        PreorderIter {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Post-order (children before parent) node ids.
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend_from_slice(&self.nodes[id].children);
        }
        order.reverse();
        order
    }

    /// Parent-to-children adjacency list.
    pub fn to_adjacency(&self) -> AdjacencyList {
        self.nodes.iter().map(|n| n.children.clone()).collect()
    }

    /// Parent-pointer form with path lengths and the leaf set.
    pub fn to_from_list(&self) -> Result<FromList> {
        FromList::from_tree(&self.to_adjacency(), self.root)
    }

    /// Most recent common ancestor of two nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is out of range.
    pub fn mrca(&self, a: NodeId, b: NodeId) -> Result<NodeId> {
        if a >= self.nodes.len() || b >= self.nodes.len() {
            return Err(KestrelError::InvalidInput("node id out of range".into()));
        }
        let fl = self.to_from_list()?;
        fl.common_ancestor(a, b)
            .ok_or_else(|| KestrelError::InvalidInput(format!("nodes {} and {} are not connected", a, b)))
    }

    /// Sorted list of leaf names (leaves without names are excluded).
    pub fn leaf_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| n.is_leaf())
            .filter_map(|n| n.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Whether both trees have the same shape, names and branch lengths
    /// once children are put in a canonical order.
    pub fn same_topology(&self, other: &PhyloTree) -> bool {
        self.canonical() == other.canonical()
    }

    /// Newick text of the subtree with children sorted by their own text.
    fn canonical(&self) -> String {
        let mut text: Vec<String> = vec![String::new(); self.nodes.len()];
        for id in self.postorder() {
            let node = &self.nodes[id];
            let mut kids: Vec<String> = node
                .children
                .iter()
                .map(|&c| std::mem::take(&mut text[c]))
                .collect();
            kids.sort();
            let mut s = String::new();
            if !kids.is_empty() {
                s.push('(');
                s.push_str(&kids.join(","));
                s.push(')');
            }
            crate::newick::write_label(node, &mut s);
            text[id] = s;
        }
        std::mem::take(&mut text[self.root])
    }

    /// Parse a Newick format string into a tree.
    pub fn from_newick(input: &str) -> Result<Self> {
        crate::newick::parse(input)
    }

    /// Serialize the tree to a Newick format string.
    pub fn to_newick(&self) -> String {
        crate::newick::write(self)
    }
}

impl Default for PhyloTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Summarizable for PhyloTree {
    fn summary(&self) -> String {
        let leaves = self.leaf_count();
        let internal = self.node_count() - leaves;
        format!(
            "PhyloTree: {} nodes ({} leaves, {} internal)",
            self.node_count(),
            leaves,
            internal
        )
    }
}

/// Pre-order iterator over node ids.
pub struct PreorderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // reversed so the leftmost child comes out first
        for &child in self.tree.nodes[id].children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

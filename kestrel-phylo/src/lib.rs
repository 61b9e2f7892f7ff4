//! Phylogenetics for the kestrel crates.
//!
//! - **Distance matrices**: metric validation, the four-point test and limb
//!   lengths in [`DistanceMatrix`]
//! - **Tree construction**: [`upgma`], [`neighbor_joining`] and
//!   [`additive_phylogeny`]
//! - **Trees**: rooted [`PhyloTree`] with Newick I/O, weighted
//!   [`UnrootedTree`]
//! - **Parsimony**: [`small_parsimony`] on rooted trees,
//!   [`small_parsimony_unrooted`] and the NNI search [`large_parsimony`]
//!
//! # Example
//!
//! ```
//! use kestrel_phylo::{additive_phylogeny, DistanceMatrix};
//!
//! let d = DistanceMatrix::from_rows(&[
//!     [0.0, 13.0, 21.0, 22.0],
//!     [13.0, 0.0, 12.0, 13.0],
//!     [21.0, 12.0, 0.0, 13.0],
//!     [22.0, 13.0, 13.0, 0.0],
//! ])
//! .unwrap();
//! let tree = additive_phylogeny(&d).unwrap();
//! assert_eq!(tree.leaf_distances(), d);
//! ```

pub mod construct;
pub mod distance;
pub mod newick;
pub mod parsimony;
pub mod tree;
pub mod unrooted;

pub use construct::{additive_phylogeny, neighbor_joining, upgma, Upgma, UpgmaNode};
pub use distance::DistanceMatrix;
pub use parsimony::{large_parsimony, small_parsimony, small_parsimony_unrooted, NniSearch, Parsimony};
pub use tree::{Node, NodeId, PhyloTree, PreorderIter};
pub use unrooted::{same_leaf_distances, UnrootedTree};

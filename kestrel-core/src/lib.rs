//! Shared primitives for the kestrel bioinformatics crates.
//!
//! `kestrel-core` provides the foundation the other kestrel crates build on:
//!
//! - **Error types**: [`KestrelError`] and [`Result`] for structured error handling
//! - **Traits**: [`Sequence`], [`Scored`], [`Summarizable`], plus the
//!   tie-inclusive ranking helper [`cut`]
//! - **Bit sets**: [`BitSet`] for dense membership (tree leaves)
//! - **Graphs**: adjacency lists, Eulerian paths, non-branching paths and
//!   parent-pointer trees in [`graph`]

pub mod bitset;
pub mod error;
pub mod graph;
pub mod traits;

pub use bitset::BitSet;
pub use error::{KestrelError, Result};
pub use graph::{AdjacencyList, FromList, Half, LabeledAdjacencyList, PathEnd};
pub use traits::*;

//! Similarity graph over an 8-connected pixel lattice.
//!
//! ## Model
//! Every pixel is a vertex carrying its YCbCr color; every in-bounds
//! 8-neighbor pair is initially an edge. Heuristics never delete edges --
//! they record marks (a dissimilarity flag and per-heuristic weights) on the
//! edge attributes, and [`EdgeFilters`] selects which marks suppress an edge
//! when the graph is traversed or materialized.
//!
//! ## Crossing resolution
//! The two diagonals of a 2x2 block cross; the heuristics vote by weight and
//! the composite filter keeps at most the heavier one. Equal weights remove
//! both diagonals of the pair.
//!
//! ## Ordering
//! The dissimilar heuristic must run before the weighting heuristics: they
//! traverse the graph with dissimilar edges suppressed. Curves, islands, and
//! sparse-pixels are order-independent among themselves because each writes
//! a distinct weight field.

mod filter;
mod graph;
mod heuristics;

pub use filter::EdgeFilters;
pub use graph::{EdgeAttr, SimilarityGraph};
pub use heuristics::HeuristicKind;

//! Umbrella crate for the depixelize workspace.
//!
//! Re-exports the foundational crates and provides the one-call pipeline:
//! similarity graph construction, crossing-edge resolution through the four
//! heuristics, and Voronoi cell reshaping.

pub mod tex;

pub use dpx_core::*;
pub use dpx_graph::*;
pub use dpx_voronoi::*;

use std::collections::BTreeSet;

/// Everything the pipeline produces for one image.
#[derive(Debug)]
pub struct Depixelized {
    /// The similarity graph with all heuristic marks applied.
    pub graph: SimilarityGraph,
    /// The fully resolved edge set (`EdgeFilters::ALL`).
    pub edges: BTreeSet<(usize, usize)>,
    /// The welded Voronoi cell diagram.
    pub voronoi: VoronoiDiagram,
}

/// Runs the full depixelization pipeline on an RGB image.
///
/// Phases are strictly ordered: the dissimilar heuristic runs first because
/// the weighting heuristics traverse the graph with dissimilar edges
/// suppressed; curves, islands, and sparse-pixels then accumulate their
/// votes, and the resolved edge set feeds the Voronoi reshaping.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] when either image dimension is zero.
pub fn depixelize(image: &Image<Rgb>) -> Result<Depixelized, Error> {
    let mut graph = SimilarityGraph::build(image)?;

    graph.apply_heuristic(HeuristicKind::Dissimilar, EdgeFilters::NONE)?;
    graph.apply_heuristic(HeuristicKind::Curves, EdgeFilters::DISSIMILAR)?;
    graph.apply_heuristic(HeuristicKind::Islands, EdgeFilters::DISSIMILAR)?;
    graph.apply_heuristic(HeuristicKind::SparsePixels, EdgeFilters::DISSIMILAR)?;

    let edges = graph.get_edges(EdgeFilters::ALL);

    let mut voronoi = VoronoiDiagram::new(graph.width(), graph.height());
    voronoi.build(&edges);

    Ok(Depixelized {
        graph,
        edges,
        voronoi,
    })
}

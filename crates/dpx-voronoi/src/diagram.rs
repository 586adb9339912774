use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::Serialize;

use crate::block::{PixelBlock, build_block_grid};
use crate::cell::{CellGraph, Defect};
use crate::weld::weld_grid;

/// A vertex of the reshaped cell graph, in pixel units with `y` growing
/// downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoronoiVertex {
    pub x: f64,
    pub y: f64,
}

/// The welded planar cell graph: vertex coordinates plus undirected
/// vertex-index pairs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VoronoiGraph {
    pub vertices: Vec<VoronoiVertex>,
    pub edges: Vec<(usize, usize)>,
}

/// Builder for the reshaped diagram of one image.
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    width: usize,
    height: usize,
    blocks: Vec<Vec<PixelBlock>>,
    graph: VoronoiGraph,
    defects: Vec<Defect>,
}

impl VoronoiDiagram {
    /// An empty diagram for a `width x height` pixel lattice.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            blocks: Vec::new(),
            graph: VoronoiGraph::default(),
            defects: Vec::new(),
        }
    }

    /// Builds the diagram from the surviving similarity-graph edges.
    ///
    /// A lattice narrower than one block in either direction produces an
    /// empty graph.
    pub fn build(&mut self, edges: &BTreeSet<(usize, usize)>) {
        if self.width < 2 || self.height < 2 {
            return;
        }

        self.blocks = build_block_grid(self.width, self.height, edges);

        // Template matching is a pure function per block.
        let width = self.width;
        let cells: Vec<Vec<CellGraph>> = self
            .blocks
            .par_iter()
            .enumerate()
            .map(|(h, row)| {
                row.iter()
                    .enumerate()
                    .map(|(w, block)| CellGraph::from_block(block, (w, h), width))
                    .collect()
            })
            .collect();

        let welded = weld_grid(cells);
        let (graph, defects) = finish(welded);
        self.graph = graph;
        self.defects = defects;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn graph(&self) -> &VoronoiGraph {
        &self.graph
    }

    pub fn vertices(&self) -> &[VoronoiVertex] {
        &self.graph.vertices
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.graph.edges
    }

    /// The block configurations the last build derived, row-major.
    pub fn blocks(&self) -> &[Vec<PixelBlock>] {
        &self.blocks
    }

    /// Defects recorded by the last build.
    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }
}

/// Drops the vertices welding disconnected (the fused corners and any cell
/// that never joined the graph) and compacts indices into the final graph.
fn finish(cell: CellGraph) -> (VoronoiGraph, Vec<Defect>) {
    let mut remap = vec![usize::MAX; cell.points.len()];
    let mut vertices = Vec::new();

    for (idx, &(x, y)) in cell.points.iter().enumerate() {
        if cell.adj[idx].is_empty() {
            continue;
        }
        remap[idx] = vertices.len();
        vertices.push(VoronoiVertex { x, y });
    }

    let mut edges = BTreeSet::new();
    for (idx, list) in cell.adj.iter().enumerate() {
        for &other in list {
            let a = remap[idx];
            let b = remap[other];
            edges.insert((a.min(b), a.max(b)));
        }
    }

    (
        VoronoiGraph {
            vertices,
            edges: edges.into_iter().collect(),
        },
        cell.defects,
    )
}

use std::collections::BTreeSet;
use std::fmt;

use dpx_core::{
    Error, Image, Orientation, Rgb, Ycbcr, classify_edge, crossing_edge, expand_index,
    flatten_point, rgb_to_ycbcr,
};

use crate::filter::EdgeFilters;
use crate::heuristics::{Curves, DissimilarPixels, HeuristicKind, Islands, SparsePixels};

const DX: [isize; 8] = [1, 0, 1, -1, -1, 0, -1, 1];
const DY: [isize; 8] = [0, 1, 1, 1, 0, -1, -1, -1];

/// Directions 0..4 are the canonical edge slots; `dir + 4` is the opposite.
const DIR_EAST: u8 = 0;
const DIR_SOUTH: u8 = 1;
const DIR_SOUTH_EAST: u8 = 2;
const DIR_SOUTH_WEST: u8 = 3;

const CANONICAL_DIRS: usize = 4;

/// Marks accumulated on one lattice edge by the heuristics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeAttr {
    pub dissimilar: bool,
    pub curves_weight: f64,
    pub islands_weight: f64,
    pub sparse_pixels_weight: f64,
}

/// An 8-connected lattice graph over an image, one vertex per pixel.
///
/// Vertex `v` sits at `(v % width, v / width)`. Each vertex owns the four
/// canonical out-edges (east, south, and the two downward diagonals); the
/// other four directions resolve through the neighbor's slots, so every
/// undirected edge is stored exactly once.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    width: usize,
    height: usize,
    pixels: Vec<Ycbcr>,
    present: Vec<u8>,
    attrs: Vec<EdgeAttr>,
}

impl SimilarityGraph {
    /// Builds the full lattice from an RGB image, converting every pixel to
    /// YCbCr.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] when either dimension is zero.
    pub fn build(image: &Image<Rgb>) -> Result<Self, Error> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::EmptyImage);
        }

        let n = image.width() * image.height();
        let mut pixels = Vec::with_capacity(n);
        for y in 0..image.height() {
            for &pixel in image.row(y) {
                pixels.push(rgb_to_ycbcr(pixel));
            }
        }

        let mut graph = Self {
            width: image.width(),
            height: image.height(),
            pixels,
            present: vec![0; n],
            attrs: vec![EdgeAttr::default(); n * CANONICAL_DIRS],
        };

        graph.connect_horizontally();
        graph.connect_vertically();
        graph.connect_forward_diagonally();
        graph.connect_backward_diagonally();

        Ok(graph)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn vertex_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixel(&self, v: usize) -> Ycbcr {
        self.pixels[v]
    }

    /// Runs one heuristic over the graph and folds its marks into the edge
    /// attributes.
    ///
    /// `suppress` filters the graph the heuristic traverses: the weighting
    /// heuristics are expected to run with [`EdgeFilters::DISSIMILAR`] so
    /// dissimilar edges are invisible to them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotFound`] if a mark refers to an edge missing
    /// from the lattice, which indicates a defect in the heuristic itself.
    pub fn apply_heuristic(
        &mut self,
        kind: HeuristicKind,
        suppress: EdgeFilters,
    ) -> Result<(), Error> {
        match kind {
            HeuristicKind::Dissimilar => {
                let mut heuristic = DissimilarPixels::default();
                {
                    let view = FilteredGraph::new(self, suppress);
                    view.for_each_examined_edge(|a, b| heuristic.examine_edge(a, b, &view));
                }
                for (&(a, b), &flag) in heuristic.marks() {
                    let slot = self.edge_slot(a, b).ok_or(Error::EdgeNotFound { a, b })?;
                    self.attrs[slot].dissimilar = flag;
                }
            }
            HeuristicKind::Curves => {
                let mut heuristic = Curves::default();
                {
                    let view = FilteredGraph::new(self, suppress);
                    view.for_each_examined_edge(|a, b| heuristic.examine_edge(a, b, &view));
                }
                self.accumulate(heuristic.marks(), |attr| &mut attr.curves_weight)?;
            }
            HeuristicKind::Islands => {
                let mut heuristic = Islands::default();
                {
                    let view = FilteredGraph::new(self, suppress);
                    view.for_each_examined_edge(|a, b| heuristic.examine_edge(a, b, &view));
                }
                self.accumulate(heuristic.marks(), |attr| &mut attr.islands_weight)?;
            }
            HeuristicKind::SparsePixels => {
                let mut heuristic = SparsePixels::default();
                {
                    let view = FilteredGraph::new(self, suppress);
                    view.for_each_examined_edge(|a, b| heuristic.examine_edge(a, b, &view));
                }
                self.accumulate(heuristic.marks(), |attr| &mut attr.sparse_pixels_weight)?;
            }
        }

        Ok(())
    }

    /// Materializes the surviving edges as `(u, v)` pairs with `u < v`.
    pub fn get_edges(&self, filters: EdgeFilters) -> BTreeSet<(usize, usize)> {
        let view = FilteredGraph::new(self, filters);

        let mut edges = BTreeSet::new();
        for v in 0..self.vertex_count() {
            for dir in 0..CANONICAL_DIRS as u8 {
                if self.present[v] & (1 << dir) == 0 {
                    continue;
                }

                let w = self.step(v, dir).expect("present edge stays in bounds");
                if view.keep(v, w) {
                    edges.insert((v, w));
                }
            }
        }

        edges
    }

    /// The attribute record of the edge `(a, b)`, if connected.
    pub fn attr(&self, a: usize, b: usize) -> Option<&EdgeAttr> {
        self.edge_slot(a, b).map(|slot| &self.attrs[slot])
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edge_slot(a, b).is_some()
    }

    /// All vertices adjacent to `v`, ascending.
    pub fn neighbors_of(&self, v: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = (0..8).filter_map(|dir| self.neighbor(v, dir)).collect();
        neighbors.sort_unstable();
        neighbors
    }

    fn connect_horizontally(&mut self) {
        for h in 0..self.height {
            for w in 1..self.width {
                let prev = flatten_point(w - 1, h, self.width);
                self.present[prev] |= 1 << DIR_EAST;
            }
        }
    }

    fn connect_vertically(&mut self) {
        for w in 0..self.width {
            for h in 1..self.height {
                let prev = flatten_point(w, h - 1, self.width);
                self.present[prev] |= 1 << DIR_SOUTH;
            }
        }
    }

    fn connect_backward_diagonally(&mut self) {
        for h in 1..self.height {
            for w in 1..self.width {
                let prev = flatten_point(w - 1, h - 1, self.width);
                self.present[prev] |= 1 << DIR_SOUTH_EAST;
            }
        }
    }

    fn connect_forward_diagonally(&mut self) {
        for h in 1..self.height {
            for w in 1..self.width {
                let prev = flatten_point(w, h - 1, self.width);
                self.present[prev] |= 1 << DIR_SOUTH_WEST;
            }
        }
    }

    #[inline]
    fn step(&self, v: usize, dir: u8) -> Option<usize> {
        let (x, y) = expand_index(v, self.width);
        let nx = x as isize + DX[dir as usize];
        let ny = y as isize + DY[dir as usize];
        if nx < 0 || ny < 0 || nx >= self.width as isize || ny >= self.height as isize {
            return None;
        }

        Some(flatten_point(nx as usize, ny as usize, self.width))
    }

    /// Neighbor of `v` along `dir` when the connecting edge exists.
    #[inline]
    fn neighbor(&self, v: usize, dir: u8) -> Option<usize> {
        let w = self.step(v, dir)?;
        let (slot_vertex, slot_dir) = if dir < CANONICAL_DIRS as u8 {
            (v, dir)
        } else {
            (w, dir - CANONICAL_DIRS as u8)
        };

        if self.present[slot_vertex] & (1 << slot_dir) != 0 {
            Some(w)
        } else {
            None
        }
    }

    fn edge_slot(&self, a: usize, b: usize) -> Option<usize> {
        for dir in 0..CANONICAL_DIRS as u8 {
            if self.present[a] & (1 << dir) != 0 && self.step(a, dir) == Some(b) {
                return Some(a * CANONICAL_DIRS + dir as usize);
            }
            if self.present[b] & (1 << dir) != 0 && self.step(b, dir) == Some(a) {
                return Some(b * CANONICAL_DIRS + dir as usize);
            }
        }

        None
    }

    fn accumulate(
        &mut self,
        marks: &std::collections::BTreeMap<(usize, usize), f64>,
        field: fn(&mut EdgeAttr) -> &mut f64,
    ) -> Result<(), Error> {
        for (&(a, b), &weight) in marks {
            let slot = self.edge_slot(a, b).ok_or(Error::EdgeNotFound { a, b })?;
            *field(&mut self.attrs[slot]) += weight;
        }

        Ok(())
    }
}

impl fmt::Display for SimilarityGraph {
    /// Adjacency listing, one `idx <-> n1 n2 ...` line per vertex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in 0..self.vertex_count() {
            write!(f, "{v} <->")?;
            for neighbor in self.neighbors_of(v) {
                write!(f, " {neighbor}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A read-only view of the graph with an edge filter applied.
///
/// Heuristics traverse the view, so suppressed edges are invisible to them:
/// they are skipped by the walk, excluded from degrees, and treated as
/// missing by crossing-edge lookups.
pub(crate) struct FilteredGraph<'a> {
    graph: &'a SimilarityGraph,
    filters: EdgeFilters,
}

impl<'a> FilteredGraph<'a> {
    pub(crate) fn new(graph: &'a SimilarityGraph, filters: EdgeFilters) -> Self {
        Self { graph, filters }
    }

    pub(crate) fn width(&self) -> usize {
        self.graph.width
    }

    pub(crate) fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub(crate) fn pixel(&self, v: usize) -> Ycbcr {
        self.graph.pixel(v)
    }

    /// The composite keep-or-remove predicate.
    ///
    /// Dissimilar edges go first; a diagonal with a live crossing partner is
    /// then decided by comparing the enabled weight sums, and an exact tie
    /// removes both members of the pair.
    pub(crate) fn keep(&self, a: usize, b: usize) -> bool {
        let graph = self.graph;

        if self.filters.contains(EdgeFilters::DISSIMILAR)
            && graph.attr(a, b).is_some_and(|attr| attr.dissimilar)
        {
            return false;
        }

        if !self.filters.intersects(EdgeFilters::WEIGHTS) {
            return true;
        }

        if classify_edge(a, b, graph.width) == Orientation::Axis {
            return true;
        }

        let (xa, xb) = crossing_edge(a, b, graph.width);
        let Some(crossing) = graph.attr(xa, xb) else {
            return true;
        };
        if crossing.dissimilar {
            return true;
        }

        let own = graph
            .attr(a, b)
            .map_or(0.0, |attr| self.weight_sum(attr));
        let other = self.weight_sum(crossing);

        if own == other { false } else { own > other }
    }

    fn weight_sum(&self, attr: &EdgeAttr) -> f64 {
        let mut sum = 0.0;
        if self.filters.contains(EdgeFilters::CURVES) {
            sum += attr.curves_weight;
        }
        if self.filters.contains(EdgeFilters::ISLANDS) {
            sum += attr.islands_weight;
        }
        if self.filters.contains(EdgeFilters::SPARSE_PIXELS) {
            sum += attr.sparse_pixels_weight;
        }
        sum
    }

    pub(crate) fn neighbor(&self, v: usize, dir: u8) -> Option<usize> {
        let w = self.graph.neighbor(v, dir)?;
        if self.keep(v, w) { Some(w) } else { None }
    }

    pub(crate) fn degree(&self, v: usize) -> usize {
        (0..8).filter(|&dir| self.neighbor(v, dir).is_some()).count()
    }

    pub(crate) fn has_edge(&self, a: usize, b: usize) -> bool {
        self.graph.has_edge(a, b) && self.keep(a, b)
    }

    /// Depth-first walk presenting every surviving edge once per direction,
    /// mirroring an undirected traversal that examines each vertex's
    /// out-edges.
    pub(crate) fn for_each_examined_edge(&self, mut examine: impl FnMut(usize, usize)) {
        let n = self.vertex_count();
        let mut visited = vec![false; n];
        let mut stack = Vec::new();

        for root in 0..n {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            stack.push(root);

            while let Some(v) = stack.pop() {
                for dir in 0..8 {
                    let Some(w) = self.neighbor(v, dir) else {
                        continue;
                    };

                    examine(v, w);

                    if !visited[w] {
                        visited[w] = true;
                        stack.push(w);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dpx_core::{Image, Rgb};

    use super::SimilarityGraph;
    use crate::filter::EdgeFilters;
    use crate::heuristics::HeuristicKind;

    fn solid(width: usize, height: usize, pixel: Rgb) -> Image<Rgb> {
        Image::new_fill(width, height, pixel)
    }

    #[test]
    fn build_rejects_empty_images() {
        let image = Image::<Rgb>::from_vec(0, 3, Vec::new()).expect("zero-width image");
        assert!(SimilarityGraph::build(&image).is_err());

        let image = Image::<Rgb>::from_vec(3, 0, Vec::new()).expect("zero-height image");
        assert!(SimilarityGraph::build(&image).is_err());
    }

    #[test]
    fn lattice_is_complete() {
        // |E| = H(W-1) + W(H-1) + 2(W-1)(H-1)
        for (width, height) in [(1, 1), (1, 5), (4, 1), (2, 2), (5, 4)] {
            let graph =
                SimilarityGraph::build(&solid(width, height, Rgb::new(9, 9, 9))).expect("built");
            let expected =
                height * (width - 1) + width * (height - 1) + 2 * (width - 1) * (height - 1);

            assert_eq!(graph.vertex_count(), width * height);
            assert_eq!(
                graph.get_edges(EdgeFilters::NONE).len(),
                expected,
                "edge count for {width}x{height}"
            );
        }
    }

    #[test]
    fn three_by_three_adjacency() {
        let graph = SimilarityGraph::build(&solid(3, 3, Rgb::new(255, 255, 255))).expect("built");

        let expected: [&[usize]; 9] = [
            &[1, 3, 4],
            &[0, 2, 3, 4, 5],
            &[1, 4, 5],
            &[0, 1, 4, 6, 7],
            &[0, 1, 2, 3, 5, 6, 7, 8],
            &[1, 2, 4, 7, 8],
            &[3, 4, 7],
            &[3, 4, 5, 6, 8],
            &[4, 5, 7],
        ];

        for (v, adjacent) in expected.iter().enumerate() {
            assert_eq!(graph.neighbors_of(v), *adjacent, "vertex {v}");
        }
        assert_eq!(graph.get_edges(EdgeFilters::NONE).len(), 20);
    }

    #[test]
    fn display_lists_adjacency() {
        let graph = SimilarityGraph::build(&solid(2, 1, Rgb::default())).expect("built");
        assert_eq!(graph.to_string(), "0 <-> 1\n1 <-> 0\n");
    }

    #[test]
    fn equal_weight_crossings_are_both_removed() {
        // A solid image leaves every crossing pair tied at zero weight, so
        // resolving with any weighting filter drops all diagonals.
        let graph = SimilarityGraph::build(&solid(3, 3, Rgb::new(200, 10, 10))).expect("built");

        let edges = graph.get_edges(EdgeFilters::ALL);
        assert_eq!(edges.len(), 12);
        assert!(edges.iter().all(|&(a, b)| b == a + 1 || b == a + 3));
    }

    #[test]
    fn no_filters_keeps_the_full_lattice() {
        let mut graph = SimilarityGraph::build(&solid(3, 3, Rgb::new(1, 2, 3))).expect("built");
        graph
            .apply_heuristic(HeuristicKind::Dissimilar, EdgeFilters::NONE)
            .expect("dissimilar applies");

        assert_eq!(graph.get_edges(EdgeFilters::NONE).len(), 20);
    }
}

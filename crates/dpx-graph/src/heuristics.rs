use std::collections::BTreeMap;

use dpx_core::{Orientation, classify_edge, crossing_edge, expand_index};

use crate::graph::FilteredGraph;

/// Selects which heuristic [`SimilarityGraph::apply_heuristic`] runs.
///
/// [`SimilarityGraph::apply_heuristic`]: crate::SimilarityGraph::apply_heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicKind {
    Dissimilar,
    Curves,
    Islands,
    SparsePixels,
}

/// Channel deltas at or above these bounds make two pixels dissimilar.
const LUMA_BOUND: i16 = 48;
const CB_BOUND: i16 = 7;
const CR_BOUND: i16 = 6;

/// Fixed vote for preserving an edge whose removal would isolate a pixel.
const ISLAND_WEIGHT: f64 = 2.5;

/// How far the sparse-pixels window extends past the crossing pair.
const SEARCH_MARGIN: i64 = 3;

/// Flags edges whose endpoint colors differ perceptibly.
///
/// Marks are keyed by directed vertex pairs: the walk examines each edge
/// from both endpoints and the flag assignment is idempotent either way.
#[derive(Debug, Default)]
pub(crate) struct DissimilarPixels {
    marks: BTreeMap<(usize, usize), bool>,
}

impl DissimilarPixels {
    pub(crate) fn examine_edge(&mut self, a: usize, b: usize, view: &FilteredGraph<'_>) {
        let pa = view.pixel(a);
        let pb = view.pixel(b);

        let delta_y = (pa.y as i16 - pb.y as i16).abs();
        let delta_cb = (pa.cb as i16 - pb.cb as i16).abs();
        let delta_cr = (pa.cr as i16 - pb.cr as i16).abs();

        if delta_y >= LUMA_BOUND || delta_cb >= CB_BOUND || delta_cr >= CR_BOUND {
            self.marks.insert((a, b), true);
        }
    }

    pub(crate) fn marks(&self) -> &BTreeMap<(usize, usize), bool> {
        &self.marks
    }
}

/// Awards the longer of two crossing curve features.
///
/// Each award is half the length difference; the walk visits the edge from
/// both directions, so the winner accumulates the full difference.
#[derive(Debug, Default)]
pub(crate) struct Curves {
    marks: BTreeMap<(usize, usize), f64>,
}

impl Curves {
    pub(crate) fn examine_edge(&mut self, a: usize, b: usize, view: &FilteredGraph<'_>) {
        let width = view.width();
        if classify_edge(a, b, width) == Orientation::Axis {
            return;
        }

        let (xa, xb) = crossing_edge(a, b, width);
        if !view.has_edge(xa, xb) {
            return;
        }

        let own = curve_length(view, a);
        let other = curve_length(view, xa);

        if own > other {
            self.marks.insert((a, b), (own - other) as f64 / 2.0);
        } else if other > own {
            self.marks.insert((xa, xb), (other - own) as f64 / 2.0);
        }
    }

    pub(crate) fn marks(&self) -> &BTreeMap<(usize, usize), f64> {
        &self.marks
    }
}

/// Number of edges in the maximal curve feature through `start`.
///
/// The walk continues only through vertices of degree exactly two and does
/// not count the edge that lands on a terminating vertex. A bare crossing
/// still counts as a curve of one edge.
fn curve_length(view: &FilteredGraph<'_>, start: usize) -> u64 {
    if view.degree(start) != 2 {
        return 1;
    }

    let mut visited = vec![false; view.vertex_count()];
    let mut stack = vec![start];
    visited[start] = true;

    let mut count = 0u64;
    while let Some(v) = stack.pop() {
        for dir in 0..8 {
            let Some(w) = view.neighbor(v, dir) else {
                continue;
            };
            if visited[w] {
                continue;
            }
            visited[w] = true;

            if view.degree(w) == 2 {
                count += 1;
                stack.push(w);
            }
        }
    }

    count.max(1)
}

/// Votes for the diagonal whose removal would isolate a pixel.
#[derive(Debug, Default)]
pub(crate) struct Islands {
    marks: BTreeMap<(usize, usize), f64>,
}

impl Islands {
    pub(crate) fn examine_edge(&mut self, a: usize, b: usize, view: &FilteredGraph<'_>) {
        let width = view.width();
        if classify_edge(a, b, width) == Orientation::Axis {
            return;
        }

        let (xa, xb) = crossing_edge(a, b, width);
        if !view.has_edge(xa, xb) {
            return;
        }

        let own_island = view.degree(a) == 1 || view.degree(b) == 1;
        let other_island = view.degree(xa) == 1 || view.degree(xb) == 1;

        if own_island && !other_island {
            self.marks.insert((a, b), ISLAND_WEIGHT);
        } else if other_island && !own_island {
            self.marks.insert((xa, xb), ISLAND_WEIGHT);
        }
    }

    pub(crate) fn marks(&self) -> &BTreeMap<(usize, usize), f64> {
        &self.marks
    }
}

/// Inclusive pixel bounds of the sparse-pixels search window.
type Extents = (i64, i64, i64, i64);

/// Awards the diagonal living in the sparser local neighborhood.
#[derive(Debug, Default)]
pub(crate) struct SparsePixels {
    marks: BTreeMap<(usize, usize), f64>,
}

impl SparsePixels {
    pub(crate) fn examine_edge(&mut self, a: usize, b: usize, view: &FilteredGraph<'_>) {
        let width = view.width();
        if classify_edge(a, b, width) == Orientation::Axis {
            return;
        }

        let (xa, xb) = crossing_edge(a, b, width);
        if !view.has_edge(xa, xb) {
            return;
        }

        let extents = search_extents([a, b, xa, xb], width);
        let own = component_size(view, a, extents);
        let other = component_size(view, xa, extents);

        if own < other {
            self.marks.insert((a, b), (other - own) as f64 / 2.0);
        } else if other < own {
            self.marks.insert((xa, xb), (own - other) as f64 / 2.0);
        }
    }

    pub(crate) fn marks(&self) -> &BTreeMap<(usize, usize), f64> {
        &self.marks
    }
}

fn search_extents(vertices: [usize; 4], width: usize) -> Extents {
    let mut left = i64::MAX;
    let mut top = i64::MAX;
    let mut right = i64::MIN;
    let mut bottom = i64::MIN;

    for v in vertices {
        let (x, y) = expand_index(v, width);
        left = left.min(x as i64);
        top = top.min(y as i64);
        right = right.max(x as i64);
        bottom = bottom.max(y as i64);
    }

    (
        left - SEARCH_MARGIN,
        top - SEARCH_MARGIN,
        right + SEARCH_MARGIN,
        bottom + SEARCH_MARGIN,
    )
}

fn within_extents(v: usize, extents: Extents, width: usize) -> bool {
    let (x, y) = expand_index(v, width);
    let (left, top, right, bottom) = extents;

    left <= x as i64 && x as i64 <= right && top <= y as i64 && y as i64 <= bottom
}

/// Edges reachable from `start` without leaving the search window.
fn component_size(view: &FilteredGraph<'_>, start: usize, extents: Extents) -> u64 {
    let width = view.width();
    if !within_extents(start, extents, width) {
        return 0;
    }

    let mut visited = vec![false; view.vertex_count()];
    let mut stack = vec![start];
    visited[start] = true;

    let mut count = 0u64;
    while let Some(v) = stack.pop() {
        for dir in 0..8 {
            let Some(w) = view.neighbor(v, dir) else {
                continue;
            };
            if visited[w] || !within_extents(w, extents, width) {
                continue;
            }
            visited[w] = true;
            count += 1;
            stack.push(w);
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use dpx_core::{Image, Rgb};

    use super::HeuristicKind;
    use crate::filter::EdgeFilters;
    use crate::graph::SimilarityGraph;

    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    fn image_from_rows(rows: &[&[Rgb]]) -> Image<Rgb> {
        let height = rows.len();
        let width = rows[0].len();
        let data: Vec<Rgb> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Image::from_vec(width, height, data).expect("consistent fixture rows")
    }

    /// 2x2 checkerboard: both diagonals of the single block survive the
    /// dissimilar filter while every axis edge is cut.
    fn checker2() -> Image<Rgb> {
        image_from_rows(&[&[BLACK, WHITE], &[WHITE, BLACK]])
    }

    #[test]
    fn dissimilar_marks_are_symmetric_and_idempotent() {
        let mut graph = SimilarityGraph::build(&checker2()).expect("built");
        graph
            .apply_heuristic(HeuristicKind::Dissimilar, EdgeFilters::NONE)
            .expect("dissimilar applies");

        // Axis edges join opposite colors; diagonals join equal colors.
        for (a, b) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
            assert!(graph.attr(a, b).expect("edge").dissimilar, "({a}, {b})");
            assert!(graph.attr(b, a).expect("edge").dissimilar, "({b}, {a})");
        }
        assert!(!graph.attr(0, 3).expect("edge").dissimilar);
        assert!(!graph.attr(2, 1).expect("edge").dissimilar);

        let before: Vec<bool> = graph
            .get_edges(EdgeFilters::NONE)
            .into_iter()
            .map(|(a, b)| graph.attr(a, b).expect("edge").dissimilar)
            .collect();

        graph
            .apply_heuristic(HeuristicKind::Dissimilar, EdgeFilters::NONE)
            .expect("dissimilar applies twice");

        let after: Vec<bool> = graph
            .get_edges(EdgeFilters::NONE)
            .into_iter()
            .map(|(a, b)| graph.attr(a, b).expect("edge").dissimilar)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn curves_awards_the_longer_feature() {
        // A black anti-aliasing-free diagonal stroke across a 6x6 white
        // field. Every block along the stroke has a crossing pair: the
        // stroke is a degree-2 chain, the white diagonals terminate
        // immediately in the background blob.
        let mut rows = vec![vec![WHITE; 6]; 6];
        for i in 0..6 {
            rows[i][i] = BLACK;
        }
        let rows: Vec<&[Rgb]> = rows.iter().map(|row| row.as_slice()).collect();
        let mut graph = SimilarityGraph::build(&image_from_rows(&rows)).expect("built");

        graph
            .apply_heuristic(HeuristicKind::Dissimilar, EdgeFilters::NONE)
            .expect("dissimilar applies");
        graph
            .apply_heuristic(HeuristicKind::Curves, EdgeFilters::DISSIMILAR)
            .expect("curves applies");

        // Interior stroke edge (1,1)-(2,2): length 3 from either endpoint
        // against a length-1 white crossing, awarded from both directions.
        assert_eq!(graph.attr(7, 14).expect("edge").curves_weight, 2.0);
        // Terminal stroke edge (0,0)-(1,1): only the interior endpoint sees
        // the length-3 feature, so the award lands once.
        assert_eq!(graph.attr(0, 7).expect("edge").curves_weight, 1.0);
        // The crossing white diagonals win nothing.
        assert_eq!(graph.attr(1, 6).expect("edge").curves_weight, 0.0);
        assert_eq!(graph.attr(8, 13).expect("edge").curves_weight, 0.0);

        // Resolution keeps the stroke and cuts the white crossings.
        let edges = graph.get_edges(EdgeFilters::ALL);
        assert!(edges.contains(&(7, 14)));
        assert!(!edges.contains(&(8, 13)));
        assert!(edges.contains(&(0, 7)));
        assert!(!edges.contains(&(1, 6)));
    }

    #[test]
    fn islands_preserve_single_pixels() {
        // Black pixels at (0,0) and (1,1) in a white 3x3 field: cutting
        // their diagonal would strand (0,0) entirely.
        let mut rows = vec![vec![WHITE; 3]; 3];
        rows[0][0] = BLACK;
        rows[1][1] = BLACK;
        let rows: Vec<&[Rgb]> = rows.iter().map(|row| row.as_slice()).collect();
        let mut graph = SimilarityGraph::build(&image_from_rows(&rows)).expect("built");

        graph
            .apply_heuristic(HeuristicKind::Dissimilar, EdgeFilters::NONE)
            .expect("dissimilar applies");
        graph
            .apply_heuristic(HeuristicKind::Islands, EdgeFilters::DISSIMILAR)
            .expect("islands applies");

        // 2.5 per direction of the undirected visit.
        assert_eq!(graph.attr(0, 4).expect("edge").islands_weight, 5.0);
        assert_eq!(graph.attr(1, 3).expect("edge").islands_weight, 0.0);

        let edges = graph.get_edges(EdgeFilters::ALL);
        assert!(edges.contains(&(0, 4)));
        assert!(!edges.contains(&(1, 3)));
    }

    #[test]
    fn sparse_pixels_favor_the_smaller_component() {
        // A two-pixel black diagonal inside a 4x4 white field. The white
        // component spans 13 edges within the search window, the black one
        // a single edge.
        let mut rows = vec![vec![WHITE; 4]; 4];
        rows[1][1] = BLACK;
        rows[2][2] = BLACK;
        let rows: Vec<&[Rgb]> = rows.iter().map(|row| row.as_slice()).collect();
        let mut graph = SimilarityGraph::build(&image_from_rows(&rows)).expect("built");

        graph
            .apply_heuristic(HeuristicKind::Dissimilar, EdgeFilters::NONE)
            .expect("dissimilar applies");
        graph
            .apply_heuristic(HeuristicKind::SparsePixels, EdgeFilters::DISSIMILAR)
            .expect("sparse pixels applies");

        assert_eq!(graph.attr(5, 10).expect("edge").sparse_pixels_weight, 12.0);
        assert_eq!(graph.attr(6, 9).expect("edge").sparse_pixels_weight, 0.0);

        let edges = graph.get_edges(EdgeFilters::ALL);
        assert!(edges.contains(&(5, 10)));
        assert!(!edges.contains(&(6, 9)));
    }

    #[test]
    fn crossing_resolution_leaves_no_pairs() {
        // Full pipeline over a busy fixture: no two crossing diagonals may
        // both survive.
        let rows: Vec<Vec<Rgb>> = (0..5)
            .map(|y| {
                (0..5)
                    .map(|x| if (x + y) % 2 == 0 { BLACK } else { WHITE })
                    .collect()
            })
            .collect();
        let rows: Vec<&[Rgb]> = rows.iter().map(|row| row.as_slice()).collect();
        let mut graph = SimilarityGraph::build(&image_from_rows(&rows)).expect("built");

        graph
            .apply_heuristic(HeuristicKind::Dissimilar, EdgeFilters::NONE)
            .expect("dissimilar applies");
        graph
            .apply_heuristic(HeuristicKind::Curves, EdgeFilters::DISSIMILAR)
            .expect("curves applies");
        graph
            .apply_heuristic(HeuristicKind::Islands, EdgeFilters::DISSIMILAR)
            .expect("islands applies");
        graph
            .apply_heuristic(HeuristicKind::SparsePixels, EdgeFilters::DISSIMILAR)
            .expect("sparse pixels applies");

        let edges = graph.get_edges(EdgeFilters::ALL);
        for &(a, b) in &edges {
            let (xa, xb) = dpx_core::crossing_edge(a, b, graph.width());
            let crossing = (xa.min(xb), xa.max(xb));
            assert!(
                classify_is_axis(a, b, graph.width()) || !edges.contains(&crossing),
                "({a}, {b}) and its crossing both survived"
            );
        }
    }

    fn classify_is_axis(a: usize, b: usize, width: usize) -> bool {
        dpx_core::classify_edge(a, b, width) == dpx_core::Orientation::Axis
    }
}

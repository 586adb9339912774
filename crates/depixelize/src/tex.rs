//! TikZ serialization of the pipeline's graphs.
//!
//! Pure functions returning a standalone LaTeX document as a `String`;
//! callers own all file I/O. Both serializers flip `y` so the pictures
//! render with the image's top row at the top.

use std::collections::BTreeSet;
use std::fmt::Write;

use dpx_core::{expand_index, ycbcr_to_rgb};
use dpx_graph::SimilarityGraph;
use dpx_voronoi::VoronoiGraph;

const HEADER: &str = "\\documentclass[border=2pt]{standalone}\n\
                      \\usepackage{tikz}\n\
                      \\begin{document}\n";

const FOOTER: &str = "\\end{tikzpicture}\n\\end{document}\n";

/// Renders a similarity graph's surviving edge set over its pixel lattice.
///
/// Every pixel becomes a node filled with its color (converted back from
/// the stored YCbCr), whether or not any of its edges survived.
pub fn similarity_graph_tex(graph: &SimilarityGraph, edges: &BTreeSet<(usize, usize)>) -> String {
    let mut out = String::from(HEADER);

    for v in 0..graph.vertex_count() {
        let color = ycbcr_to_rgb(graph.pixel(v));
        writeln!(
            out,
            "\\definecolor{{px{v}}}{{RGB}}{{{r},{g},{b}}}",
            r = color.r,
            g = color.g,
            b = color.b
        )
        .expect("writing to a String cannot fail");
    }

    out.push_str("\\begin{tikzpicture}\n");
    out.push_str("\\tikzstyle{pixel} = [circle, draw=black!50, inner sep=2pt]\n");

    for v in 0..graph.vertex_count() {
        let (x, y) = expand_index(v, graph.width());
        let flipped = graph.height() - 1 - y;
        writeln!(out, "\\node[pixel, fill=px{v}] (n{v}) at ({x}, {flipped}) {{}};")
            .expect("writing to a String cannot fail");
    }

    for &(a, b) in edges {
        writeln!(out, "\\draw (n{a}) -- (n{b});").expect("writing to a String cannot fail");
    }

    out.push_str(FOOTER);
    out
}

/// Renders the welded Voronoi cell graph.
pub fn voronoi_graph_tex(graph: &VoronoiGraph, height: usize) -> String {
    let mut out = String::from(HEADER);
    out.push_str("\\begin{tikzpicture}\n");
    out.push_str("\\tikzstyle{vertex} = [circle, fill=black, inner sep=1.5pt]\n");

    for (idx, vertex) in graph.vertices.iter().enumerate() {
        let flipped = height as f64 - vertex.y;
        writeln!(
            out,
            "\\node[vertex] (n{idx}) at ({x}, {flipped}) {{}};",
            x = vertex.x
        )
        .expect("writing to a String cannot fail");
    }

    for &(a, b) in &graph.edges {
        writeln!(out, "\\draw (n{a}) -- (n{b});").expect("writing to a String cannot fail");
    }

    out.push_str(FOOTER);
    out
}

use std::collections::BTreeSet;

use dpx_core::{expand_index, flatten_point};

/// A similarity-graph edge, by flattened endpoint indices.
pub type BlockEdge = (usize, usize);

/// The surviving edge configuration of one 2x2 block of pixels.
///
/// ```text
/// TL ─ TR
///  │ X │
/// BL ─ BR
/// ```
///
/// An entry is present iff the edge survived filtering. Crossing resolution
/// guarantees at most one of the two diagonals is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBlock {
    pub left: Option<BlockEdge>,
    pub right: Option<BlockEdge>,
    pub top: Option<BlockEdge>,
    pub bottom: Option<BlockEdge>,
    pub forward_diagonal: Option<BlockEdge>,
    pub back_diagonal: Option<BlockEdge>,
}

impl PixelBlock {
    /// Token string identifying this configuration, in the fixed order
    /// `l r t b [fD] [bD]`.
    pub fn signature(&self) -> String {
        let mut signature = String::new();

        if self.left.is_some() {
            signature.push('l');
        }
        if self.right.is_some() {
            signature.push('r');
        }
        if self.top.is_some() {
            signature.push('t');
        }
        if self.bottom.is_some() {
            signature.push('b');
        }
        if self.forward_diagonal.is_some() {
            signature.push_str("[fD]");
        }
        if self.back_diagonal.is_some() {
            signature.push_str("[bD]");
        }

        signature
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none()
            && self.right.is_none()
            && self.top.is_none()
            && self.bottom.is_none()
            && self.forward_diagonal.is_none()
            && self.back_diagonal.is_none()
    }

    /// Top-left corner of the anchor edge's bounding box, in pixels.
    ///
    /// The anchor is the first present edge in the order left, right, top,
    /// bottom, forward diagonal, back diagonal. Right and bottom anchors sit
    /// on the far side of the block and are pulled back by one pixel so the
    /// reference always names the block's own top-left pixel.
    pub(crate) fn reference_point(&self, width: usize) -> Option<(f64, f64)> {
        let corner = |(s, t): BlockEdge| {
            let (x1, y1) = expand_index(s, width);
            let (x2, y2) = expand_index(t, width);
            (x1.min(x2) as f64, y1.min(y2) as f64)
        };

        if let Some(edge) = self.left {
            return Some(corner(edge));
        }
        if let Some(edge) = self.right {
            let (x, y) = corner(edge);
            return Some((x - 1.0, y));
        }
        if let Some(edge) = self.top {
            return Some(corner(edge));
        }
        if let Some(edge) = self.bottom {
            let (x, y) = corner(edge);
            return Some((x, y - 1.0));
        }
        if let Some(edge) = self.forward_diagonal {
            return Some(corner(edge));
        }
        if let Some(edge) = self.back_diagonal {
            return Some(corner(edge));
        }

        None
    }
}

/// Builds the `(H-1) x (W-1)` grid of block configurations from the
/// surviving edge set. Degenerate lattices (a single row or column) have no
/// blocks at all.
pub fn build_block_grid(
    width: usize,
    height: usize,
    edges: &BTreeSet<(usize, usize)>,
) -> Vec<Vec<PixelBlock>> {
    let mut blocks = Vec::new();
    if width < 2 || height < 2 {
        return blocks;
    }

    for h in 0..height - 1 {
        let mut row = Vec::with_capacity(width - 1);
        for w in 0..width - 1 {
            let top_left = flatten_point(w, h, width);
            let top_right = flatten_point(w + 1, h, width);
            let bottom_left = flatten_point(w, h + 1, width);
            let bottom_right = flatten_point(w + 1, h + 1, width);

            row.push(PixelBlock {
                left: block_edge(edges, top_left, bottom_left),
                right: block_edge(edges, top_right, bottom_right),
                top: block_edge(edges, top_left, top_right),
                bottom: block_edge(edges, bottom_left, bottom_right),
                forward_diagonal: block_edge(edges, bottom_left, top_right),
                back_diagonal: block_edge(edges, top_left, bottom_right),
            });
        }
        blocks.push(row);
    }

    blocks
}

fn block_edge(edges: &BTreeSet<(usize, usize)>, s: usize, t: usize) -> Option<BlockEdge> {
    if edges.contains(&(s, t)) || edges.contains(&(t, s)) {
        Some((s, t))
    } else {
        None
    }
}

//! Voronoi cell reshaping of a resolved similarity graph.
//!
//! Every 2x2 block of pixels records which of its six possible edges
//! survived crossing resolution. The block's edge configuration selects one
//! of three polygonal cell templates, which is rotated and translated into
//! place; the per-block cells are then welded into one planar graph by
//! fusing coincident open corners across block boundaries.
//!
//! Welding reduces rows in parallel and folds the row results sequentially.
//! Each pairwise weld is a pure function of its two inputs, so the reduction
//! shares no mutable state.

mod block;
mod cell;
mod diagram;
mod template;
mod weld;

pub use block::{BlockEdge, PixelBlock, build_block_grid};
pub use cell::Defect;
pub use diagram::{VoronoiDiagram, VoronoiGraph, VoronoiVertex};

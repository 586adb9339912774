use std::collections::BTreeMap;

use serde::Serialize;

use crate::block::PixelBlock;
use crate::template::match_signature;

/// A defect recorded while assembling the diagram. The build completes
/// regardless; defects describe where the output may be missing a
/// connection or a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Defect {
    /// A weld candidate did not have exactly one neighbor at fusion time;
    /// the fusion was skipped.
    WeldDegree { x: f64, y: f64 },
    /// A block's edge configuration matched no known cell; the block
    /// produced no geometry.
    InvalidBlock {
        w: usize,
        h: usize,
        signature: String,
    },
}

/// Weld coordinates keyed in centi-pixels: exact after the two-decimal
/// rounding, and orderable where raw floats are not.
pub(crate) type WeldKey = (i64, i64);

pub(crate) fn weld_key(x: f64, y: f64) -> WeldKey {
    ((x * 100.0).round() as i64, (y * 100.0).round() as i64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A partial Voronoi graph: one block's local cell, or any welded
/// combination of them.
///
/// `welds` is a multi-map from coordinate to the open corners sitting
/// there; entries survive fusion so later welds at the same coordinate are
/// detected (and rejected by the degree precondition).
#[derive(Debug, Clone, Default)]
pub(crate) struct CellGraph {
    pub(crate) points: Vec<(f64, f64)>,
    pub(crate) adj: Vec<Vec<usize>>,
    pub(crate) welds: BTreeMap<WeldKey, Vec<usize>>,
    pub(crate) defects: Vec<Defect>,
}

impl CellGraph {
    /// Instantiates the local cell for one block: template points rotated
    /// about the origin, translated to the block's reference position, and
    /// rounded to two decimals.
    pub(crate) fn from_block(
        block: &PixelBlock,
        grid_pos: (usize, usize),
        width: usize,
    ) -> Self {
        if block.is_empty() {
            return Self::default();
        }

        let (plan, (dx, dy)) = match (match_signature(block), block.reference_point(width)) {
            (Some(plan), Some(reference)) => (plan, reference),
            _ => {
                return Self {
                    defects: vec![Defect::InvalidBlock {
                        w: grid_pos.0,
                        h: grid_pos.1,
                        signature: block.signature(),
                    }],
                    ..Self::default()
                };
            }
        };

        let mut cell = Self::default();
        for &point in plan.template.points {
            // The unit cell is centered on the origin; the half offset puts
            // it back into the top-left quadrant at the reference position.
            let (x, y) = plan.rotation.apply(point);
            cell.points.push((round2(x + dx + 0.5), round2(y + dy + 0.5)));
            cell.adj.push(Vec::new());
        }

        for &(a, b) in plan.template.edges {
            cell.adj[a].push(b);
            cell.adj[b].push(a);
        }

        for &v in plan.template.welds {
            let (x, y) = cell.points[v];
            cell.welds.entry(weld_key(x, y)).or_default().push(v);
        }

        cell
    }
}

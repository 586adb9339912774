use rayon::prelude::*;

use crate::cell::{CellGraph, Defect, WeldKey};

/// Welds two partial graphs into one.
///
/// The right-hand side's vertices are appended after the left's; every
/// coordinate present in both weld maps then has its open corners fused:
/// the two coincident vertices are cleared and their former neighbors are
/// joined directly. A candidate that is not an open corner (exactly one
/// neighbor) fails the precondition; the fusion is skipped and recorded.
pub(crate) fn weld(lhs: CellGraph, rhs: CellGraph) -> CellGraph {
    let offset = lhs.points.len();

    let mut points = lhs.points;
    let mut adj = lhs.adj;
    let mut defects = lhs.defects;
    let lhs_welds = lhs.welds;

    points.extend(rhs.points.iter().copied());
    adj.extend(
        rhs.adj
            .iter()
            .map(|list| list.iter().map(|&v| v + offset).collect::<Vec<usize>>()),
    );
    defects.extend(rhs.defects.iter().cloned());

    for (key, rhs_corners) in &rhs.welds {
        let Some(lhs_corners) = lhs_welds.get(key) else {
            continue;
        };
        let lhs_corner = lhs_corners[0];

        for &rhs_corner in rhs_corners {
            fuse(&mut adj, &mut defects, *key, lhs_corner, rhs_corner + offset);
        }
    }

    let mut welds = lhs_welds;
    for (key, rhs_corners) in rhs.welds {
        welds
            .entry(key)
            .or_default()
            .extend(rhs_corners.into_iter().map(|v| v + offset));
    }

    CellGraph {
        points,
        adj,
        welds,
        defects,
    }
}

fn fuse(adj: &mut [Vec<usize>], defects: &mut Vec<Defect>, key: WeldKey, lhs: usize, rhs: usize) {
    if adj[lhs].len() != 1 || adj[rhs].len() != 1 {
        defects.push(Defect::WeldDegree {
            x: key.0 as f64 / 100.0,
            y: key.1 as f64 / 100.0,
        });
        return;
    }

    let lhs_target = adj[lhs][0];
    let rhs_target = adj[rhs][0];

    adj[lhs].clear();
    adj[rhs].clear();
    adj[lhs_target].retain(|&v| v != lhs);
    adj[rhs_target].retain(|&v| v != rhs);

    adj[lhs_target].push(rhs_target);
    adj[rhs_target].push(lhs_target);
}

/// Reduces the grid of local cells into one welded graph: rows fold
/// left-to-right in parallel, then the row results fold top-to-bottom.
pub(crate) fn weld_grid(cells: Vec<Vec<CellGraph>>) -> CellGraph {
    let rows: Vec<CellGraph> = cells
        .into_par_iter()
        .map(|row| row.into_iter().fold(CellGraph::default(), weld))
        .collect();

    rows.into_iter().fold(CellGraph::default(), weld)
}

use std::collections::BTreeSet;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dpx_voronoi::VoronoiDiagram;

/// Axis lattice with a sprinkling of diagonals, mimicking resolved output.
fn synthetic_edges(width: usize, height: usize) -> BTreeSet<(usize, usize)> {
    let mut edges = BTreeSet::new();

    for y in 0..height {
        for x in 0..width {
            let v = y * width + x;
            if x + 1 < width {
                edges.insert((v, v + 1));
            }
            if y + 1 < height {
                edges.insert((v, v + width));
            }
            if x + 1 < width && y + 1 < height && (x + y) % 7 == 0 {
                edges.remove(&(v, v + 1));
                edges.remove(&(v, v + width));
                edges.insert((v, v + width + 1));
            }
        }
    }

    edges
}

fn bench_weld(c: &mut Criterion) {
    let width = 96;
    let height = 96;
    let edges = synthetic_edges(width, height);

    c.bench_function("dpx_voronoi_build_96x96", |b| {
        b.iter(|| {
            let mut diagram = VoronoiDiagram::new(width, height);
            diagram.build(black_box(&edges));
            black_box((diagram.vertices().len(), diagram.edges().len()));
        });
    });
}

criterion_group!(benches, bench_weld);
criterion_main!(benches);

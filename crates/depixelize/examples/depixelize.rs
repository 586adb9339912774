//! Example: depixelize a sprite into its reshaped cell graph.
//!
//! Loads a raster (PNG, GIF, BMP, ...), runs the full pipeline, and writes
//! the requested artifacts next to the chosen output directory:
//! `<stem>_similarity.tex`, `<stem>_voronoi.tex`, and `<stem>_voronoi.json`.
//! Per-phase timing is printed with `--verbose`.
//!
//! Run from the workspace root:
//!   cargo run -p depixelize --example depixelize -- --help
//!   cargo run -p depixelize --example depixelize -- sprite.png --voronoi-graph

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use serde::Serialize;

use depixelize::tex::{similarity_graph_tex, voronoi_graph_tex};
use depixelize::{
    Defect, EdgeFilters, HeuristicKind, Image, Rgb, SimilarityGraph, VoronoiDiagram, VoronoiGraph,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Depixelize pixel art into a Voronoi cell graph")]
struct Args {
    /// The input image to depixelize
    input: PathBuf,

    /// Destination directory for the output files
    #[arg(long, short = 'o', default_value = ".")]
    out: PathBuf,

    /// Also write the similarity graph as a .tex file
    #[arg(long)]
    similarity_graph: bool,

    /// Also write the voronoi graph as a .tex file
    #[arg(long)]
    voronoi_graph: bool,

    /// Write the voronoi graph and build defects as JSON
    #[arg(long)]
    json: bool,

    /// Display per-phase timings
    #[arg(long, short)]
    verbose: bool,
}

// ── JSON DTO ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DiagramDto<'a> {
    width: usize,
    height: usize,
    edge_count: usize,
    graph: &'a VoronoiGraph,
    defects: &'a [Defect],
}

fn main() -> Result<()> {
    let args = Args::parse();

    let decoded = ImageReader::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?
        .decode()
        .with_context(|| format!("decoding {}", args.input.display()))?
        .to_rgb8();

    let (width, height) = (decoded.width() as usize, decoded.height() as usize);
    let pixels: Vec<Rgb> = decoded
        .pixels()
        .map(|px| Rgb::new(px.0[0], px.0[1], px.0[2]))
        .collect();
    let image = Image::from_vec(width, height, pixels).context("assembling the pixel grid")?;

    if args.verbose {
        println!("-- image [width: {width}\theight: {height}] loaded");
    }

    let total = Instant::now();

    let build_started = Instant::now();
    let mut graph = SimilarityGraph::build(&image).context("building the similarity graph")?;
    if args.verbose {
        println!("-- similarity graph built in {:?}", build_started.elapsed());
    }

    let heuristics_started = Instant::now();
    graph
        .apply_heuristic(HeuristicKind::Dissimilar, EdgeFilters::NONE)
        .context("applying the dissimilar-pixels heuristic")?;
    graph
        .apply_heuristic(HeuristicKind::Curves, EdgeFilters::DISSIMILAR)
        .context("applying the curves heuristic")?;
    graph
        .apply_heuristic(HeuristicKind::Islands, EdgeFilters::DISSIMILAR)
        .context("applying the islands heuristic")?;
    graph
        .apply_heuristic(HeuristicKind::SparsePixels, EdgeFilters::DISSIMILAR)
        .context("applying the sparse-pixels heuristic")?;
    let edges = graph.get_edges(EdgeFilters::ALL);
    if args.verbose {
        println!(
            "-- heuristics resolved {} edges in {:?}",
            edges.len(),
            heuristics_started.elapsed()
        );
    }

    let weld_started = Instant::now();
    let mut voronoi = VoronoiDiagram::new(width, height);
    voronoi.build(&edges);
    if args.verbose {
        println!(
            "-- voronoi graph ({} vertices, {} defects) built in {:?}",
            voronoi.vertices().len(),
            voronoi.defects().len(),
            weld_started.elapsed()
        );
    }

    let stem = args
        .input
        .file_stem()
        .context("input path has no file name")?
        .to_string_lossy();

    if args.similarity_graph {
        let path = args.out.join(format!("{stem}_similarity.tex"));
        fs::write(&path, similarity_graph_tex(&graph, &edges))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }

    if args.voronoi_graph {
        let path = args.out.join(format!("{stem}_voronoi.tex"));
        fs::write(&path, voronoi_graph_tex(voronoi.graph(), height))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }

    if args.json {
        let dto = DiagramDto {
            width,
            height,
            edge_count: edges.len(),
            graph: voronoi.graph(),
            defects: voronoi.defects(),
        };
        let path = args.out.join(format!("{stem}_voronoi.json"));
        let json = serde_json::to_string_pretty(&dto).context("serializing the diagram")?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }

    for defect in voronoi.defects() {
        eprintln!("defect: {defect:?}");
    }

    if args.verbose {
        println!("-- total execution time: {:?}", total.elapsed());
    }

    Ok(())
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Offline tool that converts an obstacle bitmap into an arena map description.

mod map_export;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use arena_system_builder::{Config, GraphBuilder};
use clap::Parser;

/// Command-line arguments accepted by the bitmap converter.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Binary PPM (P6) bitmap describing obstacles and spawn points.
    input: PathBuf,

    /// Destination for the JSON map description; defaults to the input path
    /// with a `.json` extension.
    output: Option<PathBuf>,

    /// Seed of the generator used while growing the graph.
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum distance in pixels between sampled nodes.
    #[arg(long)]
    min_separation: Option<f64>,

    /// Samples drawn before graph growth gives up.
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Indent the emitted JSON.
    #[arg(long)]
    pretty: bool,

    /// Reload the written file through the runtime loader before exiting.
    #[arg(long)]
    verify: bool,
}

impl Args {
    fn builder_config(&self) -> Config {
        let mut config = Config::default();
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(min_separation) = self.min_separation {
            config = config.with_min_separation(min_separation);
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        config
    }
}

/// Entry point for the bitmap converter.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| map_export::default_output_path(&args.input));

    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read bitmap {}", args.input.display()))?;
    let map = GraphBuilder::new(args.builder_config())
        .build_ppm(&bytes)
        .with_context(|| format!("failed to build map from {}", args.input.display()))?;
    log::info!(
        "built {} nodes, {} edges and {} obstacle rectangles",
        map.graph.len(),
        map.edge_count(),
        map.bounds.len()
    );

    let json = map_export::encode(&map, args.pretty).context("failed to encode map description")?;
    fs::write(&output, &json)
        .with_context(|| format!("failed to write map description {}", output.display()))?;
    log::info!("wrote {}", output.display());

    if args.verify {
        let written = fs::read_to_string(&output)
            .with_context(|| format!("failed to reread {}", output.display()))?;
        let reloaded = map_export::decode(&written)
            .with_context(|| format!("failed to parse {}", output.display()))?;
        match map_export::verify(reloaded)
            .with_context(|| format!("runtime rejected {}", output.display()))?
        {
            Some(root) => log::info!("verified: primary spawn roots at node {root}"),
            None => log::warn!("verified: no node can see the primary spawn"),
        }
    }

    Ok(())
}

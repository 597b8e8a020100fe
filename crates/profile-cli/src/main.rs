//! Render the elevation profile of a flight plan to a PNG file.

use anyhow::{Context, Result};
use clap::Parser;
use profile_core::Route;
use profile_engine::{
    total_distance_m, Config, ProfileEngine, ProfileSurface, RefreshOutcome, TileStore,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(about = "Render a flight plan's elevation profile to a PNG")]
struct Args {
    /// Plan file: a JSON array of waypoints
    plan: PathBuf,

    /// Output image path
    #[arg(short, long, default_value = "profile.png")]
    out: PathBuf,

    /// DEM tile base URL, overrides PROFILE_TILE_URL
    #[arg(long)]
    tile_url: Option<String>,

    /// Logical chart width in points
    #[arg(long)]
    width: Option<u32>,

    /// Logical chart height in points
    #[arg(long)]
    height: Option<u32>,

    /// Device pixel ratio to scale the backing buffer by
    #[arg(long)]
    scale: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(url) = args.tile_url {
        config.tile_base_url = url;
    }
    if let Some(width) = args.width {
        config.surface_width = width;
    }
    if let Some(height) = args.height {
        config.surface_height = height;
    }
    if let Some(scale) = args.scale {
        config.scale_factor = scale;
    }

    let plan = fs::read_to_string(&args.plan)
        .with_context(|| format!("reading plan {}", args.plan.display()))?;
    let route: Route = serde_json::from_str(&plan).context("parsing plan JSON")?;

    let store = TileStore::new(
        config.tile_base_url.clone(),
        config.request_timeout,
        config.cache_max_tiles,
    );
    let engine = ProfileEngine::new(store);
    let mut surface = ProfileSurface::new(
        config.surface_width,
        config.surface_height,
        config.scale_factor,
    );

    let outcome = engine
        .refresh_and_present(&route, &mut surface)
        .await
        .context("rendering profile")?;

    match &outcome {
        RefreshOutcome::Profile(samples) => tracing::info!(
            samples = samples.len(),
            total_m = total_distance_m(samples),
            cached_tiles = engine.source().cached_tiles(),
            "profile rendered"
        ),
        other => tracing::warn!(?other, "profile not rendered, placeholder written"),
    }

    let (width, height) = surface.pixel_dimensions();
    image::save_buffer(
        &args.out,
        surface.buffer(),
        width,
        height,
        image::ExtendedColorType::Rgb8,
    )
    .with_context(|| format!("writing {}", args.out.display()))?;
    tracing::info!(out = %args.out.display(), width, height, "image written");

    Ok(())
}

//! Engine configuration from environment.

use std::env;
use std::time::Duration;

/// Default DEM tile endpoint, `{base}/{z}/{x}/{y}.png`.
pub const DEFAULT_TILE_URL: &str = "https://cyberjapandata.gsi.go.jp/xyz/dem_png";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the DEM tile host.
    pub tile_base_url: String,
    /// Per-request timeout for tile GETs.
    pub request_timeout: Duration,
    /// Decoded-tile cache cap; `None` keeps tiles for the process lifetime.
    pub cache_max_tiles: Option<usize>,
    /// Logical surface size in points.
    pub surface_width: u32,
    pub surface_height: u32,
    /// Device pixel ratio the backing buffer is scaled by.
    pub scale_factor: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            tile_base_url: env::var("PROFILE_TILE_URL")
                .unwrap_or_else(|_| DEFAULT_TILE_URL.to_string()),
            request_timeout: Duration::from_secs(
                env::var("PROFILE_TILE_TIMEOUT_S")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            cache_max_tiles: env::var("PROFILE_TILE_CACHE_MAX")
                .ok()
                .and_then(|s| s.parse().ok()),
            surface_width: env::var("PROFILE_SURFACE_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(900),
            surface_height: env::var("PROFILE_SURFACE_HEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
            scale_factor: env::var("PROFILE_SCALE_FACTOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_base_url: DEFAULT_TILE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            cache_max_tiles: None,
            surface_width: 900,
            surface_height: 300,
            scale_factor: 1.0,
        }
    }
}

//! Elevation tile cache and fetcher.

use crate::error::TileError;
use crate::sampler::{ElevationSource, DEM_ZOOM};
use dashmap::DashMap;
use profile_core::{decode_elevation, mercator, TileKey};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A raster tile decoded to an RGBA pixel buffer, immutable once built.
#[derive(Debug)]
pub struct DecodedTile {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedTile {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB channels of the pixel at (x, y). Coordinates are clamped to the
    /// tile edge so a projection landing on the seam still reads a pixel.
    pub fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = ((y * self.width + x) * 4) as usize;
        (self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2])
    }
}

#[derive(Debug, Clone)]
struct TileEntry {
    fetched_at: Instant,
    tile: Arc<DecodedTile>,
}

/// Fetches DEM tiles over HTTP and caches the decoded buffers by tile key.
///
/// Concurrent requests for the same key are not deduplicated: each miss
/// issues its own fetch and the last decode wins the cache slot. Tile
/// volume per editing session is small enough that the simplification is
/// cheaper than single-flight bookkeeping.
pub struct TileStore {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    cache: DashMap<TileKey, TileEntry>,
    max_entries: Option<usize>,
}

impl TileStore {
    /// Create a store fetching from `base_url` (`{base}/{z}/{x}/{y}.png`).
    ///
    /// `max_entries = None` keeps every decoded tile for the process
    /// lifetime; a cap prunes the oldest-fetched entries past it.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration, max_entries: Option<usize>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            request_timeout,
            cache: DashMap::new(),
            max_entries,
        }
    }

    /// Number of decoded tiles currently cached.
    pub fn cached_tiles(&self) -> usize {
        self.cache.len()
    }

    fn tile_url(&self, key: TileKey) -> String {
        format!(
            "{}/{}/{}/{}.png",
            self.base_url.trim_end_matches('/'),
            key.zoom,
            key.x,
            key.y
        )
    }

    /// Return the decoded tile for `key`, fetching and decoding on a miss.
    pub async fn tile(&self, key: TileKey) -> Result<Arc<DecodedTile>, TileError> {
        if let Some(entry) = self.cache.get(&key) {
            return Ok(entry.tile.clone());
        }

        let url = self.tile_url(key);
        tracing::debug!(%url, "fetching DEM tile");
        let response = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(TileError::Status {
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let decoded = image::load_from_memory(&bytes)?.into_rgba8();
        let tile = Arc::new(DecodedTile::new(
            decoded.width(),
            decoded.height(),
            decoded.into_raw(),
        ));

        self.cache.insert(
            key,
            TileEntry {
                fetched_at: Instant::now(),
                tile: tile.clone(),
            },
        );
        if let Some(max) = self.max_entries {
            prune_tiles(&self.cache, max);
        }

        Ok(tile)
    }
}

impl ElevationSource for TileStore {
    async fn elevation_at(&self, lat: f64, lon: f64) -> Result<Option<f64>, TileError> {
        let pixel = mercator::project(lat, lon, DEM_ZOOM);
        let tile = self.tile(pixel.key).await?;
        let (r, g, b) = tile.rgb(pixel.px, pixel.py);
        Ok(decode_elevation(r, g, b))
    }
}

/// Drop oldest-fetched entries until the cache is back under `max_entries`.
fn prune_tiles(cache: &DashMap<TileKey, TileEntry>, max_entries: usize) {
    if cache.len() <= max_entries {
        return;
    }

    let mut entries: Vec<(TileKey, Instant)> = cache
        .iter()
        .map(|entry| (*entry.key(), entry.value().fetched_at))
        .collect();
    entries.sort_by_key(|(_, fetched_at)| *fetched_at);

    for (key, _) in entries {
        if cache.len() <= max_entries {
            break;
        }
        tracing::debug!(?key, "evicting DEM tile");
        cache.remove(&key);
    }
}

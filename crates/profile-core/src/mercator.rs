//! Spherical Web-Mercator tile projection.

use std::f64::consts::PI;

/// Edge length of a raster tile in pixels.
pub const TILE_SIZE_PX: u32 = 256;

/// Identifies one raster elevation tile in the XYZ scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

/// A tile together with a pixel offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePixel {
    pub key: TileKey,
    /// Column within the tile, 0..TILE_SIZE_PX
    pub px: u32,
    /// Row within the tile, 0..TILE_SIZE_PX
    pub py: u32,
}

/// Project a geographic position onto the tile grid at `zoom`.
///
/// Standard Web-Mercator tiling transform. Undefined for |lat| >= ~85.05
/// degrees where Mercator diverges; flight routes stay far inside that band
/// so the caller is expected to guard, not this function.
pub fn project(lat: f64, lon: f64, zoom: u8) -> TilePixel {
    let n = 2f64.powi(i32::from(zoom));
    let x = (lon + 180.0) / 360.0 * n;
    let lat_rad = lat.to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

    let tile_x = x.floor();
    let tile_y = y.floor();
    TilePixel {
        key: TileKey {
            zoom,
            x: tile_x as u32,
            y: tile_y as u32,
        },
        px: ((x - tile_x) * f64::from(TILE_SIZE_PX)).floor() as u32,
        py: ((y - tile_y) * f64::from(TILE_SIZE_PX)).floor() as u32,
    }
}

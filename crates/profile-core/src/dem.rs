//! Pixel-to-elevation decoding for the DEM tile provider's PNG encoding.

/// Sentinel pixel value meaning "no elevation data".
const NO_DATA_LOW: u32 = 0;
/// All-white sentinel, also "no elevation data".
const NO_DATA_HIGH: u32 = 0xFF_FF_FF;

/// Decode one RGB pixel of a DEM tile to a signed elevation in meters.
///
/// The provider packs `value = r * 65536 + g * 256 + b` and maps it
/// linearly to `value / 10 - 10000`, giving roughly -10000 m to +6553.5 m
/// at 0.1 m resolution. The two sentinel triples decode to `None`. This is
/// the specific provider's contract, not a general raster elevation format.
pub fn decode_elevation(r: u8, g: u8, b: u8) -> Option<f64> {
    let value = u32::from(r) * 65536 + u32::from(g) * 256 + u32::from(b);
    if value == NO_DATA_LOW || value == NO_DATA_HIGH {
        return None;
    }
    Some(f64::from(value) / 10.0 - 10000.0)
}

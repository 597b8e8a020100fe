pub mod dem;
pub mod geodesy;
pub mod mercator;
pub mod models;

pub use dem::decode_elevation;
pub use geodesy::{haversine_distance, lerp, EARTH_RADIUS_M};
pub use mercator::{project, TileKey, TilePixel, TILE_SIZE_PX};
pub use models::{Route, Sample, Waypoint, WaypointKind};

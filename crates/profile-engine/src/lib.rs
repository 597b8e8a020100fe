//! Elevation-profile engine for the VTOL route editor.
//!
//! Given an ordered route of waypoints, the engine samples ground elevation
//! along it from remote raster DEM tiles, interpolates the planned flight
//! altitude at every sample and renders a 2-D profile chart. Refreshes are
//! versioned with a generation counter so results of superseded refreshes
//! are dropped instead of overwriting newer ones.

pub mod chart;
pub mod config;
pub mod error;
pub mod refresh;
pub mod sampler;
pub mod tiles;

pub use chart::ProfileSurface;
pub use config::Config;
pub use error::{RenderError, TileError};
pub use refresh::{
    present, ProfileEngine, RefreshOutcome, MSG_COMPUTING, MSG_FETCH_FAILED, MSG_INSUFFICIENT,
};
pub use sampler::{sample_route, total_distance_m, ElevationSource, DEM_ZOOM, SAMPLE_SPACING_M};
pub use tiles::{DecodedTile, TileStore};

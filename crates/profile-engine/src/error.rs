//! Engine error types.
//!
//! Failures are contained at the smallest scope that can absorb them: a
//! tile error degrades one sample, never the whole route; only total
//! failure reaches the user, and then only as a placeholder message.

use thiserror::Error;

/// Failure to produce a decoded tile for one tile key.
#[derive(Debug, Error)]
pub enum TileError {
    /// The tile host answered with a non-success status.
    #[error("tile request failed with HTTP {status}")]
    Status { status: u16 },
    /// The request never completed (connect, timeout, body read).
    #[error("tile request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body was not a decodable image.
    #[error("tile decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Failure while drawing onto the profile surface.
#[derive(Debug, Error)]
#[error("profile rendering failed: {0}")]
pub struct RenderError(pub(crate) String);

impl RenderError {
    pub(crate) fn from_draw<E: std::fmt::Display>(err: E) -> Self {
        RenderError(err.to_string())
    }
}

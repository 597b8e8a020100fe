//! Core data models for route editing and profile sampling.

use serde::{Deserialize, Serialize};

/// Role of a waypoint within a VTOL flight plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    /// Vertical departure point
    Takeoff,
    /// Rotary-to-fixed-wing transition
    TransitionToFixed,
    /// Cruise leg waypoint
    Transit,
    /// Fixed-wing-to-rotary transition
    TransitionToRotary,
    /// Vertical arrival point
    Landing,
}

/// A single editable point of a flight route.
///
/// Owned by the route collection; the profile engine only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub kind: WaypointKind,
    /// Latitude in decimal degrees, [-90, 90]
    pub lat: f64,
    /// Longitude in decimal degrees, [-180, 180]
    pub lon: f64,
    /// Planned flight altitude in meters, >= 0
    pub altitude_m: f64,
    #[serde(default)]
    pub note: String,
}

/// An ordered flight route. Insertion order defines path direction.
pub type Route = Vec<Waypoint>;

/// A single point of the sampled elevation profile.
///
/// Produced transiently per refresh and consumed by the renderer; never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Cumulative distance from the route start, non-decreasing.
    pub distance_m: f64,
    pub lat: f64,
    pub lon: f64,
    /// Ground elevation under the sample, `None` when the covering tile
    /// could not be fetched or decoded to a value.
    pub ground_elevation_m: Option<f64>,
    /// Planned flight altitude interpolated between the segment endpoints.
    pub planned_altitude_m: f64,
}

//! Walks the route and produces the evenly spaced elevation samples the
//! renderer consumes.

use crate::error::TileError;
use profile_core::{geodesy, Sample, Waypoint};

/// Zoom level every ground lookup projects to.
pub const DEM_ZOOM: u8 = 14;
/// Target spacing between consecutive samples along a segment.
pub const SAMPLE_SPACING_M: f64 = 80.0;

/// Resolves ground elevation for a geographic position.
///
/// `Ok(None)` means the covering pixel carried the provider's no-data
/// sentinel; `Err` means the tile itself could not be fetched or decoded.
#[allow(async_fn_in_trait)]
pub trait ElevationSource {
    async fn elevation_at(&self, lat: f64, lon: f64) -> Result<Option<f64>, TileError>;
}

/// Sample the route at roughly [`SAMPLE_SPACING_M`] intervals.
///
/// Each consecutive waypoint pair contributes `max(1, ceil(dist / 80))`
/// steps; the shared boundary sample is emitted once. A failed ground
/// lookup degrades that sample's elevation to `None` and sampling
/// continues; one bad tile never aborts the rest of the route.
pub async fn sample_route<S: ElevationSource>(source: &S, route: &[Waypoint]) -> Vec<Sample> {
    let mut samples = Vec::new();
    let mut traveled_m = 0.0;

    for (index, pair) in route.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        let segment_m = geodesy::haversine_distance(from.lat, from.lon, to.lat, to.lon);
        let steps = ((segment_m / SAMPLE_SPACING_M).ceil() as usize).max(1);

        for step in 0..=steps {
            // The segment start coincides with the previous segment's end.
            if step == 0 && index > 0 {
                continue;
            }
            let t = step as f64 / steps as f64;
            let lat = geodesy::lerp(from.lat, to.lat, t);
            let lon = geodesy::lerp(from.lon, to.lon, t);
            let ground_elevation_m = match source.elevation_at(lat, lon).await {
                Ok(elevation) => elevation,
                Err(err) => {
                    tracing::warn!(lat, lon, error = %err, "ground lookup failed, sample degraded");
                    None
                }
            };
            samples.push(Sample {
                distance_m: traveled_m + segment_m * t,
                lat,
                lon,
                ground_elevation_m,
                planned_altitude_m: geodesy::lerp(from.altitude_m, to.altitude_m, t),
            });
        }

        traveled_m += segment_m;
    }

    samples
}

/// Total route distance covered by a sampled series.
pub fn total_distance_m(samples: &[Sample]) -> f64 {
    samples.last().map(|s| s.distance_m).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_core::WaypointKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource {
        elevation: Option<f64>,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(elevation: Option<f64>) -> Self {
            Self {
                elevation,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ElevationSource for FixedSource {
        async fn elevation_at(&self, _lat: f64, _lon: f64) -> Result<Option<f64>, TileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.elevation)
        }
    }

    struct FailingSource;

    impl ElevationSource for FailingSource {
        async fn elevation_at(&self, _lat: f64, _lon: f64) -> Result<Option<f64>, TileError> {
            Err(TileError::Status { status: 503 })
        }
    }

    fn wp(id: &str, lat: f64, lon: f64, altitude_m: f64) -> Waypoint {
        Waypoint {
            id: id.to_string(),
            kind: WaypointKind::Transit,
            lat,
            lon,
            altitude_m,
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn two_waypoint_route_interpolates_altitude_over_distance() {
        let source = FixedSource::new(Some(12.5));
        let route = vec![wp("a", 35.0, 139.0, 100.0), wp("b", 35.001, 139.001, 150.0)];
        let samples = sample_route(&source, &route).await;

        let segment_m = geodesy::haversine_distance(35.0, 139.0, 35.001, 139.001);
        assert!(samples.len() >= 2);
        assert_eq!(samples[0].distance_m, 0.0);
        assert!((total_distance_m(&samples) - segment_m).abs() < 1e-6);
        assert_eq!(samples[0].planned_altitude_m, 100.0);
        assert_eq!(samples.last().unwrap().planned_altitude_m, 150.0);
        for pair in samples.windows(2) {
            assert!(pair[1].distance_m >= pair[0].distance_m);
            assert!(pair[1].planned_altitude_m >= pair[0].planned_altitude_m);
        }
        assert!(samples.iter().all(|s| s.ground_elevation_m == Some(12.5)));
    }

    #[tokio::test]
    async fn segment_boundaries_are_sampled_once() {
        let source = FixedSource::new(Some(0.0));
        // Two segments of ~143 m each: ceil(143/80) = 2 steps per segment,
        // so 1 + 2 + 2 samples with the shared boundary emitted once.
        let route = vec![
            wp("a", 35.0, 139.0, 100.0),
            wp("b", 35.001, 139.001, 120.0),
            wp("c", 35.002, 139.002, 140.0),
        ];
        let samples = sample_route(&source, &route).await;

        assert_eq!(samples.len(), 5);
        assert_eq!(samples.len(), source.calls.load(Ordering::SeqCst));
        for pair in samples.windows(2) {
            assert!(pair[1].distance_m > pair[0].distance_m);
        }
    }

    #[tokio::test]
    async fn cumulative_distance_matches_segment_sum() {
        let source = FixedSource::new(None);
        let route = vec![
            wp("a", 35.0, 139.0, 50.0),
            wp("b", 35.003, 139.0, 50.0),
            wp("c", 35.003, 139.004, 50.0),
        ];
        let samples = sample_route(&source, &route).await;

        let expected: f64 = route
            .windows(2)
            .map(|p| geodesy::haversine_distance(p[0].lat, p[0].lon, p[1].lat, p[1].lon))
            .sum();
        assert!((total_distance_m(&samples) - expected).abs() < 1e-6);
    }

    #[tokio::test]
    async fn short_segment_still_produces_one_step() {
        let source = FixedSource::new(Some(3.0));
        // ~1 m apart, far below the 80 m spacing
        let route = vec![wp("a", 35.0, 139.0, 10.0), wp("b", 35.000009, 139.0, 10.0)];
        let samples = sample_route(&source, &route).await;
        assert_eq!(samples.len(), 2);
    }

    #[tokio::test]
    async fn failed_lookups_degrade_samples_without_aborting() {
        let route = vec![wp("a", 35.0, 139.0, 100.0), wp("b", 35.001, 139.001, 150.0)];
        let samples = sample_route(&FailingSource, &route).await;

        assert!(samples.len() >= 2);
        assert!(samples.iter().all(|s| s.ground_elevation_m.is_none()));
        // Planned altitude is always interpolated, even with no terrain.
        assert_eq!(samples.last().unwrap().planned_altitude_m, 150.0);
    }

    #[tokio::test]
    async fn empty_and_single_waypoint_routes_produce_no_samples() {
        let source = FixedSource::new(Some(1.0));
        assert!(sample_route(&source, &[]).await.is_empty());
        assert!(sample_route(&source, &[wp("a", 35.0, 139.0, 10.0)]).await.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}

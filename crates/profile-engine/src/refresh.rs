//! Versioned refresh orchestration.
//!
//! Every refresh captures a token from a generation counter owned by the
//! engine. After the (suspending) sampling pass the token is compared to
//! the live counter; a mismatch means a newer refresh started in the
//! meantime and this result is dropped without touching the surface. That
//! is the only ordering guarantee the editor needs: edits may overlap
//! freely and only the most recently requested refresh affects the output.
//! In-flight tile fetches of superseded refreshes run to completion and
//! simply land in the shared cache.

use crate::chart::ProfileSurface;
use crate::error::RenderError;
use crate::sampler::{sample_route, ElevationSource};
use profile_core::{Sample, Waypoint};
use std::sync::atomic::{AtomicU64, Ordering};

/// Placeholder shown when the route cannot produce a profile yet.
pub const MSG_INSUFFICIENT: &str = "Add at least two waypoints to see the elevation profile";
/// Placeholder shown optimistically while sampling is in flight.
pub const MSG_COMPUTING: &str = "Computing elevation profile...";
/// Placeholder shown when no sample got a ground elevation.
pub const MSG_FETCH_FAILED: &str = "Terrain data fetch failed";

/// Result of one refresh invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Route has fewer than two waypoints; no sampling was attempted.
    Insufficient,
    /// A newer refresh started while this one was sampling; the result
    /// must not reach the surface.
    Superseded,
    /// Sampling finished but every ground elevation is unavailable.
    TerrainUnavailable,
    /// The finished sample series, ready to render.
    Profile(Vec<Sample>),
}

/// Orchestrates profile refreshes over an elevation source.
pub struct ProfileEngine<S> {
    source: S,
    generation: AtomicU64,
}

impl<S: ElevationSource> ProfileEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    /// Run one refresh against a read-only route snapshot.
    ///
    /// Suspends while sampling; the caller decides what to do with the
    /// outcome (usually [`present`] it).
    pub async fn refresh(&self, route: &[Waypoint]) -> RefreshOutcome {
        let token = self.begin();
        if route.len() < 2 {
            tracing::info!(token, waypoints = route.len(), "route too short for a profile");
            return RefreshOutcome::Insufficient;
        }

        tracing::info!(token, waypoints = route.len(), "profile refresh started");
        let samples = sample_route(&self.source, route).await;

        if !self.is_current(token) {
            tracing::info!(token, "profile refresh superseded, dropping result");
            return RefreshOutcome::Superseded;
        }

        if samples.iter().all(|s| s.ground_elevation_m.is_none()) {
            tracing::warn!(token, samples = samples.len(), "no terrain data for any sample");
            return RefreshOutcome::TerrainUnavailable;
        }

        tracing::info!(token, samples = samples.len(), "profile refresh finished");
        RefreshOutcome::Profile(samples)
    }

    /// Convenience for callers that own the surface: draws the optimistic
    /// "computing" placeholder, refreshes, then presents the outcome.
    pub async fn refresh_and_present(
        &self,
        route: &[Waypoint],
        surface: &mut ProfileSurface,
    ) -> Result<RefreshOutcome, RenderError> {
        if route.len() >= 2 {
            surface.render_placeholder(MSG_COMPUTING)?;
        }
        let outcome = self.refresh(route).await;
        present(&outcome, surface)?;
        Ok(outcome)
    }
}

/// Apply a refresh outcome to the surface.
///
/// A superseded outcome leaves the surface untouched.
pub fn present(outcome: &RefreshOutcome, surface: &mut ProfileSurface) -> Result<(), RenderError> {
    match outcome {
        RefreshOutcome::Insufficient => surface.render_placeholder(MSG_INSUFFICIENT),
        RefreshOutcome::Superseded => Ok(()),
        RefreshOutcome::TerrainUnavailable => surface.render_placeholder(MSG_FETCH_FAILED),
        RefreshOutcome::Profile(samples) => surface.render_profile(samples),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TileError;
    use profile_core::WaypointKind;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedSource {
        elevation: Option<f64>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl FixedSource {
        fn new(elevation: Option<f64>) -> Self {
            Self {
                elevation,
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn slow(elevation: f64, delay: Duration) -> Self {
            Self {
                elevation: Some(elevation),
                calls: AtomicUsize::new(0),
                delay,
            }
        }
    }

    impl ElevationSource for FixedSource {
        async fn elevation_at(&self, _lat: f64, _lon: f64) -> Result<Option<f64>, TileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.elevation)
        }
    }

    struct FailingSource;

    impl ElevationSource for FailingSource {
        async fn elevation_at(&self, _lat: f64, _lon: f64) -> Result<Option<f64>, TileError> {
            Err(TileError::Status { status: 500 })
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

    fn short_route() -> Vec<Waypoint> {
        vec![wp("a", 35.0, 139.0, 100.0), wp("b", 35.001, 139.001, 150.0)]
    }

    #[tokio::test]
    async fn single_waypoint_route_reports_insufficient_without_fetching() {
        let engine = ProfileEngine::new(FixedSource::new(Some(10.0)));
        let outcome = engine.refresh(&[wp("a", 35.0, 139.0, 100.0)]).await;
        assert_eq!(outcome, RefreshOutcome::Insufficient);
        assert_eq!(engine.source().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn healthy_route_produces_a_profile() {
        let engine = ProfileEngine::new(FixedSource::new(Some(42.0)));
        match engine.refresh(&short_route()).await {
            RefreshOutcome::Profile(samples) => {
                assert!(samples.len() >= 2);
                assert!(samples.iter().all(|s| s.ground_elevation_m == Some(42.0)));
            }
            other => panic!("expected profile, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn total_fetch_failure_reports_terrain_unavailable() {
        let engine = ProfileEngine::new(FailingSource);
        let outcome = engine.refresh(&short_route()).await;
        assert_eq!(outcome, RefreshOutcome::TerrainUnavailable);
    }

    #[tokio::test]
    async fn no_data_terrain_reports_terrain_unavailable() {
        let engine = ProfileEngine::new(FixedSource::new(None));
        let outcome = engine.refresh(&short_route()).await;
        assert_eq!(outcome, RefreshOutcome::TerrainUnavailable);
    }

    #[tokio::test]
    async fn superseded_refresh_drops_its_result() {
        let engine = Arc::new(ProfileEngine::new(FixedSource::slow(
            7.0,
            Duration::from_millis(40),
        )));

        let first = {
            let engine = engine.clone();
            let route = short_route();
            tokio::spawn(async move { engine.refresh(&route).await })
        };
        // Let the first refresh pass its token capture, then start a newer one.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = {
            let engine = engine.clone();
            let route = short_route();
            tokio::spawn(async move { engine.refresh(&route).await })
        };

        assert_eq!(first.await.unwrap(), RefreshOutcome::Superseded);
        match second.await.unwrap() {
            RefreshOutcome::Profile(samples) => assert!(!samples.is_empty()),
            other => panic!("expected newest refresh to win, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn presenting_a_superseded_outcome_leaves_the_surface_untouched() {
        let mut surface = ProfileSurface::new(64, 32, 1.0);
        let before = surface.buffer().to_vec();
        present(&RefreshOutcome::Superseded, &mut surface).unwrap();
        assert_eq!(surface.buffer(), &before[..]);
    }
}

//! Traffic state store and the per-tick mutation applied to it.

use rand::Rng;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Congestion, Incident, RouteMetrics, TrafficState};

/// Minimum simulated route speed, in mph.
pub const SPEED_MIN: u32 = 25;

/// Maximum simulated route speed, in mph.
pub const SPEED_MAX: u32 = 75;

/// Probability that a tick replaces a route's incident list.
const INCIDENT_RESAMPLE_PROB: f64 = 0.1;

/// Shared traffic state with a single mutation entry point.
///
/// The broadcast loop is the only writer; all other components read owned
/// snapshots via [`TrafficStore::snapshot`]. Routes are fixed for the
/// lifetime of the process.
pub struct TrafficStore {
    routes: RwLock<TrafficState>,
}

impl TrafficStore {
    /// Create a store seeded with the baseline demo routes.
    pub fn new() -> Self {
        Self::with_routes(baseline_routes())
    }

    /// Create a store over an arbitrary route set.
    pub fn with_routes(routes: TrafficState) -> Self {
        Self {
            routes: RwLock::new(routes),
        }
    }

    /// Resample every route's metrics in place.
    ///
    /// Speed and congestion are redrawn on every tick; the incident list is
    /// replaced only with [`INCIDENT_RESAMPLE_PROB`] probability and kept
    /// otherwise.
    pub async fn tick(&self) {
        let mut routes = self.routes.write().await;
        let mut rng = rand::thread_rng();
        for metrics in routes.values_mut() {
            mutate_route(metrics, &mut rng);
        }
        debug!(routes = routes.len(), "resampled traffic state");
    }

    /// Owned copy of the current state, safe to serialize while the updater
    /// keeps running.
    pub async fn snapshot(&self) -> TrafficState {
        self.routes.read().await.clone()
    }
}

impl Default for TrafficStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Baseline routes the demo starts with.
fn baseline_routes() -> TrafficState {
    let mut routes = TrafficState::new();
    routes.insert(
        "I-95".to_string(),
        RouteMetrics {
            speed: 65,
            congestion: Congestion::Low,
            incidents: Vec::new(),
        },
    );
    routes.insert(
        "I-495".to_string(),
        RouteMetrics {
            speed: 45,
            congestion: Congestion::Medium,
            incidents: vec![Incident::Construction],
        },
    );
    routes.insert(
        "US-1".to_string(),
        RouteMetrics {
            speed: 35,
            congestion: Congestion::High,
            incidents: vec![Incident::Accident],
        },
    );
    routes
}

/// Resample a single route's metrics.
fn mutate_route(metrics: &mut RouteMetrics, rng: &mut impl Rng) {
    metrics.speed = rng.gen_range(SPEED_MIN..=SPEED_MAX);
    metrics.congestion = match rng.gen_range(0..3) {
        0 => Congestion::Low,
        1 => Congestion::Medium,
        _ => Congestion::High,
    };
    if rng.gen_bool(INCIDENT_RESAMPLE_PROB) {
        metrics.incidents = match rng.gen_range(0..3) {
            0 => Vec::new(),
            1 => vec![Incident::Construction],
            _ => vec![Incident::Accident],
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;

    fn assert_valid(metrics: &RouteMetrics) {
        assert!(
            (SPEED_MIN..=SPEED_MAX).contains(&metrics.speed),
            "speed {} out of range",
            metrics.speed
        );
        assert!(matches!(
            metrics.congestion,
            Congestion::Low | Congestion::Medium | Congestion::High
        ));
    }

    #[test]
    fn baseline_routes_match_demo_values() {
        let routes = baseline_routes();
        assert_eq!(routes.len(), 3);
        assert_eq!(routes["I-95"].speed, 65);
        assert_eq!(routes["I-495"].speed, 45);
        assert_eq!(routes["US-1"].speed, 35);
        assert_eq!(routes["I-95"].congestion, Congestion::Low);
        assert_eq!(routes["I-495"].incidents, vec![Incident::Construction]);
        assert_eq!(routes["US-1"].incidents, vec![Incident::Accident]);
    }

    #[tokio::test]
    async fn tick_keeps_route_set_and_value_ranges() {
        let store = TrafficStore::new();
        store.tick().await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 3);
        for name in ["I-95", "I-495", "US-1"] {
            let metrics = snapshot.get(name).expect("route missing after tick");
            assert_valid(metrics);
        }
    }

    #[tokio::test]
    async fn snapshot_is_detached_from_later_ticks() {
        let store = TrafficStore::new();
        let before = store.snapshot().await;

        for _ in 0..10 {
            store.tick().await;
        }

        assert_eq!(before, baseline_routes());
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_json() {
        let store = TrafficStore::new();
        store.tick().await;

        let snapshot = store.snapshot().await;
        let encoded = serde_json::to_string(&snapshot).unwrap();
        let decoded: TrafficState = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, snapshot);
        for metrics in decoded.values() {
            assert_valid(metrics);
        }
    }

    #[test]
    fn metrics_serialize_with_lowercase_tags() {
        let metrics = RouteMetrics {
            speed: 65,
            congestion: Congestion::Low,
            incidents: vec![Incident::Construction, Incident::Accident],
        };

        assert_eq!(
            serde_json::to_value(&metrics).unwrap(),
            json!({
                "speed": 65,
                "congestion": "low",
                "incidents": ["construction", "accident"],
            })
        );
    }

    #[test]
    fn incident_resample_rate_is_near_ten_percent() {
        const TRIALS: u32 = 20_000;

        let mut rng = StdRng::seed_from_u64(42);
        let mut resampled = 0u32;
        for _ in 0..TRIALS {
            // Two incidents is not a resample outcome, so any shrink below
            // two tags means the incident list was replaced this tick.
            let mut metrics = RouteMetrics {
                speed: 50,
                congestion: Congestion::Low,
                incidents: vec![Incident::Construction, Incident::Accident],
            };
            mutate_route(&mut metrics, &mut rng);
            if metrics.incidents.len() < 2 {
                resampled += 1;
            }
        }

        let rate = f64::from(resampled) / f64::from(TRIALS);
        assert!(
            (0.08..=0.12).contains(&rate),
            "resample rate {rate} outside expected band"
        );
    }

    proptest! {
        #[test]
        fn mutation_always_yields_in_range_values(speed in 0u32..500, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut metrics = RouteMetrics {
                speed,
                congestion: Congestion::High,
                incidents: Vec::new(),
            };

            mutate_route(&mut metrics, &mut rng);

            prop_assert!((SPEED_MIN..=SPEED_MAX).contains(&metrics.speed));
            prop_assert!(metrics.incidents.len() <= 1);
        }
    }
}

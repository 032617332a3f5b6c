//! Traffic data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Coarse traffic-density classification for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Congestion {
    Low,
    Medium,
    High,
}

/// A disruption event tagged on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Incident {
    Construction,
    Accident,
}

/// Current metrics for a single route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Simulated average speed in mph.
    pub speed: u32,
    pub congestion: Congestion,
    pub incidents: Vec<Incident>,
}

/// Mapping from route identifier to its current metrics.
///
/// Serializes as a JSON object keyed by route name, which is the wire shape
/// both the push channel and the chat prompt use.
pub type TrafficState = BTreeMap<String, RouteMetrics>;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A point in decimal degrees, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "lon")]
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn offset(self, d_lng: f64, d_lat: f64) -> Self {
        Self {
            lng: self.lng + d_lng,
            lat: self.lat + d_lat,
        }
    }
}

/// Caller-supplied route endpoint. The name is carried for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub lat: f64,
    #[serde(alias = "lon")]
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Endpoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            name: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lng, self.lat)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Driving,
    Flying,
    Walking,
    Transit,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Driving,
        TransportMode::Flying,
        TransportMode::Walking,
        TransportMode::Transit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Driving => "driving",
            TransportMode::Flying => "flying",
            TransportMode::Walking => "walking",
            TransportMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        TransportMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == lowered)
            .ok_or_else(|| UnknownVariant {
                kind: "transport mode",
                value: s.to_string(),
            })
    }
}

/// Graph search used to connect source and destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    #[serde(alias = "astar")]
    AStar,
    Dijkstra,
    Bfs,
    Dfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::AStar,
        Algorithm::Dijkstra,
        Algorithm::Bfs,
        Algorithm::Dfs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::AStar => "a-star",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a-star" | "astar" | "a*" => Ok(Algorithm::AStar),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            _ => Err(UnknownVariant {
                kind: "algorithm",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteOptions {
    pub avoid_highways: bool,
    pub avoid_tolls: bool,
    pub scenic: bool,
    pub fastest_route: bool,
    pub transport_mode: TransportMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_speed_kmh: Option<f64>,
}

/// Body of `POST /api/routes/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub source: Endpoint,
    pub destination: Endpoint,
    /// Falls back to the server's default algorithm when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,
    #[serde(default)]
    pub transport_mode: TransportMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_speed_kmh: Option<f64>,
}

impl RouteRequest {
    pub fn options(&self) -> RouteOptions {
        RouteOptions {
            transport_mode: self.transport_mode,
            avg_speed_kmh: self.avg_speed_kmh,
            ..RouteOptions::default()
        }
    }
}

/// Body of `POST /api/routes/preferences`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    pub source: Endpoint,
    pub destination: Endpoint,
    #[serde(default)]
    pub preferences: RouteOptions,
}

/// Computed route: path, distance in meters, estimated time in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub path: Vec<Coordinate>,
    #[serde(rename = "distance")]
    pub distance_m: f64,
    #[serde(rename = "estimatedTime")]
    pub estimated_time_s: f64,
    pub speed_kmh: f64,
    pub algorithm: Algorithm,
    pub transport_mode: TransportMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    #[serde(flatten)]
    pub route: RouteDescriptor,
    pub gpx_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<RouteOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEnvelope {
    pub success: bool,
    pub route: RouteResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

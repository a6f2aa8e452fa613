use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::{
    models::{Algorithm, RouteDescriptor, RouteOptions, TransportMode},
    search::SearchResult,
};

pub const DEFAULT_SPEED_KMH: f64 = 50.0;
pub const FLIGHT_SPEED_KMH: f64 = 800.0;
const FASTEST_ROUTE_FACTOR: f64 = 1.2;
const SCENIC_ROUTE_FACTOR: f64 = 0.8;

/// Default cruising speed per transport mode, in km/h.
static MODE_SPEEDS_KMH: Lazy<HashMap<TransportMode, f64>> = Lazy::new(|| {
    HashMap::from([
        (TransportMode::Driving, DEFAULT_SPEED_KMH),
        (TransportMode::Flying, FLIGHT_SPEED_KMH),
        (TransportMode::Walking, 5.0),
        (TransportMode::Transit, 35.0),
    ])
});

pub fn mode_speed_kmh(mode: TransportMode) -> f64 {
    MODE_SPEEDS_KMH
        .get(&mode)
        .copied()
        .unwrap_or(DEFAULT_SPEED_KMH)
}

/// Travel speed for a route.
///
/// An explicit `avg_speed_kmh` overrides the mode default. `fastest_route`
/// takes precedence over `scenic`, and flying is always 800 km/h.
pub fn effective_speed_kmh(options: &RouteOptions) -> f64 {
    if options.transport_mode == TransportMode::Flying {
        return FLIGHT_SPEED_KMH;
    }

    let base = options
        .avg_speed_kmh
        .filter(|speed| speed.is_finite() && *speed > 0.0)
        .unwrap_or_else(|| mode_speed_kmh(options.transport_mode));

    if options.fastest_route {
        base * FASTEST_ROUTE_FACTOR
    } else if options.scenic {
        base * SCENIC_ROUTE_FACTOR
    } else {
        base
    }
}

pub fn travel_time_s(distance_m: f64, speed_kmh: f64) -> f64 {
    distance_m / 1000.0 / (speed_kmh / 3600.0)
}

pub fn assemble(
    result: SearchResult,
    algorithm: Algorithm,
    options: &RouteOptions,
) -> RouteDescriptor {
    let speed_kmh = effective_speed_kmh(options);
    let distance_m = result.cost;

    RouteDescriptor {
        path: result.path,
        distance_m,
        estimated_time_s: travel_time_s(distance_m, speed_kmh),
        speed_kmh,
        algorithm,
        transport_mode: options.transport_mode,
    }
}

pub use shared::{
    Algorithm, ApiError, Coordinate, Endpoint, PreferencesRequest, RouteDescriptor,
    RouteEnvelope, RouteOptions, RouteRequest, RouteResponse, TransportMode,
};

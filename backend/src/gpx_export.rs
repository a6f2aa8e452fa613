use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::RouteError;
use crate::models::{Coordinate, RouteDescriptor};

const CREATOR: &str = "waypoint-planner";

/// Encode a computed route as a base64 GPX 1.1 track for offline use.
pub fn encode_route_as_gpx(route: &RouteDescriptor) -> Result<String, RouteError> {
    let name = format!("{} route ({})", route.algorithm, route.transport_mode);
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };

    let mut track = Track {
        name: Some(name),
        ..Default::default()
    };
    let mut segment = TrackSegment::new();
    segment.points.extend(route.path.iter().map(to_waypoint));
    track.segments.push(segment);
    gpx.tracks.push(track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

fn to_waypoint(coord: &Coordinate) -> Waypoint {
    Waypoint::new(Point::new(coord.lng, coord.lat))
}

use crate::graph::VertexKey;
use crate::models::Coordinate;

use RoadType::{Highway, Normal};
use ScenicStatus::{NotScenic, Scenic};
use TollStatus::{NoToll, Toll};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadType {
    Normal,
    Highway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TollStatus {
    Toll,
    NoToll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenicStatus {
    Scenic,
    NotScenic,
}

/// Road attributes attached to a synthesized intermediate point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadTags {
    pub road: RoadType,
    pub toll: TollStatus,
    pub scenic: ScenicStatus,
}

impl RoadTags {
    pub const fn new(road: RoadType, toll: TollStatus, scenic: ScenicStatus) -> Self {
        Self { road, toll, scenic }
    }

    pub fn is_highway(&self) -> bool {
        self.road == RoadType::Highway
    }

    pub fn is_toll(&self) -> bool {
        self.toll == TollStatus::Toll
    }

    pub fn is_scenic(&self) -> bool {
        self.scenic == ScenicStatus::Scenic
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub coord: Coordinate,
    pub tags: Option<RoadTags>,
}

impl Waypoint {
    pub fn endpoint(coord: Coordinate) -> Self {
        Self { coord, tags: None }
    }

    pub fn tagged(coord: Coordinate, tags: RoadTags) -> Self {
        Self {
            coord,
            tags: Some(tags),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Source,
    Destination,
}

struct LatticePoint {
    anchor: Anchor,
    d_lng: f64,
    d_lat: f64,
    tags: RoadTags,
}

/// Intermediate points, in route order. The first four hang off the source,
/// the last two lead into the destination.
const LATTICE: [LatticePoint; 6] = [
    LatticePoint {
        anchor: Anchor::Source,
        d_lng: 0.01,
        d_lat: 0.01,
        tags: RoadTags::new(Normal, NoToll, NotScenic),
    },
    LatticePoint {
        anchor: Anchor::Source,
        d_lng: 0.02,
        d_lat: 0.015,
        tags: RoadTags::new(Highway, Toll, NotScenic),
    },
    LatticePoint {
        anchor: Anchor::Source,
        d_lng: 0.018,
        d_lat: 0.02,
        tags: RoadTags::new(Normal, NoToll, Scenic),
    },
    LatticePoint {
        anchor: Anchor::Source,
        d_lng: 0.025,
        d_lat: 0.025,
        tags: RoadTags::new(Highway, NoToll, NotScenic),
    },
    LatticePoint {
        anchor: Anchor::Destination,
        d_lng: -0.015,
        d_lat: -0.01,
        tags: RoadTags::new(Normal, NoToll, Scenic),
    },
    LatticePoint {
        anchor: Anchor::Destination,
        d_lng: -0.005,
        d_lat: -0.005,
        tags: RoadTags::new(Normal, NoToll, NotScenic),
    },
];

/// Length of the synthesized route when no lattice point lands on an endpoint.
pub const WAYPOINT_COUNT: usize = LATTICE.len() + 2;

/// Stand-in for a road network query: the source, six tagged points on a
/// fixed offset lattice, then the destination.
///
/// Endpoints are never tagged: a lattice point that falls exactly on the
/// source or destination is dropped. The output depends only on the two
/// inputs, so repeated calls produce the same graph.
pub fn synthesize(source: Coordinate, destination: Coordinate) -> Vec<Waypoint> {
    let endpoint_keys = [VertexKey::of(source), VertexKey::of(destination)];

    let mut waypoints = Vec::with_capacity(WAYPOINT_COUNT);
    waypoints.push(Waypoint::endpoint(source));

    waypoints.extend(
        LATTICE
            .iter()
            .map(|point| {
                let base = match point.anchor {
                    Anchor::Source => source,
                    Anchor::Destination => destination,
                };
                Waypoint::tagged(base.offset(point.d_lng, point.d_lat), point.tags)
            })
            .filter(|waypoint| !endpoint_keys.contains(&VertexKey::of(waypoint.coord))),
    );

    waypoints.push(Waypoint::endpoint(destination));
    waypoints
}

use std::{collections::HashMap, fmt};

use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::{
    distance::great_circle_m,
    models::{Coordinate, RouteOptions},
    waypoints::{RoadTags, Waypoint},
};

const HIGHWAY_PENALTY: f64 = 1.5;
const TOLL_PENALTY: f64 = 2.0;
const SCENIC_BONUS: f64 = 0.8;

/// Exact identity of a vertex, taken from the bit patterns of its coordinate.
///
/// Two coordinates share a key only when both components are bitwise equal
/// (with `-0.0` folded into `0.0`), so nearby points never alias the way a
/// rendered `"lng,lat"` string can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey {
    lng_bits: u64,
    lat_bits: u64,
}

impl VertexKey {
    pub fn of(coord: Coordinate) -> Self {
        Self {
            lng_bits: normalized_bits(coord.lng),
            lat_bits: normalized_bits(coord.lat),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(f64::from_bits(self.lng_bits), f64::from_bits(self.lat_bits))
    }
}

impl From<Coordinate> for VertexKey {
    fn from(coord: Coordinate) -> Self {
        Self::of(coord)
    }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coord = self.coordinate();
        write!(f, "{},{}", coord.lng, coord.lat)
    }
}

fn normalized_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// The road preferences that change edge weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub avoid_highways: bool,
    pub avoid_tolls: bool,
    pub scenic: bool,
}

impl Preferences {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn from_options(options: &RouteOptions) -> Self {
        Self {
            avoid_highways: options.avoid_highways,
            avoid_tolls: options.avoid_tolls,
            scenic: options.scenic,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// Multiplier for an edge entering a point with the given tags.
    pub fn factor(&self, tags: Option<RoadTags>) -> f64 {
        let Some(tags) = tags else {
            return 1.0;
        };

        let mut factor = 1.0;
        if self.avoid_highways && tags.is_highway() {
            factor *= HIGHWAY_PENALTY;
        }
        if self.avoid_tolls && tags.is_toll() {
            factor *= TOLL_PENALTY;
        }
        if self.scenic && tags.is_scenic() {
            factor *= SCENIC_BONUS;
        }
        factor
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight {
        from: VertexKey,
        to: VertexKey,
        weight: f64,
    },
    #[error("graph has no vertex at {0}")]
    UnknownVertex(VertexKey),
}

/// Directed, weighted graph over waypoints. Weights are meters after
/// preference scaling and are always finite and non-negative.
#[derive(Debug, Clone, Default)]
pub struct WaypointGraph {
    graph: DiGraph<Waypoint, f64>,
    index: HashMap<VertexKey, NodeIndex>,
}

impl WaypointGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect every pair of distinct waypoints in both directions.
    ///
    /// The weight of `u -> v` is the great-circle distance scaled by the
    /// preference factor of `v`'s tags. Waypoints sharing a coordinate collapse
    /// into the first one seen.
    pub fn build(waypoints: &[Waypoint], preferences: Preferences) -> Self {
        let mut graph = Self::new();
        for waypoint in waypoints {
            graph.add_vertex(*waypoint);
        }

        let vertices: Vec<NodeIndex> = graph.graph.node_indices().collect();
        for &from in &vertices {
            for &to in &vertices {
                if from == to {
                    continue;
                }
                let source = graph.graph[from];
                let target = graph.graph[to];
                let weight =
                    great_circle_m(source.coord, target.coord) * preferences.factor(target.tags);
                graph.graph.update_edge(from, to, weight);
            }
        }

        tracing::debug!(
            "built waypoint graph: {} vertices, {} edges, preferences {:?}",
            graph.vertex_count(),
            graph.edge_count(),
            preferences
        );

        graph
    }

    /// Insert a vertex, or return the existing one with the same key.
    pub fn add_vertex(&mut self, waypoint: Waypoint) -> NodeIndex {
        let key = VertexKey::of(waypoint.coord);
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(waypoint);
        self.index.insert(key, idx);
        idx
    }

    /// Insert or replace the directed edge `from -> to`.
    pub fn add_edge(
        &mut self,
        from: VertexKey,
        to: VertexKey,
        weight: f64,
    ) -> Result<(), GraphError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight { from, to, weight });
        }
        let from_idx = self.index_of(from).ok_or(GraphError::UnknownVertex(from))?;
        let to_idx = self.index_of(to).ok_or(GraphError::UnknownVertex(to))?;
        self.graph.update_edge(from_idx, to_idx, weight);
        Ok(())
    }

    pub fn index_of(&self, key: VertexKey) -> Option<NodeIndex> {
        self.index.get(&key).copied()
    }

    pub fn waypoint(&self, idx: NodeIndex) -> Option<&Waypoint> {
        self.graph.node_weight(idx)
    }

    pub fn coordinate(&self, idx: NodeIndex) -> Option<Coordinate> {
        self.waypoint(idx).map(|waypoint| waypoint.coord)
    }

    /// Outgoing edges of `idx` as `(target, weight)`, in vertex insertion
    /// order. Unknown indices have no neighbours.
    pub fn neighbours(&self, idx: NodeIndex) -> Vec<(NodeIndex, f64)> {
        if self.graph.node_weight(idx).is_none() {
            return Vec::new();
        }
        let mut out: Vec<(NodeIndex, f64)> = self
            .graph
            .edges(idx)
            .map(|edge| (edge.target(), *edge.weight()))
            .collect();
        out.sort_by_key(|(target, _)| *target);
        out
    }

    pub fn weight(&self, from: NodeIndex, to: NodeIndex) -> Option<f64> {
        self.graph
            .find_edge(from, to)
            .and_then(|edge| self.graph.edge_weight(edge))
            .copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waypoints::{synthesize, WAYPOINT_COUNT};

    fn sf_waypoints() -> Vec<Waypoint> {
        synthesize(
            Coordinate::new(-122.41, 37.77),
            Coordinate::new(-122.39, 37.78),
        )
    }

    #[test]
    fn fully_connected_without_self_loops() {
        let graph = WaypointGraph::build(&sf_waypoints(), Preferences::neutral());

        assert_eq!(graph.vertex_count(), WAYPOINT_COUNT);
        assert_eq!(graph.edge_count(), WAYPOINT_COUNT * (WAYPOINT_COUNT - 1));
        for i in 0..WAYPOINT_COUNT {
            let idx = NodeIndex::new(i);
            let neighbours = graph.neighbours(idx);
            assert_eq!(neighbours.len(), WAYPOINT_COUNT - 1);
            assert!(neighbours.iter().all(|(target, _)| *target != idx));
            assert!(neighbours.iter().all(|(_, w)| *w >= 0.0));
        }
    }

    #[test]
    fn neutral_weights_are_symmetric() {
        let graph = WaypointGraph::build(&sf_waypoints(), Preferences::neutral());
        let a = NodeIndex::new(1);
        let b = NodeIndex::new(5);
        let ab = graph.weight(a, b).unwrap();
        let ba = graph.weight(b, a).unwrap();
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn neighbours_follow_insertion_order() {
        let graph = WaypointGraph::build(&sf_waypoints(), Preferences::neutral());
        let targets: Vec<usize> = graph
            .neighbours(NodeIndex::new(3))
            .into_iter()
            .map(|(target, _)| target.index())
            .collect();
        assert_eq!(targets, vec![0, 1, 2, 4, 5, 6, 7]);
    }

    #[test]
    fn toll_penalty_uses_target_tags() {
        let waypoints = sf_waypoints();
        let neutral = WaypointGraph::build(&waypoints, Preferences::neutral());
        let avoid = WaypointGraph::build(
            &waypoints,
            Preferences {
                avoid_tolls: true,
                ..Preferences::neutral()
            },
        );

        // Waypoint 2 is the only toll point.
        let into_toll = (NodeIndex::new(0), NodeIndex::new(2));
        let out_of_toll = (NodeIndex::new(2), NodeIndex::new(0));

        let base = neutral.weight(into_toll.0, into_toll.1).unwrap();
        assert!((avoid.weight(into_toll.0, into_toll.1).unwrap() - base * 2.0).abs() < 1e-6);
        assert!(
            (avoid.weight(out_of_toll.0, out_of_toll.1).unwrap()
                - neutral.weight(out_of_toll.0, out_of_toll.1).unwrap())
            .abs()
                < 1e-9
        );
    }

    #[test]
    fn factors_compose() {
        let all = Preferences {
            avoid_highways: true,
            avoid_tolls: true,
            scenic: true,
        };
        let tags = RoadTags::new(
            crate::waypoints::RoadType::Highway,
            crate::waypoints::TollStatus::Toll,
            crate::waypoints::ScenicStatus::Scenic,
        );
        assert!((all.factor(Some(tags)) - 1.5 * 2.0 * 0.8).abs() < 1e-12);
        assert_eq!(all.factor(None), 1.0);
        assert_eq!(Preferences::neutral().factor(Some(tags)), 1.0);
        assert!(Preferences::neutral().is_neutral());
        assert!(!all.is_neutral());
    }

    #[test]
    fn identical_endpoints_collapse() {
        let point = Coordinate::new(2.35, 48.85);
        let graph = WaypointGraph::build(&synthesize(point, point), Preferences::neutral());
        assert_eq!(graph.vertex_count(), WAYPOINT_COUNT - 1);
        assert_eq!(graph.index_of(VertexKey::of(point)), Some(NodeIndex::new(0)));
    }

    #[test]
    fn endpoint_vertices_carry_no_tags() {
        let source = Coordinate::new(0.0, 0.0);
        let destination = Coordinate::new(0.02, 0.015);
        let avoid = Preferences {
            avoid_tolls: true,
            avoid_highways: true,
            ..Preferences::neutral()
        };
        let graph = WaypointGraph::build(&synthesize(source, destination), avoid);

        let start = graph.index_of(VertexKey::of(source)).unwrap();
        let goal = graph.index_of(VertexKey::of(destination)).unwrap();
        assert_eq!(graph.waypoint(goal).and_then(|waypoint| waypoint.tags), None);
        assert!(
            (graph.weight(start, goal).unwrap() - great_circle_m(source, destination)).abs()
                < 1e-9
        );
    }

    #[test]
    fn vertex_keys_do_not_alias_close_points() {
        let a = Coordinate::new(1.000_000_000_000_1, 2.0);
        let b = Coordinate::new(1.000_000_000_000_2, 2.0);
        assert_ne!(VertexKey::of(a), VertexKey::of(b));
        assert_eq!(
            VertexKey::of(Coordinate::new(-0.0, 0.0)),
            VertexKey::of(Coordinate::new(0.0, 0.0))
        );
    }

    #[test]
    fn add_edge_rejects_bad_weights_and_unknown_vertices() {
        let mut graph = WaypointGraph::new();
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        graph.add_vertex(Waypoint::endpoint(a));

        assert!(matches!(
            graph.add_edge(a.into(), a.into(), -1.0),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(matches!(
            graph.add_edge(a.into(), b.into(), 1.0),
            Err(GraphError::UnknownVertex(_))
        ));

        graph.add_vertex(Waypoint::endpoint(b));
        graph.add_edge(a.into(), b.into(), 1.0).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.neighbours(graph.index_of(b.into()).unwrap()).is_empty());
    }
}

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::{
    graph::{VertexKey, WaypointGraph},
    models::{Algorithm, Coordinate},
};

pub mod astar;
pub mod bfs;
pub mod dfs;
pub mod dijkstra;

pub use astar::AStar;
pub use bfs::BreadthFirst;
pub use dfs::DepthFirst;
pub use dijkstra::Dijkstra;

/// A graph search over a [`WaypointGraph`].
///
/// Implementations differ only in how they manage their frontier; vertex
/// lookup and path reconstruction are shared through this module.
///
/// # Contract
/// All implementations must:
/// - Return a path whose first coordinate is `start` and last is `goal`
/// - Return `[start]` with zero cost when `start == goal`
/// - Report an exhausted frontier as [`SearchError::NoPathFound`], never panic
pub trait PathSearch: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Parameters
    /// - `target`: coordinate of the goal, used by heuristic strategies
    fn search(
        &self,
        graph: &WaypointGraph,
        start: VertexKey,
        goal: VertexKey,
        target: Coordinate,
    ) -> Result<SearchResult, SearchError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub path: Vec<Coordinate>,
    /// Sum of edge weights along `path`, in meters.
    pub cost: f64,
    pub nodes_expanded: usize,
}

impl SearchResult {
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("no path connects {start} to {goal}")]
    NoPathFound { start: VertexKey, goal: VertexKey },
    #[error("vertex {0} is not in the graph")]
    UnknownVertex(VertexKey),
    #[error("predecessor chain from {goal} never reaches {start}")]
    BrokenPredecessorChain { start: VertexKey, goal: VertexKey },
}

impl SearchError {
    pub fn is_no_path(&self) -> bool {
        matches!(self, SearchError::NoPathFound { .. })
    }
}

static ASTAR: AStar = AStar;
static DIJKSTRA: Dijkstra = Dijkstra;
static BFS: BreadthFirst = BreadthFirst;
static DFS: DepthFirst = DepthFirst;

pub fn strategy_for(algorithm: Algorithm) -> &'static dyn PathSearch {
    match algorithm {
        Algorithm::AStar => &ASTAR,
        Algorithm::Dijkstra => &DIJKSTRA,
        Algorithm::Bfs => &BFS,
        Algorithm::Dfs => &DFS,
    }
}

/// Start and goal resolved to graph indices.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Endpoints {
    pub start: NodeIndex,
    pub goal: NodeIndex,
    start_key: VertexKey,
    goal_key: VertexKey,
}

impl Endpoints {
    pub fn resolve(
        graph: &WaypointGraph,
        start: VertexKey,
        goal: VertexKey,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            start: graph.index_of(start).ok_or(SearchError::UnknownVertex(start))?,
            goal: graph.index_of(goal).ok_or(SearchError::UnknownVertex(goal))?,
            start_key: start,
            goal_key: goal,
        })
    }

    pub fn is_trivial(&self) -> bool {
        self.start == self.goal
    }

    pub fn trivial_result(&self) -> SearchResult {
        SearchResult {
            path: vec![self.start_key.coordinate()],
            cost: 0.0,
            nodes_expanded: 0,
        }
    }

    pub fn not_found(&self) -> SearchError {
        SearchError::NoPathFound {
            start: self.start_key,
            goal: self.goal_key,
        }
    }

    /// Walk predecessor links back from the goal, then reverse.
    pub fn reconstruct(
        &self,
        graph: &WaypointGraph,
        parents: &HashMap<NodeIndex, NodeIndex>,
    ) -> Result<Vec<Coordinate>, SearchError> {
        let broken = || SearchError::BrokenPredecessorChain {
            start: self.start_key,
            goal: self.goal_key,
        };

        let mut path = Vec::new();
        let mut current = self.goal;
        loop {
            path.push(graph.coordinate(current).ok_or_else(broken)?);
            if current == self.start {
                break;
            }
            // A chain longer than the vertex count must contain a cycle.
            if path.len() > graph.vertex_count() {
                return Err(broken());
            }
            current = *parents.get(&current).ok_or_else(broken)?;
        }
        path.reverse();
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::waypoints::Waypoint;

    /// Points one centimeter apart so the A* heuristic stays far below the
    /// integer edge weights.
    pub fn coord(i: usize) -> Coordinate {
        Coordinate::new(0.0, i as f64 * 1e-7)
    }

    pub fn key(i: usize) -> VertexKey {
        VertexKey::of(coord(i))
    }

    pub fn graph_with(vertex_count: usize, edges: &[(usize, usize, f64)]) -> WaypointGraph {
        let mut graph = WaypointGraph::new();
        for i in 0..vertex_count {
            graph.add_vertex(Waypoint::endpoint(coord(i)));
        }
        for &(from, to, weight) in edges {
            graph.add_edge(key(from), key(to), weight).expect("fixture edge");
            graph.add_edge(key(to), key(from), weight).expect("fixture edge");
        }
        graph
    }

    /// A chain 0-1-2-3 of unit edges plus a direct 0-3 edge of weight 10.
    pub fn chain_with_shortcut() -> WaypointGraph {
        graph_with(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 3, 10.0)])
    }

    pub fn run(
        strategy: &dyn PathSearch,
        graph: &WaypointGraph,
        from: usize,
        to: usize,
    ) -> Result<SearchResult, SearchError> {
        strategy.search(graph, key(from), key(to), coord(to))
    }
}

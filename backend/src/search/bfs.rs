use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::NodeIndex;

use super::{Endpoints, PathSearch, SearchError, SearchResult};
use crate::{
    graph::{VertexKey, WaypointGraph},
    models::Coordinate,
};

/// Level-order search. The returned path has the fewest hops; its cost is the
/// weighted length of the first path that discovered the goal, which need not
/// be the cheapest.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst;

impl PathSearch for BreadthFirst {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn search(
        &self,
        graph: &WaypointGraph,
        start: VertexKey,
        goal: VertexKey,
        _target: Coordinate,
    ) -> Result<SearchResult, SearchError> {
        let endpoints = Endpoints::resolve(graph, start, goal)?;
        if endpoints.is_trivial() {
            return Ok(endpoints.trivial_result());
        }

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue: VecDeque<(NodeIndex, f64)> = VecDeque::new();
        let mut expanded = 0;

        visited.insert(endpoints.start);
        queue.push_back((endpoints.start, 0.0));

        while let Some((current, distance)) = queue.pop_front() {
            expanded += 1;

            for (next, weight) in graph.neighbours(current) {
                // Marked on discovery, so each vertex keeps its first parent.
                if !visited.insert(next) {
                    continue;
                }
                parents.insert(next, current);
                let next_distance = distance + weight;

                if next == endpoints.goal {
                    return Ok(SearchResult {
                        path: endpoints.reconstruct(graph, &parents)?,
                        cost: next_distance,
                        nodes_expanded: expanded,
                    });
                }
                queue.push_back((next, next_distance));
            }
        }

        Err(endpoints.not_found())
    }
}

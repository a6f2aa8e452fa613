use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;

use super::{Endpoints, PathSearch, SearchError, SearchResult};
use crate::{
    graph::{VertexKey, WaypointGraph},
    models::Coordinate,
};

/// Depth-first search with an explicit stack. It follows the first unvisited
/// neighbour as far as it goes before backtracking, so it finds alternative
/// routes rather than short ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirst;

struct Frame {
    node: NodeIndex,
    parent: Option<NodeIndex>,
    distance: f64,
}

impl PathSearch for DepthFirst {
    fn name(&self) -> &'static str {
        "dfs"
    }

    fn search(
        &self,
        graph: &WaypointGraph,
        start: VertexKey,
        goal: VertexKey,
        _target: Coordinate,
    ) -> Result<SearchResult, SearchError> {
        let endpoints = Endpoints::resolve(graph, start, goal)?;

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut stack = vec![Frame {
            node: endpoints.start,
            parent: None,
            distance: 0.0,
        }];

        while let Some(frame) = stack.pop() {
            if !visited.insert(frame.node) {
                continue;
            }
            if let Some(parent) = frame.parent {
                parents.insert(frame.node, parent);
            }

            if frame.node == endpoints.goal {
                tracing::debug!("dfs reached goal after visiting {} vertices", visited.len());
                return Ok(SearchResult {
                    path: endpoints.reconstruct(graph, &parents)?,
                    cost: frame.distance,
                    nodes_expanded: visited.len(),
                });
            }

            // Reversed so the first neighbour ends up on top of the stack.
            for (next, weight) in graph.neighbours(frame.node).into_iter().rev() {
                if visited.contains(&next) {
                    continue;
                }
                stack.push(Frame {
                    node: next,
                    parent: Some(frame.node),
                    distance: frame.distance + weight,
                });
            }
        }

        Err(endpoints.not_found())
    }
}

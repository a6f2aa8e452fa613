use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::graph::NodeIndex;

use super::{Endpoints, PathSearch, SearchError, SearchResult};
use crate::{
    graph::{VertexKey, WaypointGraph},
    models::Coordinate,
};

/// Uniform-cost search: always settles the closest unvisited vertex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl PathSearch for Dijkstra {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn search(
        &self,
        graph: &WaypointGraph,
        start: VertexKey,
        goal: VertexKey,
        _target: Coordinate,
    ) -> Result<SearchResult, SearchError> {
        let endpoints = Endpoints::resolve(graph, start, goal)?;

        let mut distances: HashMap<NodeIndex, f64> = HashMap::new();
        let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue = BinaryHeap::new();
        let mut sequence = 0_u64;

        distances.insert(endpoints.start, 0.0);
        queue.push(QueueEntry::new(endpoints.start, 0.0, sequence));

        while let Some(entry) = queue.pop() {
            if visited.contains(&entry.node) {
                continue;
            }
            let current_distance = distances.get(&entry.node).copied().unwrap_or(f64::INFINITY);
            if entry.cost.0 > current_distance {
                continue;
            }
            visited.insert(entry.node);

            if entry.node == endpoints.goal {
                tracing::debug!("dijkstra settled goal after visiting {} vertices", visited.len());
                return Ok(SearchResult {
                    path: endpoints.reconstruct(graph, &parents)?,
                    cost: current_distance,
                    nodes_expanded: visited.len(),
                });
            }

            for (next, weight) in graph.neighbours(entry.node) {
                if visited.contains(&next) {
                    continue;
                }
                let next_cost = current_distance + weight;
                if next_cost < distances.get(&next).copied().unwrap_or(f64::INFINITY) {
                    distances.insert(next, next_cost);
                    parents.insert(next, entry.node);
                    sequence += 1;
                    queue.push(QueueEntry::new(next, next_cost, sequence));
                }
            }
        }

        Err(endpoints.not_found())
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Min-heap entry; among equal costs the earliest push pops first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct QueueEntry {
    node: NodeIndex,
    cost: FloatOrd,
    sequence: u64,
}

impl QueueEntry {
    fn new(node: NodeIndex, cost: f64, sequence: u64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            sequence,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

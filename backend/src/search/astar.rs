use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;

use super::{Endpoints, PathSearch, SearchError, SearchResult};
use crate::{
    distance::great_circle_m,
    graph::{VertexKey, WaypointGraph},
    models::Coordinate,
};

/// Best-first search ordered by `f = g + h`, where `h` is the great-circle
/// distance to the target coordinate.
///
/// The heuristic is admissible while every edge weight is at least its
/// geographic length. Scenic bonuses break that, so with them the result is a
/// good route rather than a guaranteed shortest one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStar;

impl PathSearch for AStar {
    fn name(&self) -> &'static str {
        "a-star"
    }

    fn search(
        &self,
        graph: &WaypointGraph,
        start: VertexKey,
        goal: VertexKey,
        target: Coordinate,
    ) -> Result<SearchResult, SearchError> {
        let endpoints = Endpoints::resolve(graph, start, goal)?;

        let heuristic = |idx: NodeIndex| {
            graph
                .coordinate(idx)
                .map(|coord| great_circle_m(coord, target))
                .unwrap_or(0.0)
        };

        // Insertion-ordered so equal f scores resolve to the vertex found first.
        let mut open: Vec<NodeIndex> = vec![endpoints.start];
        let mut closed: HashSet<NodeIndex> = HashSet::new();
        let mut g_score: HashMap<NodeIndex, f64> = HashMap::new();
        let mut f_score: HashMap<NodeIndex, f64> = HashMap::new();
        let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        g_score.insert(endpoints.start, 0.0);
        f_score.insert(endpoints.start, heuristic(endpoints.start));

        while let Some(position) = lowest_f_score(&open, &f_score) {
            let current = open.remove(position);
            let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);

            if current == endpoints.goal {
                tracing::debug!("a-star reached goal after expanding {} vertices", closed.len());
                return Ok(SearchResult {
                    path: endpoints.reconstruct(graph, &parents)?,
                    cost: current_g,
                    nodes_expanded: closed.len(),
                });
            }

            closed.insert(current);

            for (next, weight) in graph.neighbours(current) {
                if closed.contains(&next) {
                    continue;
                }

                let tentative_g = current_g + weight;
                let in_open = open.contains(&next);
                let improves = tentative_g < g_score.get(&next).copied().unwrap_or(f64::INFINITY);

                if !in_open || improves {
                    parents.insert(next, current);
                    g_score.insert(next, tentative_g);
                    f_score.insert(next, tentative_g + heuristic(next));
                    if !in_open {
                        open.push(next);
                    }
                }
            }
        }

        Err(endpoints.not_found())
    }
}

/// Position of the open vertex with the lowest f score; the earliest wins ties.
fn lowest_f_score(open: &[NodeIndex], f_score: &HashMap<NodeIndex, f64>) -> Option<usize> {
    let score = |idx: &NodeIndex| f_score.get(idx).copied().unwrap_or(f64::INFINITY);

    let mut best: Option<(usize, f64)> = None;
    for (position, idx) in open.iter().enumerate() {
        let f = score(idx);
        match best {
            Some((_, best_f)) if f >= best_f => {}
            _ => best = Some((position, f)),
        }
    }
    best.map(|(position, _)| position)
}

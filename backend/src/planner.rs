use crate::{
    assembler::assemble,
    distance::path_length_m,
    error::RouteError,
    graph::{Preferences, VertexKey, WaypointGraph},
    models::{Algorithm, Coordinate, Endpoint, RouteDescriptor, RouteOptions},
    search::{strategy_for, SearchResult},
    waypoints::synthesize,
};

pub const DEFAULT_MAX_VERTICES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Upper bound on graph size; the graph has `n * (n - 1)` edges.
    pub max_vertices: usize,
    pub default_algorithm: Algorithm,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_MAX_VERTICES,
            default_algorithm: Algorithm::AStar,
        }
    }
}

/// Entry point of the routing core.
///
/// Stateless apart from its configuration: every call synthesizes its own
/// waypoints and graph, so one planner can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct RoutePlanner {
    config: PlannerConfig,
}

impl RoutePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn default_algorithm(&self) -> Algorithm {
        self.config.default_algorithm
    }

    /// Synthesize waypoints, build the graph, search it and turn the result
    /// into a route.
    ///
    /// Road preferences only weight the graph for A*; the other strategies
    /// search plain distances. Speed modifiers apply to every strategy.
    ///
    /// # Errors
    /// - [`RouteError::InvalidInput`] for non-finite or out-of-range endpoints
    /// - [`RouteError::NoPathFound`] when the strategy cannot connect them
    /// - [`RouteError::Internal`] when the graph breaks its own invariants
    pub fn compute_route(
        &self,
        source: &Endpoint,
        destination: &Endpoint,
        algorithm: Algorithm,
        options: &RouteOptions,
    ) -> Result<RouteDescriptor, RouteError> {
        let start = validate_endpoint(source, "source")?;
        let goal = validate_endpoint(destination, "destination")?;

        let waypoints = synthesize(start, goal);
        if waypoints.len() > self.config.max_vertices {
            return Err(RouteError::Internal(format!(
                "{} waypoints exceed the limit of {}",
                waypoints.len(),
                self.config.max_vertices
            )));
        }

        let preferences = match algorithm {
            Algorithm::AStar => Preferences::from_options(options),
            Algorithm::Dijkstra | Algorithm::Bfs | Algorithm::Dfs => Preferences::neutral(),
        };
        let graph = WaypointGraph::build(&waypoints, preferences);

        let result = self.search_graph(&graph, algorithm, start, goal)?;
        if !preferences.is_neutral() {
            tracing::debug!(
                "weighted cost {:.0} m over {:.0} m of ground, preferences {:?}",
                result.cost,
                path_length_m(&result.path),
                preferences
            );
        }
        let route = assemble(result, algorithm, options);

        tracing::info!(
            "route {} ({}): {} points, {:.0} m, {:.0} s at {:.0} km/h",
            algorithm,
            route.transport_mode,
            route.path.len(),
            route.distance_m,
            route.estimated_time_s,
            route.speed_kmh
        );

        Ok(route)
    }

    /// A* with the full preference set, whatever the configured default.
    pub fn compute_route_with_preferences(
        &self,
        source: &Endpoint,
        destination: &Endpoint,
        options: &RouteOptions,
    ) -> Result<RouteDescriptor, RouteError> {
        self.compute_route(source, destination, Algorithm::AStar, options)
    }

    /// Run one strategy over an existing graph.
    pub fn search_graph(
        &self,
        graph: &WaypointGraph,
        algorithm: Algorithm,
        start: Coordinate,
        goal: Coordinate,
    ) -> Result<SearchResult, RouteError> {
        let strategy = strategy_for(algorithm);
        tracing::debug!(
            "searching {} vertices with {} from {:?} to {:?}",
            graph.vertex_count(),
            strategy.name(),
            start,
            goal
        );

        strategy
            .search(graph, VertexKey::of(start), VertexKey::of(goal), goal)
            .map_err(|err| {
                if err.is_no_path() {
                    tracing::warn!("{}: {}", strategy.name(), err);
                } else {
                    tracing::error!("{}: {}", strategy.name(), err);
                }
                RouteError::from_search(err, algorithm)
            })
    }
}

fn validate_endpoint(endpoint: &Endpoint, label: &str) -> Result<Coordinate, RouteError> {
    let Endpoint { lat, lng, .. } = *endpoint;
    if !lat.is_finite() || !lng.is_finite() {
        return Err(RouteError::InvalidInput(format!(
            "{label} coordinates must be finite numbers"
        )));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(RouteError::InvalidInput(format!(
            "{label} ({lat}, {lng}) is outside valid latitude/longitude bounds"
        )));
    }
    Ok(endpoint.coordinate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{distance::great_circle_m, models::TransportMode, waypoints::Waypoint};

    fn sf_source() -> Endpoint {
        Endpoint {
            lat: 37.77,
            lng: -122.41,
            name: Some("Civic Center".into()),
        }
    }

    fn sf_destination() -> Endpoint {
        Endpoint::new(37.78, -122.39)
    }

    #[test]
    fn default_a_star_stays_close_to_direct_distance() {
        let planner = RoutePlanner::default();
        let route = planner
            .compute_route(
                &sf_source(),
                &sf_destination(),
                Algorithm::AStar,
                &RouteOptions::default(),
            )
            .expect("route");

        let direct = great_circle_m(sf_source().coordinate(), sf_destination().coordinate());
        assert!((route.distance_m - direct).abs() <= direct * 0.05);
        assert_eq!(route.path.first().copied(), Some(sf_source().coordinate()));
        assert_eq!(route.path.last().copied(), Some(sf_destination().coordinate()));
        assert_eq!(route.algorithm, Algorithm::AStar);
        assert_eq!(route.transport_mode, TransportMode::Driving);
        assert_eq!(route.speed_kmh, 50.0);
    }

    #[test]
    fn every_algorithm_produces_a_route() {
        let planner = RoutePlanner::default();
        for algorithm in Algorithm::ALL {
            let route = planner
                .compute_route(&sf_source(), &sf_destination(), algorithm, &RouteOptions::default())
                .unwrap_or_else(|err| panic!("{algorithm}: {err}"));
            assert_eq!(route.algorithm, algorithm);
            assert!(route.distance_m > 0.0);
            assert!(route.estimated_time_s > 0.0);
        }
    }

    #[test]
    fn flying_ignores_overrides_and_modifiers() {
        let planner = RoutePlanner::default();
        let options = RouteOptions {
            transport_mode: TransportMode::Flying,
            avg_speed_kmh: Some(90.0),
            scenic: true,
            fastest_route: true,
            ..RouteOptions::default()
        };
        let route = planner
            .compute_route(&sf_source(), &sf_destination(), Algorithm::Dijkstra, &options)
            .unwrap();
        assert_eq!(route.speed_kmh, 800.0);
        let expected = route.distance_m / 1000.0 / (800.0 / 3600.0);
        assert!((route.estimated_time_s - expected).abs() < 1e-9);
    }

    #[test]
    fn avoiding_tolls_never_reduces_cost() {
        let planner = RoutePlanner::default();
        let plain = planner
            .compute_route_with_preferences(
                &sf_source(),
                &sf_destination(),
                &RouteOptions::default(),
            )
            .unwrap();
        let avoid = planner
            .compute_route_with_preferences(
                &sf_source(),
                &sf_destination(),
                &RouteOptions {
                    avoid_tolls: true,
                    ..RouteOptions::default()
                },
            )
            .unwrap();
        assert!(avoid.distance_m >= plain.distance_m);
    }

    #[test]
    fn preferences_are_ignored_outside_a_star() {
        let planner = RoutePlanner::default();
        let penalised = RouteOptions {
            avoid_highways: true,
            avoid_tolls: true,
            ..RouteOptions::default()
        };
        let plain = planner
            .compute_route(
                &sf_source(),
                &sf_destination(),
                Algorithm::Dfs,
                &RouteOptions::default(),
            )
            .unwrap();
        let with_prefs = planner
            .compute_route(&sf_source(), &sf_destination(), Algorithm::Dfs, &penalised)
            .unwrap();
        assert_eq!(plain.distance_m, with_prefs.distance_m);
    }

    #[test]
    fn rejects_out_of_range_and_non_finite_endpoints() {
        let planner = RoutePlanner::default();
        let bad_lat = Endpoint::new(91.0, 0.0);
        let bad_lng = Endpoint::new(0.0, f64::NAN);

        for bad in [bad_lat, bad_lng] {
            let err = planner
                .compute_route(&bad, &sf_destination(), Algorithm::AStar, &RouteOptions::default())
                .unwrap_err();
            assert!(matches!(err, RouteError::InvalidInput(_)), "{err:?}");
            assert!(!err.is_recoverable());
        }
    }

    #[test]
    fn vertex_guard_rejects_oversized_graphs() {
        let planner = RoutePlanner::new(PlannerConfig {
            max_vertices: 4,
            ..PlannerConfig::default()
        });
        let err = planner
            .compute_route(
                &sf_source(),
                &sf_destination(),
                Algorithm::Bfs,
                &RouteOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RouteError::Internal(_)));
    }

    #[test]
    fn disconnected_graph_reports_no_path() {
        let planner = RoutePlanner::default();
        let start = Coordinate::new(0.0, 0.0);
        let goal = Coordinate::new(0.0, 1.0);
        let mut graph = WaypointGraph::new();
        graph.add_vertex(Waypoint::endpoint(start));
        graph.add_vertex(Waypoint::endpoint(goal));

        for algorithm in Algorithm::ALL {
            let err = planner.search_graph(&graph, algorithm, start, goal).unwrap_err();
            assert!(matches!(err, RouteError::NoPathFound { algorithm: a } if a == algorithm));
            assert!(err.is_recoverable());
        }
    }

    #[test]
    fn missing_vertex_is_internal() {
        let planner = RoutePlanner::default();
        let graph = WaypointGraph::new();
        let err = planner
            .search_graph(
                &graph,
                Algorithm::AStar,
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 1.0),
            )
            .unwrap_err();
        assert!(matches!(err, RouteError::Internal(_)));
    }

    #[test]
    fn destination_on_a_toll_waypoint_stays_untagged() {
        let planner = RoutePlanner::default();
        let source = Endpoint::new(0.0, 0.0);
        // Exactly where the toll highway point would be synthesized.
        let destination = Endpoint::new(0.015, 0.02);
        let direct = great_circle_m(source.coordinate(), destination.coordinate());

        let plain = planner
            .compute_route_with_preferences(&source, &destination, &RouteOptions::default())
            .unwrap();
        let avoid = planner
            .compute_route_with_preferences(
                &source,
                &destination,
                &RouteOptions {
                    avoid_tolls: true,
                    ..RouteOptions::default()
                },
            )
            .unwrap();

        assert!((plain.distance_m - direct).abs() < 1e-6);
        assert!((avoid.distance_m - direct).abs() < 1e-6);
        assert_eq!(avoid.path, vec![source.coordinate(), destination.coordinate()]);
    }

    #[test]
    fn same_source_and_destination() {
        let planner = RoutePlanner::default();
        let point = sf_source();
        for algorithm in Algorithm::ALL {
            let route = planner
                .compute_route(&point, &point, algorithm, &RouteOptions::default())
                .unwrap();
            assert_eq!(route.path, vec![point.coordinate()]);
            assert_eq!(route.distance_m, 0.0);
            assert_eq!(route.estimated_time_s, 0.0);
        }
    }
}

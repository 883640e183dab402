use std::thread;
use std::time::Duration;

use searoute_lib::{
    haversine_km, plan_route, DistanceUnit, Error, LinearScan, RouteAlgorithm, RouteEngine,
    RouteOptions, RouteRequest, RouteResult, SearchBudget,
};

mod common;

use common::{basins_graph, coord, port, world_graph};

fn waypoint_ids(route: &RouteResult) -> Vec<i64> {
    route.waypoints.iter().map(|waypoint| waypoint.id).collect()
}

fn path_length_km(route: &RouteResult) -> f64 {
    route
        .path
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum()
}

#[test]
fn diamond_route_matches_known_length() {
    let engine = RouteEngine::new(basins_graph());
    let request = RouteRequest::new(coord(0.0, 0.0), coord(0.0, 2.0));

    let route = engine.route(&request).expect("route exists");

    let expected = 314.498_762_5;
    assert!(
        (route.distance_km - expected).abs() / expected < 1e-4,
        "distance {} expected {}",
        route.distance_km,
        expected
    );
    assert_eq!(waypoint_ids(&route), vec![1, 2, 4], "lowest id wins the tie");
    assert_eq!(
        route.path,
        vec![coord(0.0, 0.0), coord(1.0, 1.0), coord(0.0, 2.0)]
    );
    assert_eq!(route.hop_count(), 2);
    assert_eq!(route.regions(), vec!["North", "South"]);
}

#[test]
fn five_node_fixture_follows_known_path() {
    let engine = RouteEngine::new(basins_graph());
    let request = RouteRequest::new(coord(0.0, 0.0), coord(0.0, 5.0));

    let route = engine.route(&request).expect("route exists");

    let expected = 648.083_542_5;
    assert_eq!(waypoint_ids(&route), vec![1, 2, 4, 5]);
    assert!(
        (route.distance_km - expected).abs() / expected < 1e-4,
        "distance {} expected {}",
        route.distance_km,
        expected
    );
    assert_eq!(route.path.len(), 4);
}

#[test]
fn off_lane_query_points_are_included_in_path_and_distance() {
    let engine = RouteEngine::new(basins_graph());
    let origin = coord(0.2, -0.3);
    let destination = coord(0.1, 5.4);
    let route = engine
        .route(&RouteRequest::new(origin, destination))
        .expect("route exists");

    assert_eq!(route.path.first(), Some(&origin));
    assert_eq!(route.path.last(), Some(&destination));
    assert_eq!(route.origin_snap.id, 1);
    assert_eq!(route.destination_snap.id, 5);
    assert!((route.distance_km - path_length_km(&route)).abs() < 1e-6);
    assert!(route.distance_km >= haversine_km(origin, destination));
}

#[test]
fn suez_route_from_shanghai_to_rotterdam() {
    let graph = world_graph();
    let origin = port(&graph, "Shanghai");
    let destination = port(&graph, "Rotterdam");
    let engine = RouteEngine::new(graph);

    let route = engine
        .route(&RouteRequest::new(origin, destination))
        .expect("route exists");

    assert_eq!(
        waypoint_ids(&route),
        vec![1, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17]
    );
    assert!((route.distance_km - 19_018.227).abs() < 0.01);
    assert!((route.distance_km - path_length_km(&route)).abs() < 1e-6);
    assert!(route.regions().contains(&"Egypt"));
}

#[test]
fn pacific_route_crosses_the_antimeridian() {
    let graph = world_graph();
    let origin = port(&graph, "Shanghai");
    let destination = port(&graph, "Los Angeles");
    let engine = RouteEngine::new(graph);

    let route = engine
        .route(&RouteRequest::new(origin, destination))
        .expect("route exists");

    assert_eq!(waypoint_ids(&route), vec![1, 2, 3, 26, 25, 24]);
    assert!((route.distance_km - 12_328.369).abs() < 0.01);
}

#[test]
fn a_star_agrees_with_dijkstra() {
    let engine = RouteEngine::new(world_graph());
    let pairs = [
        (coord(31.23, 121.8), coord(51.95, 4.14)),
        (coord(1.26, 103.82), coord(40.5, -73.9)),
        (coord(35.44, 139.64), coord(-23.96, -46.33)),
        (coord(-29.87, 31.05), coord(53.54, 9.97)),
        (coord(21.0, -158.0), coord(36.0, -5.0)),
    ];

    for (origin, destination) in pairs {
        let dijkstra = engine
            .route(&RouteRequest::new(origin, destination))
            .expect("dijkstra route");
        let a_star = engine
            .route(&RouteRequest::new(origin, destination).with_algorithm(RouteAlgorithm::AStar))
            .expect("a* route");

        assert_eq!(a_star.algorithm, RouteAlgorithm::AStar);
        assert!(
            (dijkstra.distance_km - a_star.distance_km).abs() < 1e-6,
            "{origin} -> {destination}: dijkstra {} a* {}",
            dijkstra.distance_km,
            a_star.distance_km
        );
    }
}

#[test]
fn repeated_queries_are_identical() {
    let engine = RouteEngine::new(world_graph());
    let request = RouteRequest::new(coord(-34.0, 18.0), coord(40.0, -74.0));

    let first = engine.route(&request).expect("route exists");
    for _ in 0..5 {
        assert_eq!(engine.route(&request).expect("route exists"), first);
    }
}

#[test]
fn same_nearest_node_yields_zero_length_route() {
    let engine = RouteEngine::new(basins_graph());
    let request = RouteRequest::new(coord(0.01, 5.01), coord(-0.02, 4.98));

    let route = engine.route(&request).expect("degenerate route");
    assert_eq!(route.distance, 0.0);
    assert_eq!(route.path, vec![coord(0.0, 5.0)]);
    assert_eq!(waypoint_ids(&route), vec![5]);
    assert_eq!(route.hop_count(), 0);
}

#[test]
fn disconnected_basins_have_no_route() {
    let engine = RouteEngine::new(basins_graph());
    let request = RouteRequest::new(coord(0.0, 0.0), coord(30.0, 30.0));

    let err = engine.route(&request).expect_err("island is unreachable");
    assert!(matches!(err, Error::NoRouteExists { .. }), "{err:?}");
}

#[test]
fn caspian_is_unreachable_from_the_ocean() {
    let graph = world_graph();
    let origin = port(&graph, "Rotterdam");
    let destination = port(&graph, "Baku");
    let engine = RouteEngine::new(graph);

    let err = engine
        .route(&RouteRequest::new(origin, destination))
        .expect_err("inland sea");
    assert!(matches!(err, Error::NoRouteExists { .. }));
}

#[test]
fn far_query_points_exceed_snap_limit() {
    let engine = RouteEngine::new(basins_graph());
    let request = RouteRequest::new(coord(-60.0, -120.0), coord(0.0, 2.0));

    let err = engine.route(&request).expect_err("too far to snap");
    assert!(matches!(err, Error::SnapDistanceExceeded { .. }));

    let mut relaxed = request.clone();
    relaxed.options.max_snap_distance_km = None;
    assert!(engine.route(&relaxed).is_ok());
}

#[test]
fn exhausted_budget_is_not_a_missing_route() {
    let engine = RouteEngine::new(world_graph());
    let mut request = RouteRequest::new(coord(31.23, 121.8), coord(51.95, 4.14));
    request.options.budget = SearchBudget {
        max_iterations: Some(3),
        time_limit: None,
    };

    let err = engine.route(&request).expect_err("budget too small");
    assert!(matches!(err, Error::SolverTimeout { settled: 3, .. }), "{err:?}");

    request.options.budget = SearchBudget {
        max_iterations: None,
        time_limit: Some(Duration::ZERO),
    };
    let err = engine.route(&request).expect_err("no time at all");
    assert!(matches!(err, Error::SolverTimeout { .. }));
}

#[test]
fn extra_snap_candidates_never_lengthen_the_route() {
    let engine = RouteEngine::new(world_graph());
    let base = RouteRequest::new(coord(30.0, 125.0), coord(50.5, 0.0));
    let single = engine.route(&base).expect("route exists");

    let mut wide = base.clone();
    wide.options = RouteOptions {
        snap_candidates: 4,
        ..RouteOptions::default()
    };
    let multi = engine.route(&wide).expect("route exists");

    assert!(multi.distance_km <= single.distance_km + 1e-9);
    assert!((multi.distance_km - path_length_km(&multi)).abs() < 1e-6);
}

#[test]
fn units_are_converted_at_the_boundary() {
    let engine = RouteEngine::new(basins_graph());
    let request = RouteRequest::new(coord(0.0, 0.0), coord(0.0, 5.0));

    let km = engine.route(&request).expect("route exists");
    let nm = engine
        .route(&request.clone().with_unit(DistanceUnit::NauticalMiles))
        .expect("route exists");

    assert_eq!(nm.unit, DistanceUnit::NauticalMiles);
    assert_eq!(nm.distance_km, km.distance_km);
    assert!((nm.distance - km.distance_km / 1.852).abs() < 1e-9);

    let miles = km.clone().with_unit(DistanceUnit::Miles);
    assert!((miles.distance - km.distance_km / 1.609_344).abs() < 1e-9);
}

#[test]
fn spatial_index_and_linear_scan_plan_the_same_route() {
    let graph = world_graph();
    let engine = RouteEngine::new(graph.clone());
    let scan = LinearScan::new(&graph);
    let request = RouteRequest::new(coord(10.0, 70.0), coord(45.0, -30.0));

    let indexed = engine.route(&request).expect("indexed route");
    let scanned = plan_route(&graph, &scan, &request).expect("scanned route");
    assert_eq!(indexed, scanned);
}

#[test]
fn landmarks_follow_the_route() {
    let graph = world_graph();
    let origin = port(&graph, "Shanghai");
    let destination = port(&graph, "Rotterdam");
    let engine = RouteEngine::new(graph);
    let route = engine
        .route(&RouteRequest::new(origin, destination))
        .expect("route exists");

    let landmarks = engine.landmarks(&route, 500.0).expect("landmarks");
    assert_eq!(landmarks.first().map(|l| l.name.as_str()), Some("Shanghai"));
    assert_eq!(landmarks.last().map(|l| l.name.as_str()), Some("Rotterdam"));
    assert!(landmarks.iter().all(|l| l.distance_km <= 500.0));
    assert!(landmarks.iter().all(|l| l.on_route));

    let mut ids: Vec<i64> = landmarks.iter().map(|l| l.id).collect();
    let total = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert!(!ids.contains(&8), "unnamed nodes are never landmarks");
}

#[test]
fn concurrent_queries_share_one_engine() {
    let engine = RouteEngine::new(world_graph());
    let requests = [
        RouteRequest::new(coord(31.23, 121.8), coord(51.95, 4.14)),
        RouteRequest::new(coord(35.44, 139.64), coord(33.73, -118.26)),
        RouteRequest::new(coord(-29.87, 31.05), coord(53.54, 9.97)),
        RouteRequest::new(coord(1.26, 103.82), coord(40.5, -73.9)),
    ];
    let sequential: Vec<RouteResult> = requests
        .iter()
        .map(|request| engine.route(request).expect("route exists"))
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .map(|request| {
                let engine = engine.clone();
                scope.spawn(move || engine.route(request).expect("route exists"))
            })
            .collect();
        for (handle, expected) in handles.into_iter().zip(&sequential) {
            assert_eq!(&handle.join().expect("thread completes"), expected);
        }
    });
}

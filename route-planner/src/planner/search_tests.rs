//! End-to-end tests for bus search and route assembly.

use super::*;
use crate::domain::{Direction, GeoPoint, Mode, NodeRef, ServiceId, StopCode};
use crate::graph::{AdjacencyGraph, AdjacencyGraphBuilder};
use crate::network::{LineStops, NetworkBuilder, NetworkData, RawNetwork, StopRecord};
use crate::spatial::{GeoIndex, GeoNode, ServiceArea};
use std::collections::BTreeSet;
use std::sync::Arc;

const LAT0: f64 = 1.385;
const LON0: f64 = 103.890;
const M_PER_DEG: f64 = 111_194.93;

/// A point `east_m` / `north_m` metres from a fixed origin south-west of
/// the rail loops.
fn at(east_m: f64, north_m: f64) -> GeoPoint {
    let lat = LAT0 + north_m / M_PER_DEG;
    let lon = LON0 + east_m / (M_PER_DEG * LAT0.to_radians().cos());
    GeoPoint::new(lat, lon).unwrap()
}

fn code(n: u32) -> StopCode {
    StopCode::new(n)
}

type LineSpec<'a> = (&'a str, &'a [(u32, f64, f64)]);

/// Network data from lines of `(code, east_m, north_m)` stops. Every stop
/// gets a geographic node cross-referencing its code.
fn data(lines: &[LineSpec]) -> NetworkData {
    let mut nodes = Vec::new();
    let mut seen = BTreeSet::new();
    let stops = lines
        .iter()
        .map(|(service, stops)| LineStops {
            service: ServiceId::new(*service),
            directions: vec![(
                Direction::Outbound,
                stops
                    .iter()
                    .map(|&(c, east, north)| {
                        if seen.insert(c) {
                            nodes.push(GeoNode {
                                id: u64::from(c),
                                point: at(east, north),
                                name: None,
                                stop_ref: Some(c.to_string()),
                            });
                        }
                        StopRecord {
                            code: code(c),
                            point: at(east, north),
                            description: format!("Stop {c}"),
                        }
                    })
                    .collect(),
            )],
        })
        .collect();

    NetworkData {
        raw: RawNetwork {
            stops,
            routes: Vec::new(),
        },
        area: ServiceArea::rectangle(
            GeoPoint::new(1.37, 103.87).unwrap(),
            GeoPoint::new(1.43, 103.93).unwrap(),
        ),
        geo_index: GeoIndex::new(nodes),
        streets: None,
    }
}

fn graph_of(data: &NetworkData) -> AdjacencyGraph {
    let network = NetworkBuilder::new(&data.area).build(&data.raw);
    AdjacencyGraphBuilder::new(&data.geo_index).build(&network)
}

/// Two ways from 1 to 4: staying on service 1 via 2 and 3 (about 2 km),
/// or changing twice via 5 and 6 on services 2, 3, 4 (about 300 m).
const SHORT_WITH_CHANGES: &[LineSpec] = &[
    (
        "1",
        &[(1, 0.0, 0.0), (2, 0.0, 90.0), (3, 150.0, 1079.0), (4, 300.0, 0.0)],
    ),
    ("2", &[(1, 0.0, 0.0), (5, 100.0, 0.0)]),
    ("3", &[(5, 100.0, 0.0), (6, 200.0, 0.0)]),
    ("4", &[(6, 200.0, 0.0), (4, 300.0, 0.0)]),
];

/// Service 10 runs 1200 m north through three intermediate stops.
const STRAIGHT_LINE: &[LineSpec] = &[(
    "10",
    &[
        (11, 0.0, 0.0),
        (12, 0.0, 300.0),
        (13, 0.0, 600.0),
        (14, 0.0, 900.0),
        (15, 0.0, 1200.0),
    ],
)];

fn services(path: &BusPath) -> Vec<String> {
    segment_by_service(path)
        .into_iter()
        .map(|s| s.service.as_str().to_string())
        .collect()
}

// ============ Bus search ============

#[test]
fn shortest_distance_takes_the_changes() {
    let g = graph_of(&data(SHORT_WITH_CHANGES));
    let path =
        shortest_path(&g, code(1), code(4), TransferPolicy::ShortestDistance, 0.0).unwrap();

    let stops: Vec<u32> = path.stops().map(|s| s.value()).collect();
    assert_eq!(stops, vec![1, 5, 6, 4]);
    assert_eq!(services(&path), vec!["2", "3", "4"]);
    assert_eq!(path.transfer_count(), 2);
}

#[test]
fn least_transfers_stays_on_the_bus() {
    let g = graph_of(&data(SHORT_WITH_CHANGES));
    let path =
        shortest_path(&g, code(1), code(4), TransferPolicy::LeastTransfers, 99_999.0).unwrap();

    let stops: Vec<u32> = path.stops().map(|s| s.value()).collect();
    assert_eq!(stops, vec![1, 2, 3, 4]);
    assert_eq!(services(&path), vec!["1"]);
    // True length, not the biased priority
    assert!(path.distance_m > 2000.0 && path.distance_m < 2300.0);
}

#[test]
fn least_transfers_never_uses_more_services() {
    let g = graph_of(&data(SHORT_WITH_CHANGES));
    let plain =
        shortest_path(&g, code(1), code(4), TransferPolicy::ShortestDistance, 0.0).unwrap();
    let biased =
        shortest_path(&g, code(1), code(4), TransferPolicy::LeastTransfers, 99_999.0).unwrap();

    let distinct = |p: &BusPath| services(p).into_iter().collect::<BTreeSet<_>>().len();
    assert!(distinct(&biased) <= distinct(&plain));
}

#[test]
fn shortest_is_no_longer_than_alternatives() {
    let g = graph_of(&data(SHORT_WITH_CHANGES));
    let path =
        shortest_path(&g, code(1), code(4), TransferPolicy::ShortestDistance, 0.0).unwrap();

    let length = |hops: &[(u32, u32, &str)]| -> f64 {
        hops.iter()
            .map(|&(a, b, s)| g.edge(code(a), code(b), &ServiceId::new(s)).unwrap())
            .sum()
    };
    let via_line_1 = length(&[(1, 2, "1"), (2, 3, "1"), (3, 4, "1")]);
    let via_changes = length(&[(1, 5, "2"), (5, 6, "3"), (6, 4, "4")]);

    assert!(path.distance_m <= via_line_1);
    assert!(path.distance_m <= via_changes + 1e-9);
}

#[test]
fn search_is_deterministic() {
    let first = shortest_path(
        &graph_of(&data(SHORT_WITH_CHANGES)),
        code(1),
        code(4),
        TransferPolicy::LeastTransfers,
        99_999.0,
    );
    for _ in 0..5 {
        let again = shortest_path(
            &graph_of(&data(SHORT_WITH_CHANGES)),
            code(1),
            code(4),
            TransferPolicy::LeastTransfers,
            99_999.0,
        );
        assert_eq!(again, first);
    }
}

#[test]
fn graph_rebuild_is_identical() {
    let d = data(SHORT_WITH_CHANGES);
    assert_eq!(graph_of(&d), graph_of(&d));
}

#[test]
fn single_service_along_intermediate_stops() {
    let d = data(STRAIGHT_LINE);
    let planner = BusPlanner::new(&d, TransferPolicy::ShortestDistance, 99_999.0);

    let leg = planner.plan_leg(at(0.0, -5.0), at(0.0, 1205.0)).unwrap();

    assert_eq!(leg.waypoints().len(), 5);
    assert_eq!(leg.services(), vec![&ServiceId::new("10")]);
    assert_eq!(leg.transfer_count(), 0);

    let polyline: f64 = leg
        .waypoints()
        .windows(2)
        .map(|w| w[0].point.distance_m(&w[1].point))
        .sum();
    assert!((leg.distance_m() - polyline).abs() < 1e-6);
    assert!((leg.distance_m() - 1200.0).abs() < 1.0);
}

#[test]
fn bus_planner_honours_policy() {
    let d = data(SHORT_WITH_CHANGES);
    let start = at(0.0, -5.0);
    let end = at(300.0, -5.0);

    let plain = BusPlanner::new(&d, TransferPolicy::ShortestDistance, 99_999.0)
        .plan_leg(start, end)
        .unwrap();
    let biased = BusPlanner::new(&d, TransferPolicy::LeastTransfers, 99_999.0)
        .plan_leg(start, end)
        .unwrap();

    assert_eq!(plain.transfer_count(), 2);
    assert_eq!(biased.transfer_count(), 0);
    assert_eq!(
        biased.waypoints().last().and_then(|w| w.node),
        Some(NodeRef::Stop(code(4)))
    );
}

// ============ Route assembly ============

fn route_planner(lines: &[LineSpec]) -> RoutePlanner {
    RoutePlanner::new(
        Arc::new(data(lines)),
        RailGraph::punggol_lrt(),
        PlannerConfig::default(),
    )
}

#[test]
fn identical_ends_give_zero_length_walk() {
    let planner = route_planner(STRAIGHT_LINE);
    let p = at(10.0, 10.0);

    let itinerary = planner.plan(p, p).unwrap();
    assert_eq!(itinerary.legs().len(), 1);
    assert_eq!(itinerary.legs()[0].mode(), Mode::Walk);
    assert_eq!(itinerary.distance_m(), 0.0);
}

#[test]
fn short_trip_walks() {
    let planner = route_planner(STRAIGHT_LINE);
    let itinerary = planner.plan(at(0.0, 0.0), at(0.0, 350.0)).unwrap();
    assert_eq!(itinerary.modes(), vec![Mode::Walk]);
}

#[test]
fn medium_trip_takes_the_bus() {
    let planner = route_planner(STRAIGHT_LINE);
    // 502 m: snaps to stops 11 and 13
    let start = at(50.0, 0.0);
    let end = at(50.0, 500.0);

    let itinerary = planner.plan(start, end).unwrap();

    assert_eq!(itinerary.modes(), vec![Mode::Walk, Mode::Bus, Mode::Walk]);
    let bus = &itinerary.legs()[1];
    assert_eq!(bus.waypoints()[0].node, Some(NodeRef::Stop(code(11))));
    assert_eq!(bus.waypoints()[2].node, Some(NodeRef::Stop(code(13))));
    assert_eq!(itinerary.legs()[0].start(), start);
    assert_eq!(itinerary.legs()[2].end(), end);
}

#[test]
fn failed_bus_leg_falls_back_to_walking() {
    let planner = route_planner(STRAIGHT_LINE);
    // Against the direction of travel
    let start = at(50.0, 500.0);
    let end = at(50.0, 0.0);

    let itinerary = planner.plan(start, end).unwrap();
    assert!(itinerary.is_walk_only());
    assert_eq!(itinerary.legs().len(), 1);
}

#[test]
fn starting_at_a_station_rides_rail_then_walks() {
    let planner = route_planner(STRAIGHT_LINE);
    let sam_kee = GeoPoint::new(1.4097076, 103.904874).unwrap();
    // About 50 m north of Oasis
    let end = GeoPoint::new(1.4027323, 103.9127329).unwrap();

    let itinerary = planner.plan(sam_kee, end).unwrap();

    assert_eq!(itinerary.modes(), vec![Mode::Rail, Mode::Walk]);
    let names: Vec<&str> = itinerary.legs()[0]
        .waypoints()
        .iter()
        .filter_map(|w| w.label.as_deref())
        .collect();
    assert_eq!(names, vec!["Sam Kee", "Punggol", "Damai", "Oasis"]);
}

/// Service 77 leaves from about 40 m west of Soo Teck station (808.7 m
/// east, 2257.4 m north of the origin) and runs 900 m further west.
const WEST_FROM_SOO_TECK: &[LineSpec] = &[(
    "77",
    &[(71, 770.0, 2257.0), (72, 320.0, 2257.0), (73, -130.0, 2257.0)],
)];

#[test]
fn far_rail_terminal_continues_by_bus() {
    let planner = route_planner(WEST_FROM_SOO_TECK);
    let sam_kee = GeoPoint::new(1.4097076, 103.904874).unwrap();
    // About 950 m west of Soo Teck, beside stop 73
    let end = at(-140.0, 2230.0);

    let itinerary = planner.plan(sam_kee, end).unwrap();

    assert_eq!(
        itinerary.modes(),
        vec![Mode::Rail, Mode::Walk, Mode::Bus, Mode::Walk]
    );
    let legs = itinerary.legs();
    assert_eq!(
        legs[0].waypoints().last().and_then(|w| w.label.as_deref()),
        Some("Soo Teck")
    );
    let bus = &legs[2];
    assert_eq!(bus.waypoints()[0].node, Some(NodeRef::Stop(code(71))));
    assert_eq!(
        bus.waypoints().last().and_then(|w| w.node),
        Some(NodeRef::Stop(code(73)))
    );
    assert!((bus.distance_m() - 900.0).abs() < 1.0);
    assert_eq!(legs[3].end(), end);
}

#[test]
fn long_trip_walks_to_and_from_rail() {
    let planner = route_planner(STRAIGHT_LINE);
    // Near Samudera and near Cove, about 1.8 km apart
    let start = GeoPoint::new(1.4150, 103.9000).unwrap();
    let end = GeoPoint::new(1.3990, 103.9060).unwrap();

    let itinerary = planner.plan(start, end).unwrap();

    assert_eq!(itinerary.modes(), vec![Mode::Walk, Mode::Rail, Mode::Walk]);
    let rail = &itinerary.legs()[1];
    assert_eq!(rail.waypoints()[0].label.as_deref(), Some("Samudera"));
    assert_eq!(
        rail.waypoints().last().and_then(|w| w.label.as_deref()),
        Some("Cove")
    );
}

#[test]
fn invalid_coordinates_rejected() {
    let planner = route_planner(STRAIGHT_LINE);
    assert!(matches!(
        planner.plan_route(95.0, 103.9, 1.4, 103.9),
        Err(RouteFailure::InvalidCoordinate(_))
    ));
    assert!(matches!(
        planner.plan_route(1.4, 103.9, 1.4, f64::NAN),
        Err(RouteFailure::InvalidCoordinate(_))
    ));
}

#[test]
fn plan_route_accepts_raw_coordinates() {
    let planner = route_planner(STRAIGHT_LINE);
    let itinerary = planner.plan_route(1.3851, 103.8901, 1.3852, 103.8901).unwrap();
    assert!(itinerary.is_walk_only());
}

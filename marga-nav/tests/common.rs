//! Shared fixtures for integration tests.
//!
//! The sample building is a two-floor station:
//!
//! ```text
//! floor 1:  S1(0,10)          E1(20,10) lift lobby
//!             |                 |
//!           N1(0,0) ───20─── N2(20,0)
//!
//! floor 2:  S2(0,10) ──────40────── P1(40,10)
//!                      E2(20,10) ──20──┘
//! ```
//!
//! E1-E2 is an elevator, S1-S2 stairs. The elevator route N1 -> P1 is
//! 51 m, the stairs route 55 m.

#![allow(dead_code)]

use std::sync::Arc;

use marga_nav::graph::{EdgeAttrs, Graph, GraphEdge, GraphNode};
use marga_nav::positioning::FingerprintRecord;
use marga_nav::{
    FingerprintTable, GuidanceConfig, GuidanceSession, KnnPositioner, Navigator, PlaceCatalog,
    PlaceInfo, RouteGraph, RssiSmoother, SignalReading,
};

pub const BEACON_UUID: &str = "FDA50693-A4E2-4FB1-AFCF-C6EB07647825";

/// Source id of sample beacon `n` (1..=5).
pub fn beacon(n: u32) -> String {
    format!("{}:1:{}", BEACON_UUID, n)
}

fn tactile() -> EdgeAttrs {
    EdgeAttrs {
        tactile: true,
        ..Default::default()
    }
}

pub fn sample_graph() -> Graph {
    Graph {
        nodes: vec![
            GraphNode::new("N1", 0.0, 0.0, "1").with_kind("gate"),
            GraphNode::new("N2", 20.0, 0.0, "1").with_kind("corridor"),
            GraphNode::new("E1", 20.0, 10.0, "1").with_kind("elevator"),
            GraphNode::new("E2", 20.0, 10.0, "2").with_kind("elevator"),
            GraphNode::new("P1", 40.0, 10.0, "2").with_kind("platform"),
            GraphNode::new("S1", 0.0, 10.0, "1").with_kind("stairs"),
            GraphNode::new("S2", 0.0, 10.0, "2").with_kind("stairs"),
        ],
        edges: vec![
            GraphEdge::new("N1", "N2", 20.0).with_attrs(tactile()),
            GraphEdge::new("N2", "E1", 10.0).with_attrs(tactile()),
            GraphEdge::new("E1", "E2", 1.0).with_attrs(EdgeAttrs {
                elevator: true,
                ..Default::default()
            }),
            GraphEdge::new("E2", "P1", 20.0).with_attrs(tactile()),
            GraphEdge::new("N1", "S1", 10.0),
            GraphEdge::new("S1", "S2", 5.0).with_attrs(EdgeAttrs {
                stairs: true,
                ..Default::default()
            }),
            GraphEdge::new("S2", "P1", 40.0),
        ],
    }
}

pub fn sample_route_graph() -> Arc<RouteGraph> {
    Arc::new(RouteGraph::new(sample_graph()).unwrap())
}

/// Surveyed fingerprints. Floor-2 records hear the floor-1 beacons weakly
/// through the lift shaft.
pub fn sample_fingerprints() -> FingerprintTable {
    let record = |x, y, floor, label: &str, rssi: &[(u32, i32)]| {
        rssi.iter().fold(
            FingerprintRecord::new(x, y, floor).with_label(label),
            |r, &(n, v)| r.with_rssi(beacon(n), v),
        )
    };

    FingerprintTable::new(vec![
        record(0.0, 0.0, "1", "N1", &[(1, -55), (2, -80), (3, -90)]),
        record(20.0, 0.0, "1", "N2", &[(1, -80), (2, -55), (3, -70)]),
        record(20.0, 10.0, "1", "E1", &[(1, -85), (2, -70), (3, -55)]),
        record(
            20.0,
            10.0,
            "2",
            "E2",
            &[(1, -85), (2, -72), (3, -60), (4, -55), (5, -80)],
        ),
        record(
            40.0,
            10.0,
            "2",
            "P1",
            &[(2, -90), (3, -90), (4, -80), (5, -55)],
        ),
    ])
}

pub fn sample_places() -> PlaceCatalog {
    let mut places = PlaceCatalog::new();
    places.insert("N1", PlaceInfo::new("North Gate", "gate"));
    places.insert("N2", PlaceInfo::new("Concourse", "corridor"));
    places.insert(
        "E1",
        PlaceInfo {
            start_allowed: false,
            dest_allowed: false,
            ..PlaceInfo::new("Lift Lobby", "elevator")
        },
    );
    places.insert(
        "E2",
        PlaceInfo {
            start_allowed: false,
            dest_allowed: false,
            ..PlaceInfo::new("Upper Lift Lobby", "elevator")
        },
    );
    places.insert("P1", PlaceInfo::new("Platform 1", "platform"));
    places
}

/// Readings a scanner would report standing at a surveyed place.
///
/// Beacons out of range come back as the 0 sentinel.
pub fn readings_near(place: &str) -> Vec<SignalReading> {
    let profile: &[(u32, i32)] = match place {
        "N1" => &[(1, -56), (2, -79), (3, -91), (5, 0)],
        "N2" => &[(1, -79), (2, -56), (3, -71), (5, 0)],
        "E1" => &[(1, -84), (2, -71), (3, -56), (5, 0)],
        "E2" => &[(3, -60), (4, -56), (5, -79)],
        "P1" => &[(3, -89), (4, -79), (5, -56)],
        _ => &[],
    };
    profile
        .iter()
        .map(|&(n, rssi)| SignalReading::new(beacon(n), rssi, 0))
        .collect()
}

/// Deterministic stand-in for a live scanner.
///
/// Maps elapsed session time to a canned scan: near N1 for the first
/// 10 s, near N2 until 20 s, then waiting at the floor-1 lift lobby.
pub fn mock_readings(elapsed_secs: u64) -> Vec<SignalReading> {
    let place = match elapsed_secs {
        0..10 => "N1",
        10..20 => "N2",
        _ => "E1",
    };
    readings_near(place)
        .into_iter()
        .map(|r| SignalReading {
            timestamp_ms: elapsed_secs * 1000,
            ..r
        })
        .collect()
}

/// Navigator for the sample building with default settings.
pub fn sample_navigator(start: &str, goal: &str) -> Navigator {
    sample_navigator_with(start, goal, GuidanceConfig::default())
}

pub fn sample_navigator_with(start: &str, goal: &str, config: GuidanceConfig) -> Navigator {
    let session = GuidanceSession::plan(
        sample_route_graph(),
        Arc::new(sample_places()),
        start,
        goal,
        config,
    )
    .unwrap();
    Navigator::new(
        RssiSmoother::default(),
        KnnPositioner::default(),
        Arc::new(sample_fingerprints()),
        session,
    )
}

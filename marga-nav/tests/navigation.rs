//! End-to-end guidance tests on the sample station.
//!
//! Scans go through the full pipeline: sentinel filtering, smoothing,
//! k-NN positioning and the guidance state machine.

mod common;

use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use marga_nav::guidance::{FloorChangeMethod, TurnHint};
use marga_nav::{
    Emphasis, GuidanceConfig, GuidanceEvent, GuidanceSession, GuidanceState, MargaError,
    NavError, PositionEstimate,
};
use std::sync::Arc;

fn at(t0: Instant, secs: u64) -> Instant {
    t0 + Duration::from_secs(secs)
}

fn reached(events: &[GuidanceEvent], node: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, GuidanceEvent::NodeReached { node: n, .. } if n == node))
}

// ============================================================================
// Route planning
// ============================================================================

#[test]
fn test_sample_route_prefers_elevator() {
    let graph = common::sample_route_graph();
    let path = graph.shortest_path("N1", "P1");

    assert_eq!(path.ids(), vec!["N1", "N2", "E1", "E2", "P1"]);
    assert_relative_eq!(path.length, 51.0, epsilon = 1e-9);

    let back = graph.shortest_path("P1", "N1");
    assert_relative_eq!(back.length, path.length, epsilon = 1e-9);
}

#[test]
fn test_unknown_destination_is_route_unavailable() {
    let result = GuidanceSession::plan(
        common::sample_route_graph(),
        Arc::new(common::sample_places()),
        "N1",
        "Q9",
        GuidanceConfig::default(),
    );
    let Err(MargaError::Navigation(e)) = result else {
        panic!("expected a navigation error");
    };
    assert!(matches!(e, NavError::NoPathFound { .. }));
    assert_eq!(
        GuidanceEvent::RouteUnavailable(e).text(),
        "Route not available. Please choose a different destination."
    );
}

#[test]
fn test_request_policy() {
    let places = common::sample_places();
    assert!(places.validate_request("N1", "P1").is_ok());
    assert!(places.validate_request("P1", "P1").is_err());
    assert!(places.validate_request("E1", "P1").is_err());
    assert!(places.validate_request("N1", "E2").is_err());
    assert_eq!(places.destinations().count(), 3);
}

// ============================================================================
// Full walk
// ============================================================================

#[test]
fn test_walk_to_platform_via_elevator() {
    let mut nav = common::sample_navigator("N1", "P1");
    let t0 = Instant::now();

    let ready = nav.begin();
    assert_eq!(
        ready[0].text(),
        "Ready to guide from North Gate to Platform 1."
    );
    assert_eq!(ready[1], GuidanceEvent::NavigationStarted);

    // Floor 1, driven by the mock scanner
    let mut floor_one = Vec::new();
    for t in 0..30 {
        floor_one.extend(nav.process_scan(&common::mock_readings(t), at(t0, t)));
    }

    assert!(reached(&floor_one, "North Gate"));
    assert!(floor_one.contains(&GuidanceEvent::NodeReached {
        node: "Concourse".to_string(),
        turn: Some(TurnHint::Left),
    }));
    assert!(floor_one.contains(&GuidanceEvent::FloorChange {
        method: FloorChangeMethod::Elevator,
        floor: "2".to_string(),
    }));
    assert!(
        floor_one
            .iter()
            .any(|e| matches!(e, GuidanceEvent::FloorReminder { floor } if floor == "2"))
    );
    assert!(
        !floor_one
            .iter()
            .any(|e| matches!(e, GuidanceEvent::OffRoute { .. }))
    );
    assert!(
        !floor_one
            .iter()
            .any(|e| matches!(e, GuidanceEvent::NoEstimate(_)))
    );
    assert_eq!(
        nav.session().state(),
        GuidanceState::FloorTransition {
            expected_floor: "2".to_string()
        }
    );
    assert_eq!(nav.session().segment_index(), 3);

    // Out of the lift on floor 2
    let events = nav.process_scan(&common::readings_near("E2"), at(t0, 30));
    assert_eq!(
        events,
        vec![GuidanceEvent::FloorReached {
            floor: "2".to_string()
        }]
    );

    let mut floor_two = Vec::new();
    for t in 31..50 {
        let place = if t == 31 { "E2" } else { "P1" };
        floor_two.extend(nav.process_scan(&common::readings_near(place), at(t0, t)));
    }

    assert!(reached(&floor_two, "Upper Lift Lobby"));
    let arrivals: Vec<&GuidanceEvent> = floor_two
        .iter()
        .filter(|e| matches!(e, GuidanceEvent::Arrived { .. }))
        .collect();
    assert_eq!(arrivals.len(), 1);
    assert_eq!(arrivals[0].emphasis(), Some(Emphasis::Warning));
    assert_eq!(nav.session().state(), GuidanceState::Arrived);

    let snapshot = nav.snapshot().unwrap();
    assert_eq!(snapshot.estimate, PositionEstimate::new(40.0, 10.0, "2"));
    assert_eq!(snapshot.target.as_deref(), Some("P1"));
}

#[test]
fn test_progress_announcements_are_rate_limited() {
    let mut nav = common::sample_navigator("N1", "P1");
    nav.begin();
    let t0 = Instant::now();

    // Standing at the gate after it was reached: progress toward N2
    let mut announced = 0;
    let mut progress = 0;
    for t in 0..10 {
        for e in nav.process_scan(&common::mock_readings(t), at(t0, t)) {
            if let GuidanceEvent::Progress {
                announce, distance, ..
            } = e
            {
                progress += 1;
                assert_relative_eq!(distance, 20.0, epsilon = 1e-9);
                if announce {
                    announced += 1;
                }
            }
        }
    }
    // t = 1..=9: announced at 1, 5 and 9
    assert_eq!(progress, 9);
    assert_eq!(announced, 3);
}

#[test]
fn test_stopped_session_ignores_scans() {
    let mut nav = common::sample_navigator_with(
        "N1",
        "P1",
        GuidanceConfig {
            autostart: false,
            ..Default::default()
        },
    );
    let t0 = Instant::now();

    let ready = nav.begin();
    assert_eq!(ready.len(), 1);
    assert!(ready[0].text().ends_with("Press Start when you are ready."));

    assert!(
        nav.process_scan(&common::mock_readings(0), t0)
            .is_empty()
    );
    // Smoothing still runs while stopped
    assert_eq!(nav.smoothed_vector().len(), 3);

    assert_eq!(
        nav.session_mut().start(),
        vec![GuidanceEvent::NavigationStarted]
    );
    let events = nav.process_scan(&common::mock_readings(1), at(t0, 1));
    assert!(reached(&events, "North Gate"));
}

// ============================================================================
// Rerouting
// ============================================================================

#[test]
fn test_reroute_through_stairs() {
    let graph = common::sample_route_graph();
    let mut session = GuidanceSession::plan(
        graph,
        Arc::new(common::sample_places()),
        "N1",
        "P1",
        GuidanceConfig::default(),
    )
    .unwrap();
    session.begin();
    let t0 = Instant::now();

    session.advance(&PositionEstimate::new(0.0, 0.0, "1"), t0);
    assert_eq!(session.segment_index(), 1);

    // Walked toward the stairwell instead of the concourse
    let stray = PositionEstimate::new(1.0, 9.0, "1");
    let mut events = Vec::new();
    for t in 1..=3 {
        events.extend(session.advance(&stray, at(t0, t)));
    }

    let warning = events
        .iter()
        .find(|e| matches!(e, GuidanceEvent::OffRoute { .. }))
        .unwrap();
    assert_eq!(warning.emphasis(), Some(Emphasis::Warning));
    assert!(events.contains(&GuidanceEvent::Rerouted {
        from: "S1".to_string(),
        nodes: 3,
    }));
    assert_eq!(session.path().ids(), vec!["S1", "S2", "P1"]);
    assert_eq!(session.segment_index(), 0);

    // The new route starts at the stairwell and crosses floors by stairs
    let events = session.advance(&PositionEstimate::new(0.0, 10.0, "1"), at(t0, 4));
    assert!(events.contains(&GuidanceEvent::FloorChange {
        method: FloorChangeMethod::Stairs,
        floor: "2".to_string(),
    }));
    assert_eq!(events[1].text(), "Take the stairs to floor 2.");
}

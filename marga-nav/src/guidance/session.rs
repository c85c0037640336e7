//! Guidance state machine.
//!
//! One [`GuidanceSession`] is driven by one stream of position estimates,
//! strictly in arrival order. Each call to [`GuidanceSession::advance`]
//! returns the events produced by that estimate; nothing is pushed through
//! callbacks.
//!
//! ```text
//!   Idle ──begin/start──▶ Approaching(i) ──final node reached──▶ Arrived
//!                          │        ▲
//!        cross-floor edge  ▼        │ estimate on expected floor
//!                     FloorTransition(floor)
//! ```
//!
//! Cooldowns compare caller-supplied `Instant`s; the session never sleeps.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{NavError, Result};
use crate::graph::{Path, RouteGraph};
use crate::places::PlaceCatalog;
use crate::positioning::PositionEstimate;
use crate::utils::{distance, point_to_segment_distance};

use super::event::{DebugSnapshot, FloorChangeMethod, GuidanceEvent, TurnHint};

/// Configuration for guidance.
#[derive(Clone, Debug)]
pub struct GuidanceConfig {
    /// Distance at which a target node counts as reached
    pub arrival_threshold: f64,
    /// Lateral deviation from the current segment that counts as off-route
    pub off_route_threshold: f64,
    /// Consecutive off-route updates required before warning
    pub off_route_confirm_count: u32,
    /// Minimum time between off-route warnings
    pub off_route_cooldown: Duration,
    /// Minimum time between floor-change reminders
    pub floor_announce_cooldown: Duration,
    /// Minimum time between spoken progress updates
    pub progress_announce_cooldown: Duration,
    /// Recompute the route after an off-route warning
    pub auto_reroute: bool,
    /// Start guidance as soon as the route is announced
    pub autostart: bool,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            arrival_threshold: 1.5,
            off_route_threshold: 3.0,
            off_route_confirm_count: 3,
            off_route_cooldown: Duration::from_secs(8),
            floor_announce_cooldown: Duration::from_secs(6),
            progress_announce_cooldown: Duration::from_secs(3),
            auto_reroute: true,
            autostart: true,
        }
    }
}

/// Observable state of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuidanceState {
    /// Not running (before start or after stop)
    Idle,
    /// Heading for the node at `segment`
    Approaching { segment: usize },
    /// Waiting for the estimate to report `expected_floor`
    FloorTransition { expected_floor: String },
    /// Within the arrival radius of the final node
    Arrived,
    /// No target left in the path
    Complete,
}

/// Guidance session for one route request.
pub struct GuidanceSession {
    config: GuidanceConfig,
    graph: Arc<RouteGraph>,
    places: Arc<PlaceCatalog>,
    start_id: String,
    goal_id: String,
    /// Current route; replaced wholesale on reroute
    path: Path,
    /// Index of the node being approached, in [0, path.len()]
    segment: usize,
    running: bool,
    arrived: bool,
    /// Set while a floor change is pending
    expected_floor: Option<String>,
    off_route_streak: u32,
    last_off_route_announce: Option<Instant>,
    last_floor_announce: Option<Instant>,
    last_progress_announce: Option<Instant>,
    reroute_count: u32,
    snapshot: Option<DebugSnapshot>,
}

impl GuidanceSession {
    /// Plan a route and create an idle session for it.
    ///
    /// Fails with [`NavError::NoPathFound`] if the graph has no route; no
    /// guidance can start in that case.
    pub fn plan(
        graph: Arc<RouteGraph>,
        places: Arc<PlaceCatalog>,
        start_id: &str,
        goal_id: &str,
        config: GuidanceConfig,
    ) -> Result<Self> {
        let path = graph.shortest_path(start_id, goal_id);
        if path.is_empty() {
            tracing::warn!("No path found from {} to {}", start_id, goal_id);
            return Err(NavError::NoPathFound {
                start: start_id.to_string(),
                goal: goal_id.to_string(),
            }
            .into());
        }

        tracing::info!(
            "Routing path: {:?} ({:.1} m)",
            path.ids(),
            path.length
        );

        Ok(Self {
            config,
            graph,
            places,
            start_id: start_id.to_string(),
            goal_id: goal_id.to_string(),
            path,
            segment: 0,
            running: false,
            arrived: false,
            expected_floor: None,
            off_route_streak: 0,
            last_off_route_announce: None,
            last_floor_announce: None,
            last_progress_announce: None,
            reroute_count: 0,
            snapshot: None,
        })
    }

    /// Announce the route, and start guidance when autostart is enabled.
    pub fn begin(&mut self) -> Vec<GuidanceEvent> {
        let mut events = vec![GuidanceEvent::RouteReady {
            start: self.places.display_name(&self.start_id).to_string(),
            goal: self.places.display_name(&self.goal_id).to_string(),
            nodes: self.path.len(),
            length: self.path.length,
            autostart: self.config.autostart,
        }];
        if self.config.autostart {
            events.extend(self.start());
        }
        events
    }

    /// Start consuming position estimates.
    pub fn start(&mut self) -> Vec<GuidanceEvent> {
        if self.running {
            tracing::debug!("start: already running");
            return Vec::new();
        }
        self.running = true;
        tracing::info!("Navigation started");
        vec![GuidanceEvent::NavigationStarted]
    }

    /// Stop guidance. Estimates are ignored until started again.
    pub fn stop(&mut self) -> Vec<GuidanceEvent> {
        if !self.running {
            tracing::debug!("stop: not running");
            return Vec::new();
        }
        self.running = false;
        tracing::info!("Navigation stopped");
        vec![GuidanceEvent::NavigationStopped]
    }

    /// Process one position estimate.
    pub fn advance(&mut self, est: &PositionEstimate, now: Instant) -> Vec<GuidanceEvent> {
        let mut events = Vec::new();

        if !self.running {
            tracing::debug!("advance: session not running, estimate ignored");
            return events;
        }

        // Floor transition suspends all distance guidance
        if let Some(expected) = self.expected_floor.clone() {
            self.snapshot = Some(DebugSnapshot {
                estimate: est.clone(),
                target: self.path.get(self.segment).map(|n| n.id.clone()),
                distance_to_target: None,
            });

            if est.floor == expected {
                tracing::info!("Floor transition complete: now on floor {}", expected);
                self.expected_floor = None;
                events.push(GuidanceEvent::FloorReached { floor: expected });
            } else if cooldown_elapsed(
                self.last_floor_announce,
                now,
                self.config.floor_announce_cooldown,
            ) {
                self.last_floor_announce = Some(now);
                events.push(GuidanceEvent::FloorReminder { floor: expected });
            }
            return events;
        }

        let Some(target) = self.path.get(self.segment).cloned() else {
            self.snapshot = Some(DebugSnapshot {
                estimate: est.clone(),
                target: None,
                distance_to_target: None,
            });
            events.push(GuidanceEvent::RouteComplete);
            return events;
        };

        let dist = distance(est.x, est.y, target.x, target.y);
        self.snapshot = Some(DebugSnapshot {
            estimate: est.clone(),
            target: Some(target.id.clone()),
            distance_to_target: Some(dist),
        });

        // Arrived is terminal: the snapshot stays live, guidance does not
        if self.arrived {
            return events;
        }

        // Off-route detection against the segment from the previous node
        if self.segment > 0 {
            let from = &self.path.nodes[self.segment - 1];
            if est.floor == from.floor && est.floor == target.floor {
                let deviation =
                    point_to_segment_distance(est.x, est.y, from.x, from.y, target.x, target.y);

                if deviation > self.config.off_route_threshold {
                    self.off_route_streak += 1;
                    tracing::debug!(
                        "Off-route candidate: deviation={:.2} streak={}",
                        deviation,
                        self.off_route_streak
                    );
                } else {
                    self.off_route_streak = 0;
                }

                if self.off_route_streak >= self.config.off_route_confirm_count
                    && cooldown_elapsed(
                        self.last_off_route_announce,
                        now,
                        self.config.off_route_cooldown,
                    )
                {
                    self.last_off_route_announce = Some(now);
                    self.off_route_streak = 0;
                    tracing::warn!("Off route by {:.2}", deviation);
                    events.push(GuidanceEvent::OffRoute {
                        deviation,
                        rerouting: self.config.auto_reroute,
                    });

                    if self.config.auto_reroute {
                        match self.reroute(est) {
                            Ok(new_path) => {
                                let from = new_path.nodes[0].id.clone();
                                tracing::info!("Re-routed from {}: {:?}", from, new_path.ids());
                                events.push(GuidanceEvent::Rerouted {
                                    from,
                                    nodes: new_path.len(),
                                });
                                self.path = new_path;
                                self.segment = 0;
                                self.reroute_count += 1;
                                return events;
                            }
                            Err(e) => {
                                tracing::warn!("Reroute failed: {}", e);
                                events.push(GuidanceEvent::RerouteFailed(e));
                            }
                        }
                    }
                }
            }
        }

        // Arrival at the current target node
        if dist <= self.config.arrival_threshold && est.floor == target.floor {
            let is_final = self.segment + 1 == self.path.len();

            if is_final {
                self.arrived = true;
                tracing::info!("Arrived at final destination {}", target.id);
                events.push(GuidanceEvent::Arrived {
                    node: self.places.display_name(&target.id).to_string(),
                });
                return events;
            }

            let next = self.path.nodes[self.segment + 1].clone();
            let turn = (self.segment >= 1).then(|| {
                TurnHint::from_nodes(&self.path.nodes[self.segment - 1], &target, &next)
            });
            tracing::debug!("Reached {} (turn {:?})", target.id, turn);
            events.push(GuidanceEvent::NodeReached {
                node: self.places.display_name(&target.id).to_string(),
                turn,
            });

            if next.floor != target.floor {
                let method = FloorChangeMethod::from_attrs(
                    self.graph
                        .edge_between(&target.id, &next.id)
                        .map(|e| &e.attrs),
                );
                tracing::info!(
                    "Floor change {} -> {} via {}",
                    target.floor,
                    next.floor,
                    method.text()
                );
                events.push(GuidanceEvent::FloorChange {
                    method,
                    floor: next.floor.clone(),
                });
                // The reminder cooldown is not reset here, so the first
                // wrong-floor update reminds straight away
                self.expected_floor = Some(next.floor);
            }

            self.segment += 1;
            return events;
        }

        // Still approaching
        let announce = cooldown_elapsed(
            self.last_progress_announce,
            now,
            self.config.progress_announce_cooldown,
        );
        if announce {
            self.last_progress_announce = Some(now);
        }
        events.push(GuidanceEvent::Progress {
            target: self.places.display_name(&target.id).to_string(),
            distance: dist,
            announce,
        });
        events
    }

    /// Plan from the graph node nearest to the estimate back to the goal.
    fn reroute(&self, est: &PositionEstimate) -> std::result::Result<Path, NavError> {
        let nearest = self
            .graph
            .nearest_node(est.x, est.y, &est.floor)
            .ok_or_else(|| NavError::UnreachableFloor {
                floor: est.floor.clone(),
            })?;

        let path = self.graph.shortest_path(&nearest.id, &self.goal_id);
        if path.is_empty() {
            return Err(NavError::RerouteFailed {
                from: nearest.id.clone(),
                goal: self.goal_id.clone(),
            });
        }
        Ok(path)
    }

    pub fn state(&self) -> GuidanceState {
        if !self.running {
            GuidanceState::Idle
        } else if let Some(floor) = &self.expected_floor {
            GuidanceState::FloorTransition {
                expected_floor: floor.clone(),
            }
        } else if self.segment >= self.path.len() {
            GuidanceState::Complete
        } else if self.arrived {
            GuidanceState::Arrived
        } else {
            GuidanceState::Approaching {
                segment: self.segment,
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_arrived(&self) -> bool {
        self.arrived
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn segment_index(&self) -> usize {
        self.segment
    }

    /// Node currently being approached.
    pub fn current_target(&self) -> Option<&crate::graph::GraphNode> {
        self.path.get(self.segment)
    }

    pub fn expected_floor(&self) -> Option<&str> {
        self.expected_floor.as_deref()
    }

    pub fn off_route_streak(&self) -> u32 {
        self.off_route_streak
    }

    pub fn reroute_count(&self) -> u32 {
        self.reroute_count
    }

    pub fn start_id(&self) -> &str {
        &self.start_id
    }

    pub fn goal_id(&self) -> &str {
        &self.goal_id
    }

    /// Latest estimate and distance to target, for diagnostics.
    pub fn snapshot(&self) -> Option<&DebugSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }
}

/// True if nothing was announced yet or `cooldown` has passed since `last`.
fn cooldown_elapsed(last: Option<Instant>, now: Instant, cooldown: Duration) -> bool {
    match last {
        None => true,
        Some(t) => now.saturating_duration_since(t) > cooldown,
    }
}

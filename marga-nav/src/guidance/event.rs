//! Events emitted by the guidance session.
//!
//! Every event renders to the instruction text shown and spoken by the
//! presentation layer. Some carry an [`Emphasis`] for haptic/audio cues.

use std::fmt;

use crate::error::NavError;
use crate::graph::{EdgeAttrs, GraphNode};
use crate::positioning::PositionEstimate;
use crate::utils::{turn_angle_deg, turn_cross};

/// Heading change below this is "continue straight" (degrees).
const STRAIGHT_MAX_DEG: f64 = 30.0;
/// Heading change above this is a U-turn (degrees).
const U_TURN_MIN_DEG: f64 = 150.0;

/// Cue accompanying an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// Light confirmation
    Tick,
    /// Attention required
    Warning,
}

/// Turn to take at an intermediate node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnHint {
    Straight,
    Left,
    Right,
    UTurn,
}

impl TurnHint {
    /// Classify the turn at `curr` when travelling `prev -> curr -> next`.
    ///
    /// Left/right follows the sign of the cross product with x to the right
    /// and y up.
    pub fn from_nodes(prev: &GraphNode, curr: &GraphNode, next: &GraphNode) -> Self {
        let angle = turn_angle_deg(prev.xy(), curr.xy(), next.xy());
        if angle < STRAIGHT_MAX_DEG {
            TurnHint::Straight
        } else if angle > U_TURN_MIN_DEG {
            TurnHint::UTurn
        } else if turn_cross(prev.xy(), curr.xy(), next.xy()) > 0.0 {
            TurnHint::Left
        } else {
            TurnHint::Right
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            TurnHint::Straight => "Continue straight",
            TurnHint::Left => "Turn left",
            TurnHint::Right => "Turn right",
            TurnHint::UTurn => "Make a U-turn",
        }
    }
}

/// How to reach another floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloorChangeMethod {
    Elevator,
    Stairs,
    /// Edge carries neither attribute (or no edge was found)
    Either,
}

impl FloorChangeMethod {
    /// Elevator takes priority over stairs.
    pub fn from_attrs(attrs: Option<&EdgeAttrs>) -> Self {
        match attrs {
            Some(a) if a.elevator => FloorChangeMethod::Elevator,
            Some(a) if a.stairs => FloorChangeMethod::Stairs,
            _ => FloorChangeMethod::Either,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            FloorChangeMethod::Elevator => "elevator",
            FloorChangeMethod::Stairs => "stairs",
            FloorChangeMethod::Either => "lift or stairs",
        }
    }
}

/// Guidance output for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum GuidanceEvent {
    /// A route was planned. Names are display names.
    RouteReady {
        start: String,
        goal: String,
        nodes: usize,
        length: f64,
        autostart: bool,
    },
    NavigationStarted,
    NavigationStopped,
    /// Still approaching the current target.
    ///
    /// `announce` is set at most once per progress cooldown.
    Progress {
        target: String,
        distance: f64,
        announce: bool,
    },
    /// An intermediate node was reached.
    NodeReached {
        node: String,
        turn: Option<TurnHint>,
    },
    /// The next segment changes floor; guidance pauses until it matches.
    FloorChange {
        method: FloorChangeMethod,
        floor: String,
    },
    FloorReminder {
        floor: String,
    },
    FloorReached {
        floor: String,
    },
    OffRoute {
        deviation: f64,
        rerouting: bool,
    },
    Rerouted {
        from: String,
        nodes: usize,
    },
    RerouteFailed(NavError),
    Arrived {
        node: String,
    },
    RouteComplete,
    RouteUnavailable(NavError),
    /// Scan produced no usable estimate; guidance holds its state.
    NoEstimate(NavError),
}

impl GuidanceEvent {
    /// Instruction text for display and speech.
    pub fn text(&self) -> String {
        match self {
            GuidanceEvent::RouteReady {
                start,
                goal,
                autostart,
                ..
            } => {
                if *autostart {
                    format!("Ready to guide from {} to {}.", start, goal)
                } else {
                    format!(
                        "Ready to guide from {} to {}. Press Start when you are ready.",
                        start, goal
                    )
                }
            }
            GuidanceEvent::NavigationStarted => {
                "Navigation started. Follow the audio instructions.".to_string()
            }
            GuidanceEvent::NavigationStopped => "Navigation stopped.".to_string(),
            GuidanceEvent::Progress {
                target, distance, ..
            } => format!("{:.1} meters to {}", distance, target),
            GuidanceEvent::NodeReached { node, turn } => match turn {
                Some(turn) => format!("{}. Then proceed to the next segment.", turn.text()),
                None => format!("Reached {}. Proceed to the next segment.", node),
            },
            GuidanceEvent::FloorChange { method, floor } => {
                format!("Take the {} to floor {}.", method.text(), floor)
            }
            GuidanceEvent::FloorReminder { floor } => format!("Please move to floor {}.", floor),
            GuidanceEvent::FloorReached { floor } => format!("Now on floor {}. Continue.", floor),
            GuidanceEvent::OffRoute { rerouting, .. } => {
                if *rerouting {
                    "You may be off route. Please stop and reorient. Recalculating.".to_string()
                } else {
                    "You may be off route. Please stop and reorient.".to_string()
                }
            }
            GuidanceEvent::Rerouted { .. } => "New route found. Continue.".to_string(),
            GuidanceEvent::RerouteFailed(_) => {
                "Unable to find a new route. Please ask for assistance.".to_string()
            }
            GuidanceEvent::Arrived { .. } => {
                "You have arrived at your final destination.".to_string()
            }
            GuidanceEvent::RouteComplete => "Route complete.".to_string(),
            GuidanceEvent::RouteUnavailable(_) => {
                "Route not available. Please choose a different destination.".to_string()
            }
            GuidanceEvent::NoEstimate(_) => "Position unavailable.".to_string(),
        }
    }

    /// Haptic/audio cue to render with this event, if any.
    pub fn emphasis(&self) -> Option<Emphasis> {
        match self {
            GuidanceEvent::NodeReached { .. }
            | GuidanceEvent::FloorReminder { .. }
            | GuidanceEvent::FloorReached { .. }
            | GuidanceEvent::Progress { announce: true, .. } => Some(Emphasis::Tick),
            GuidanceEvent::FloorChange { .. }
            | GuidanceEvent::OffRoute { .. }
            | GuidanceEvent::Arrived { .. } => Some(Emphasis::Warning),
            _ => None,
        }
    }

    /// Whether the event should be spoken. Unannounced progress only
    /// refreshes the on-screen text.
    pub fn is_spoken(&self) -> bool {
        !matches!(
            self,
            GuidanceEvent::Progress {
                announce: false,
                ..
            } | GuidanceEvent::NoEstimate(_)
        )
    }
}

impl fmt::Display for GuidanceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Diagnostic view of the latest update.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugSnapshot {
    pub estimate: PositionEstimate,
    /// Id of the node currently being approached
    pub target: Option<String>,
    pub distance_to_target: Option<f64>,
}

impl fmt::Display for DebugSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {})",
            self.estimate.x, self.estimate.y, self.estimate.floor
        )?;
        match (&self.target, self.distance_to_target) {
            (Some(target), Some(d)) => write!(f, "  d={:.1} m to {}", d, target),
            (Some(target), None) => write!(f, "  target {}", target),
            _ => Ok(()),
        }
    }
}

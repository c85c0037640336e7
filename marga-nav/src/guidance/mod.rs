//! Step-by-step guidance.
//!
//! This module provides:
//! - Guidance events (instruction text plus emphasis for the feedback layer)
//! - Turn hints from path geometry
//! - The guidance session state machine: progress, arrival, off-route
//!   detection with rerouting, and floor transitions

mod event;
mod session;

pub use event::{DebugSnapshot, Emphasis, FloorChangeMethod, GuidanceEvent, TurnHint};
pub use session::{GuidanceConfig, GuidanceSession, GuidanceState};

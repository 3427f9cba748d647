//! Observability hook for layout runs
//!
//! Hosts that want to surface diagnostics (a dev panel, a test harness) hand
//! an observer to the engine. Without one, the engine only emits `tracing`
//! events, which are inert until a subscriber is installed.

use std::fmt;

use super::SkipReason;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Analyze,
    AssignAngles,
    PlaceNodes,
    ComputeBounds,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Analyze => write!(f, "analyze"),
            Stage::AssignAngles => write!(f, "assign_angles"),
            Stage::PlaceNodes => write!(f, "place_nodes"),
            Stage::ComputeBounds => write!(f, "compute_bounds"),
        }
    }
}

/// Structured event emitted during a layout run
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    /// A config option was invalid and its default was used instead
    ConfigSanitized { field: &'static str },
    /// A position detail was dropped because of a broken reference
    DetailSkipped { detail_id: String, reason: SkipReason },
    /// A stage finished; `items` is the number of things it produced
    StageCompleted { stage: Stage, items: usize },
}

/// Receiver of layout events
pub trait LayoutObserver: Send + Sync {
    fn on_event(&self, event: &LayoutEvent);
}

impl<F> LayoutObserver for F
where
    F: Fn(&LayoutEvent) + Send + Sync,
{
    fn on_event(&self, event: &LayoutEvent) {
        self(event)
    }
}

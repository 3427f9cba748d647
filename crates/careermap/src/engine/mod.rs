//! Layout stages
//!
//! Each stage is a pure function over immutable input. [`LayoutEngine`]
//! wires them together; hosts that need a single stage can call it directly.

mod angles;
mod bounds;
mod jitter;
pub mod placement;
mod pipeline;
mod relationships;
pub mod routing;

pub use angles::assign_angles;
pub use bounds::compute_bounds;
pub use jitter::jitter;
pub use pipeline::{LayoutEngine, PathRoute};
pub use placement::{place_nodes, NodePlacer, Placement};
pub use relationships::{analyze, Relationships};
pub use routing::{generate_route, plan_route, route_between, PathCommand, Route, RouteGenerator};

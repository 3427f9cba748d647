//! Careermap - Lay out career paths as a transit map
//!
//! Paths become metro lines, positions shared by several paths become
//! interchange stations, and every station gets a deterministic 2-D
//! coordinate. Routes between stations are rendered as SVG path strings.
//!
//! # Quick Start
//!
//! ```rust
//! use careermap::{compute_layout, LayoutConfig, Path, Position, PositionDetail};
//!
//! let paths = vec![Path::new("eng", "Engineering", "#d33")];
//! let positions = vec![Position::new("dev", "Developer"), Position::new("lead", "Lead")];
//! let details = vec![
//!     PositionDetail::new("d1", "dev", "eng", 1),
//!     PositionDetail::new("d2", "lead", "eng", 2),
//! ];
//!
//! let layout = compute_layout(&paths, &positions, &details, &LayoutConfig::default());
//! assert_eq!(layout.nodes.len(), 2);
//! assert_eq!(layout.paths[0].node_ids, vec!["d1", "d2"]);
//! ```
//!
//! # Advanced Usage
//!
//! For observers, route helpers or a non-default placement strategy, use the
//! engine directly:
//!
//! ```rust
//! use careermap::prelude::*;
//!
//! let config = LayoutConfig {
//!     placement: PlacementStrategy::grid(),
//!     route_mode: RouteMode::Manhattan,
//!     ..LayoutConfig::default()
//! };
//! let engine = LayoutEngine::with_config(config)
//!     .with_observer(|event: &LayoutEvent| println!("{:?}", event));
//!
//! let input = LayoutInput::from_json(r#"{
//!     "paths": [{ "id": "eng", "name": "Engineering" }],
//!     "positions": [{ "id": "dev", "name": "Developer" }, { "id": "lead", "name": "Lead" }],
//!     "positionDetails": [
//!         { "id": "d1", "positionId": "dev", "careerPathId": "eng", "level": 1 },
//!         { "id": "d2", "positionId": "lead", "careerPathId": "eng", "level": 2 }
//!     ]
//! }"#).unwrap();
//!
//! let layout = engine.compute_input(&input);
//! let route = engine.route_path(&layout, "eng").unwrap();
//! assert!(route.starts_with("M "));
//! ```

pub mod core;
pub mod engine;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::core::*;
pub use engine::{LayoutEngine, PathCommand, PathRoute, Route};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Bounds, LayoutConfig, LayoutError, LayoutEvent, LayoutInput, LayoutNode, LayoutObserver,
        LayoutPath, LayoutResult, Path, PlacementStrategy, Point, Position, PositionDetail,
        RouteMode, RouteOptions,
    };
    pub use crate::engine::{LayoutEngine, NodePlacer, Route, RouteGenerator};
}

/// Compute a complete layout
///
/// Never fails: rows with broken references are skipped and listed in
/// [`LayoutResult::skipped`], invalid config values fall back to defaults,
/// and empty input yields an empty layout with the default bounds.
///
/// # Example
/// ```rust
/// use careermap::{compute_layout, LayoutConfig};
///
/// let layout = compute_layout(&[], &[], &[], &LayoutConfig::default());
/// assert!(layout.nodes.is_empty());
/// assert_eq!(layout.bounds.min_x, -100.0);
/// ```
pub fn compute_layout(
    paths: &[Path],
    positions: &[Position],
    position_details: &[PositionDetail],
    config: &LayoutConfig,
) -> LayoutResult {
    LayoutEngine::with_config(config.clone()).compute(paths, positions, position_details)
}

/// Path string through `nodes`, sorted by level, sequence, x and y
///
/// Returns an empty string for fewer than two nodes.
///
/// # Example
/// ```rust
/// use careermap::{compute_layout, generate_route, LayoutConfig, RouteMode, RouteOptions};
/// # use careermap::{Path, Position, PositionDetail};
/// # let paths = vec![Path::new("eng", "Engineering", "#d33")];
/// # let positions = vec![Position::new("dev", "Developer"), Position::new("lead", "Lead")];
/// # let details = vec![
/// #     PositionDetail::new("d1", "dev", "eng", 1),
/// #     PositionDetail::new("d2", "lead", "eng", 2),
/// # ];
///
/// let layout = compute_layout(&paths, &positions, &details, &LayoutConfig::default());
/// let d = generate_route(&layout.nodes, RouteMode::Direct, &RouteOptions::default());
/// assert!(d.starts_with("M ") && d.contains(" L "));
/// ```
pub fn generate_route(nodes: &[LayoutNode], mode: RouteMode, options: &RouteOptions) -> String {
    engine::generate_route(nodes, mode, options)
}

//! Layout pipeline
//!
//! Runs the stages in dependency order:
//! Analyzer → Angle assigner → Node placer → Bounds
//!
//! Routes are generated on demand from a finished [`LayoutResult`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, warn, Level};

use super::placement::validate_details;
use super::{analyze, assign_angles, compute_bounds, place_nodes, RouteGenerator};
use crate::core::{
    LayoutConfig, LayoutError, LayoutEvent, LayoutInput, LayoutObserver, LayoutPath, LayoutResult,
    Path, Position, PositionDetail, Result, Stage,
};

/// Route string of one laid-out path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRoute {
    pub path_id: String,
    pub color: String,
    /// SVG path description; empty when the path has fewer than two stations
    pub d: String,
}

/// Layout engine holding a configuration and an optional observer
///
/// The engine keeps no state between runs; every call to [`compute`]
/// produces a fresh result from its inputs.
///
/// [`compute`]: LayoutEngine::compute
pub struct LayoutEngine {
    config: LayoutConfig,
    observer: Option<Box<dyn LayoutObserver>>,
}

impl LayoutEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// Create an engine with the given configuration
    ///
    /// Invalid options are replaced by their defaults when a layout runs;
    /// use [`LayoutConfig::validate`] first to reject them instead.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Attach an observer receiving structured events from every run
    pub fn with_observer(mut self, observer: impl LayoutObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    fn emit(&self, event: LayoutEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }

    /// Lay out the given paths
    pub fn compute(
        &self,
        paths: &[Path],
        positions: &[Position],
        details: &[PositionDetail],
    ) -> LayoutResult {
        self.run(&self.config, paths, positions, details)
    }

    /// Lay out a deserialized input; its own config wins over the engine's
    pub fn compute_input(&self, input: &LayoutInput) -> LayoutResult {
        let config = input.config.as_ref().unwrap_or(&self.config);
        self.run(
            config,
            &input.paths,
            &input.positions,
            &input.position_details,
        )
    }

    fn sanitize(&self, config: &LayoutConfig) -> LayoutConfig {
        let sanitized = config.sanitized();
        for field in sanitized.replaced {
            warn!(field, "Invalid config option, using default");
            self.emit(LayoutEvent::ConfigSanitized { field });
        }
        sanitized.config
    }

    fn run(
        &self,
        config: &LayoutConfig,
        paths: &[Path],
        positions: &[Position],
        details: &[PositionDetail],
    ) -> LayoutResult {
        let layout_span = span!(
            Level::INFO,
            "compute_layout",
            path_count = paths.len(),
            position_count = positions.len(),
            detail_count = details.len()
        );
        let _enter = layout_span.enter();

        info!("Starting layout computation");
        let config = self.sanitize(config);

        // Rows with broken references take no part in any stage
        let (valid, skipped) = validate_details(paths, positions, details);
        for skip in &skipped {
            self.emit(LayoutEvent::DetailSkipped {
                detail_id: skip.detail_id.clone(),
                reason: skip.reason.clone(),
            });
        }
        let valid: Vec<PositionDetail> = valid.into_iter().cloned().collect();

        // Step 1: Relationships
        let relationships = analyze(&valid);
        self.emit(LayoutEvent::StageCompleted {
            stage: Stage::Analyze,
            items: relationships.centrality_scores().len(),
        });

        // Step 2: Angles
        let angles = assign_angles(
            paths,
            &relationships,
            config.start_angle_deg,
            config.angle_spread_deg,
            &config.relaxation(),
        );
        self.emit(LayoutEvent::StageCompleted {
            stage: Stage::AssignAngles,
            items: angles.len(),
        });

        // Step 3: Nodes
        let mut placement = place_nodes(paths, positions, &valid, &relationships, &angles, &config);
        self.emit(LayoutEvent::StageCompleted {
            stage: Stage::PlaceNodes,
            items: placement.nodes.len(),
        });

        let layout_paths: Vec<LayoutPath> = paths
            .iter()
            .map(|path| LayoutPath {
                id: path.id.clone(),
                name: path.name.clone(),
                color: path.color.clone(),
                angle: angles.get(&path.id).copied().unwrap_or(0.0),
                node_ids: placement.path_nodes.remove(&path.id).unwrap_or_default(),
            })
            .collect();

        // Step 4: Bounds
        let bounds = compute_bounds(&placement.nodes, config.padding, config.padding);
        self.emit(LayoutEvent::StageCompleted {
            stage: Stage::ComputeBounds,
            items: placement.nodes.len(),
        });
        debug!(
            width = bounds.width(),
            height = bounds.height(),
            "Bounds computed"
        );

        info!(
            nodes = placement.nodes.len(),
            paths = layout_paths.len(),
            skipped = skipped.len(),
            "Layout completed"
        );

        LayoutResult {
            nodes: placement.nodes,
            paths: layout_paths,
            bounds,
            skipped,
            routing: Some(config.route_settings()),
        }
    }

    /// Router for `result`, using the settings it was computed with
    fn router(&self, result: &LayoutResult) -> RouteGenerator {
        let settings = result
            .routing
            .unwrap_or_else(|| self.config.sanitized().config.route_settings());
        RouteGenerator::new(settings.mode, settings.options)
    }

    /// Route string of one path of a finished layout
    ///
    /// Uses the route settings the layout was computed with, falling back to
    /// the engine's config for results built elsewhere.
    pub fn route_path(&self, result: &LayoutResult, path_id: &str) -> Result<String> {
        if result.path(path_id).is_none() {
            return Err(LayoutError::unknown_path(path_id));
        }
        let nodes = result.nodes_for_path(path_id);
        Ok(self.router(result).plan(nodes).to_string())
    }

    /// Route strings of every path, in path order
    pub fn route_all(&self, result: &LayoutResult) -> Vec<PathRoute> {
        let router = self.router(result);
        result
            .paths
            .iter()
            .map(|path| PathRoute {
                path_id: path.id.clone(),
                color: path.color.clone(),
                d: router.plan(result.nodes_for_path(&path.id)).to_string(),
            })
            .collect()
    }

    /// Route string connecting two nodes of a finished layout
    pub fn route_between(&self, result: &LayoutResult, from_id: &str, to_id: &str) -> Result<String> {
        let from = result
            .node(from_id)
            .ok_or_else(|| LayoutError::unknown_node(from_id))?;
        let to = result
            .node(to_id)
            .ok_or_else(|| LayoutError::unknown_node(to_id))?;
        Ok(self.router(result).connect(from.point(), to.point()).to_string())
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .field("has_observer", &self.has_observer())
            .finish()
    }
}

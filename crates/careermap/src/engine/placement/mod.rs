//! Node placement
//!
//! Placement runs in two passes. The first drops details with broken
//! references, groups the rest by path and orders each group (sequence when
//! present, else level). The second asks the configured [`NodePlacer`] for a
//! coordinate per detail and adds the deterministic jitter.
//!
//! Strategies only differ in their coordinate formula; validation, ordering,
//! interchange flags and jitter are shared.

mod grid;
mod linear;
mod polar;

pub use grid::GridPlacer;
pub use linear::LinearPlacer;
pub use polar::PolarPlacer;

use std::collections::{HashMap, HashSet};
use tracing::{debug, span, trace, warn, Level};

use super::{jitter, Relationships};
use crate::core::{
    group_by, LayoutConfig, LayoutNode, Path, PlacementStrategy, Point, Position,
    PositionDetail, SkipReason, SkippedDetail,
};

/// Share of one level step that separates consecutive sequence numbers
pub(crate) const SEQUENCE_SPREAD: f64 = 0.3;

/// Level range of the placed details
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelRange {
    pub min: f64,
    pub max: f64,
    /// Radial anchor; the range midpoint unless overridden
    pub mid: f64,
}

impl LevelRange {
    fn of(details: &[&PositionDetail], mid_override: Option<f64>) -> Self {
        let (min, max) = details
            .iter()
            .map(|d| d.level as f64)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), l| {
                (lo.min(l), hi.max(l))
            });
        let (min, max) = if min.is_finite() { (min, max) } else { (0.0, 0.0) };
        Self {
            min,
            max,
            mid: mid_override.unwrap_or((min + max) / 2.0),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Everything a strategy needs to know about one detail
#[derive(Debug, Clone, Copy)]
pub struct NodeSlot<'a> {
    pub detail: &'a PositionDetail,
    /// Relaxed angle of the owning path
    pub path_angle: f64,
    /// Position of the owning path when paths are sorted by angle
    pub path_rank: usize,
    /// Index of the detail inside its ordered path
    pub index: usize,
    /// Number of placed details in the path
    pub count: usize,
    pub centrality: usize,
}

impl NodeSlot<'_> {
    /// Offset spreading details that share a level, in units of `step`
    pub fn sequence_offset(&self, step: f64) -> f64 {
        self.detail
            .sequence_in_path
            .map_or(0.0, |seq| {
                (f64::from(seq) - f64::from(self.detail.level)) * SEQUENCE_SPREAD * step
            })
    }
}

/// Shared, read-only state for one placement pass
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub config: &'a LayoutConfig,
    pub levels: LevelRange,
    pub path_count: usize,
}

/// Coordinate formula of a placement strategy
pub trait NodePlacer: Send + Sync {
    /// Position of one detail, before jitter
    fn locate(&self, slot: &NodeSlot<'_>, ctx: &PlacementContext<'_>) -> Point;

    /// Name of this strategy
    fn name(&self) -> &'static str;
}

/// Build the placer for a configured strategy
pub fn placer_for(strategy: &PlacementStrategy) -> Box<dyn NodePlacer> {
    match *strategy {
        PlacementStrategy::Polar => Box::new(PolarPlacer),
        PlacementStrategy::Grid {
            column_spacing,
            row_spacing,
        } => Box::new(GridPlacer::new(column_spacing, row_spacing)),
        PlacementStrategy::Linear {
            level_spacing,
            lane_spacing,
        } => Box::new(LinearPlacer::new(level_spacing, lane_spacing)),
    }
}

/// Output of the placement stage
#[derive(Debug, Clone, Default)]
pub struct Placement {
    pub nodes: Vec<LayoutNode>,
    /// Placed node ids per path id, in station order
    pub path_nodes: HashMap<String, Vec<String>>,
    pub skipped: Vec<SkippedDetail>,
}

/// Split details into placeable rows and rows with broken references
pub fn validate_details<'a>(
    paths: &[Path],
    positions: &[Position],
    details: &'a [PositionDetail],
) -> (Vec<&'a PositionDetail>, Vec<SkippedDetail>) {
    let path_ids: HashSet<&str> = paths.iter().map(|p| p.id.as_str()).collect();
    let position_ids: HashSet<&str> = positions.iter().map(|p| p.id.as_str()).collect();

    let mut valid = Vec::with_capacity(details.len());
    let mut skipped = Vec::new();
    for detail in details {
        let reason = if !position_ids.contains(detail.position_id.as_str()) {
            Some(SkipReason::MissingPosition {
                position_id: detail.position_id.clone(),
            })
        } else if !path_ids.contains(detail.career_path_id.as_str()) {
            Some(SkipReason::MissingPath {
                path_id: detail.career_path_id.clone(),
            })
        } else {
            None
        };

        match reason {
            Some(reason) => {
                warn!(detail_id = detail.id.as_str(), %reason, "Skipping position detail");
                skipped.push(SkippedDetail {
                    detail_id: detail.id.clone(),
                    reason,
                });
            }
            None => valid.push(detail),
        }
    }
    (valid, skipped)
}

/// Rank of every path when sorted by angle, input order breaking ties
fn path_ranks(paths: &[Path], angles: &HashMap<String, f64>) -> HashMap<String, usize> {
    let mut order: Vec<(usize, f64)> = paths
        .iter()
        .enumerate()
        .map(|(i, p)| (i, angles.get(&p.id).copied().unwrap_or(0.0)))
        .collect();
    order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    order
        .into_iter()
        .enumerate()
        .map(|(rank, (i, _))| (paths[i].id.clone(), rank))
        .collect()
}

/// Place every valid detail of every path
pub fn place_nodes(
    paths: &[Path],
    positions: &[Position],
    details: &[PositionDetail],
    relationships: &Relationships,
    angles: &HashMap<String, f64>,
    config: &LayoutConfig,
) -> Placement {
    let placer = placer_for(&config.placement);
    let place_span = span!(
        Level::DEBUG,
        "place_nodes",
        strategy = placer.name(),
        detail_count = details.len()
    );
    let _enter = place_span.enter();

    // Pass 1: validate, group, order
    let (valid, skipped) = validate_details(paths, positions, details);
    let ctx = PlacementContext {
        config,
        levels: LevelRange::of(&valid, config.mid_level_override),
        path_count: paths.len(),
    };
    let by_path = group_by(valid, |d| d.career_path_id.clone());
    let ranks = path_ranks(paths, angles);
    trace!(
        min_level = ctx.levels.min,
        max_level = ctx.levels.max,
        mid_level = ctx.levels.mid,
        "Level range"
    );

    // Pass 2: coordinates
    let mut nodes = Vec::new();
    let mut path_nodes = HashMap::with_capacity(paths.len());
    for path in paths {
        let mut ordered: Vec<&PositionDetail> = by_path.get(&path.id).to_vec();
        ordered.sort_by(|a, b| {
            a.order_key()
                .cmp(&b.order_key())
                .then(a.level.cmp(&b.level))
                .then_with(|| a.id.cmp(&b.id))
        });

        let path_angle = angles.get(&path.id).copied().unwrap_or(0.0);
        let count = ordered.len();
        let mut ids = Vec::with_capacity(count);
        for (index, detail) in ordered.into_iter().enumerate() {
            let centrality = relationships.centrality(&detail.position_id);
            let slot = NodeSlot {
                detail,
                path_angle,
                path_rank: ranks.get(&path.id).copied().unwrap_or(0),
                index,
                count,
                centrality,
            };
            let point = placer
                .locate(&slot, &ctx)
                .add(jitter(&detail.id, config.jitter_seed, config.jitter_amount));
            // Degenerate config can still produce non-finite values
            let point = if point.is_finite() { point } else { Point::ORIGIN };

            ids.push(detail.id.clone());
            nodes.push(LayoutNode {
                id: detail.id.clone(),
                position_id: detail.position_id.clone(),
                path_id: path.id.clone(),
                level: detail.level,
                x: point.x,
                y: point.y,
                color: path.color.clone(),
                is_interchange: centrality > 1,
                sequence_in_path: detail.sequence_in_path,
            });
        }
        path_nodes.insert(path.id.clone(), ids);
    }

    debug!(
        node_count = nodes.len(),
        skipped = skipped.len(),
        "Node placement completed"
    );

    Placement {
        nodes,
        path_nodes,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyze;

    fn fixture() -> (Vec<Path>, Vec<Position>, Vec<PositionDetail>) {
        let paths = vec![
            Path::new("eng", "Engineering", "#e00"),
            Path::new("design", "Design", "#00e"),
        ];
        let positions = vec![
            Position::new("junior", "Junior"),
            Position::new("lead", "Lead"),
            Position::new("senior", "Senior"),
        ];
        let details = vec![
            PositionDetail::new("e3", "lead", "eng", 3),
            PositionDetail::new("e1", "junior", "eng", 1),
            PositionDetail::new("e2", "senior", "eng", 2),
            PositionDetail::new("d3", "lead", "design", 3),
            PositionDetail::new("ghost", "missing", "eng", 2),
            PositionDetail::new("orphan", "senior", "nowhere", 2),
        ];
        (paths, positions, details)
    }

    fn run(config: &LayoutConfig) -> Placement {
        let (paths, positions, details) = fixture();
        let rel = analyze(&details);
        let angles = HashMap::from([("eng".to_string(), 0.0), ("design".to_string(), 2.0)]);
        place_nodes(&paths, &positions, &details, &rel, &angles, config)
    }

    #[test]
    fn test_broken_references_are_skipped() {
        let placement = run(&LayoutConfig::default());
        assert_eq!(placement.nodes.len(), 4);
        let skipped: Vec<_> = placement.skipped.iter().map(|s| s.detail_id.as_str()).collect();
        assert_eq!(skipped, vec!["ghost", "orphan"]);
        assert!(matches!(
            placement.skipped[0].reason,
            SkipReason::MissingPosition { .. }
        ));
        assert!(matches!(
            placement.skipped[1].reason,
            SkipReason::MissingPath { .. }
        ));
    }

    #[test]
    fn test_nodes_ordered_per_path() {
        let placement = run(&LayoutConfig::default());
        assert_eq!(placement.path_nodes["eng"], vec!["e1", "e2", "e3"]);
        let ids: Vec<_> = placement.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2", "e3", "d3"]);
    }

    #[test]
    fn test_sequence_overrides_level_order() {
        let paths = vec![Path::new("eng", "Engineering", "#e00")];
        let positions = vec![Position::new("a", "A"), Position::new("b", "B")];
        let details = vec![
            PositionDetail::new("first", "a", "eng", 5).with_sequence(1),
            PositionDetail::new("second", "b", "eng", 2).with_sequence(2),
        ];
        let rel = analyze(&details);
        let angles = HashMap::from([("eng".to_string(), 0.0)]);
        let placement = place_nodes(
            &paths,
            &positions,
            &details,
            &rel,
            &angles,
            &LayoutConfig::default(),
        );
        assert_eq!(placement.path_nodes["eng"], vec!["first", "second"]);
    }

    #[test]
    fn test_interchange_flag_and_color() {
        let placement = run(&LayoutConfig::default());
        let lead: Vec<_> = placement
            .nodes
            .iter()
            .filter(|n| n.position_id == "lead")
            .collect();
        assert_eq!(lead.len(), 2);
        assert!(lead.iter().all(|n| n.is_interchange));
        let junior = placement.nodes.iter().find(|n| n.id == "e1").unwrap();
        assert!(!junior.is_interchange);
        assert_eq!(junior.color, "#e00");
    }

    #[test]
    fn test_level_range_ignores_skipped_rows() {
        let (paths, positions, details) = fixture();
        let (valid, _) = validate_details(&paths, &positions, &details);
        let levels = LevelRange::of(&valid, None);
        assert_eq!((levels.min, levels.max, levels.mid), (1.0, 3.0, 2.0));
        assert_eq!(LevelRange::of(&valid, Some(0.5)).mid, 0.5);
        assert_eq!(LevelRange::of(&[], None).span(), 0.0);
    }

    #[test]
    fn test_path_ranks_follow_angles() {
        let paths = vec![
            Path::new("a", "A", ""),
            Path::new("b", "B", ""),
            Path::new("c", "C", ""),
        ];
        let angles = HashMap::from([
            ("a".to_string(), 3.0),
            ("b".to_string(), 1.0),
            ("c".to_string(), 1.0),
        ]);
        let ranks = path_ranks(&paths, &angles);
        assert_eq!((ranks["b"], ranks["c"], ranks["a"]), (0, 1, 2));
    }

    #[test]
    fn test_every_strategy_places_every_node() {
        for strategy in [
            PlacementStrategy::Polar,
            PlacementStrategy::grid(),
            PlacementStrategy::linear(),
        ] {
            let config = LayoutConfig {
                placement: strategy,
                ..LayoutConfig::default()
            };
            let placement = run(&config);
            assert_eq!(placement.nodes.len(), 4, "{}", strategy.name());
            assert!(placement.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
        }
    }
}

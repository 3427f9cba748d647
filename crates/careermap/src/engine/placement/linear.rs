use super::{NodePlacer, NodeSlot, PlacementContext};
use crate::core::Point;

/// One horizontal lane per path (ordered by angle), levels along x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPlacer {
    level_spacing: f64,
    lane_spacing: f64,
}

impl LinearPlacer {
    pub fn new(level_spacing: f64, lane_spacing: f64) -> Self {
        Self {
            level_spacing,
            lane_spacing,
        }
    }
}

impl NodePlacer for LinearPlacer {
    fn locate(&self, slot: &NodeSlot<'_>, ctx: &PlacementContext<'_>) -> Point {
        let lanes = ctx.path_count.max(1) as f64;
        let x = (slot.detail.level as f64 - ctx.levels.min) * self.level_spacing
            + slot.sequence_offset(self.level_spacing)
            - ctx.levels.span() * self.level_spacing / 2.0;
        let y = slot.path_rank as f64 * self.lane_spacing - (lanes - 1.0) * self.lane_spacing / 2.0;
        Point::new(x, y)
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

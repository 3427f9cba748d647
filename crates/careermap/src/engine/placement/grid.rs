use super::{NodePlacer, NodeSlot, PlacementContext};
use crate::core::Point;

/// One column per path (ordered by angle), one row per level
///
/// Senior levels sit at the top. Details sharing a level inside one path are
/// spread horizontally by their sequence number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlacer {
    column_spacing: f64,
    row_spacing: f64,
}

impl GridPlacer {
    pub fn new(column_spacing: f64, row_spacing: f64) -> Self {
        Self {
            column_spacing,
            row_spacing,
        }
    }
}

impl NodePlacer for GridPlacer {
    fn locate(&self, slot: &NodeSlot<'_>, ctx: &PlacementContext<'_>) -> Point {
        let columns = ctx.path_count.max(1) as f64;
        let x = slot.path_rank as f64 * self.column_spacing
            - (columns - 1.0) * self.column_spacing / 2.0
            + slot.sequence_offset(self.column_spacing);
        let y = (ctx.levels.max - slot.detail.level as f64) * self.row_spacing
            - ctx.levels.span() * self.row_spacing / 2.0;
        Point::new(x, y)
    }

    fn name(&self) -> &'static str {
        "grid"
    }
}

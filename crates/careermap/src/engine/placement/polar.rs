use std::f64::consts::PI;

use super::{NodePlacer, NodeSlot, PlacementContext};
use crate::core::Point;

/// Lines radiate from the center; levels sit on rings around the mid level
#[derive(Debug, Clone, Copy, Default)]
pub struct PolarPlacer;

impl PolarPlacer {
    /// Distance from the center before centrality and sequence adjustments
    fn base_radius(slot: &NodeSlot<'_>, ctx: &PlacementContext<'_>) -> f64 {
        let config = ctx.config;
        let level = slot.detail.level as f64;
        if config.center_radius < 0.0 {
            // Radial fan: rings grow outward from the lowest level
            config.center_radius.abs() + config.radius_step * (level - ctx.levels.min)
        } else {
            config.center_radius + config.radius_step * (level - ctx.levels.mid).abs()
        }
    }

    fn radius(slot: &NodeSlot<'_>, ctx: &PlacementContext<'_>) -> f64 {
        let step = ctx.config.radius_step;
        let radius = (Self::base_radius(slot, ctx) + slot.sequence_offset(step)).max(0.0);
        if slot.centrality > 1 {
            radius / (slot.centrality as f64).powf(ctx.config.centrality_factor)
        } else {
            radius
        }
    }

    /// Bow long lines so consecutive stations do not sit on one ray
    fn curve_offset(slot: &NodeSlot<'_>, ctx: &PlacementContext<'_>) -> f64 {
        if slot.count < 2 {
            return 0.0;
        }
        let t = slot.index as f64 / (slot.count - 1) as f64;
        ctx.config.curve_strength * ((slot.count + 1) as f64).ln() * (PI * t).sin()
    }

    fn level_offset(slot: &NodeSlot<'_>, ctx: &PlacementContext<'_>) -> f64 {
        ctx.config.level_angle_nudge * (slot.detail.level as f64 - ctx.levels.mid)
    }
}

impl NodePlacer for PolarPlacer {
    fn locate(&self, slot: &NodeSlot<'_>, ctx: &PlacementContext<'_>) -> Point {
        let angle = slot.path_angle + Self::curve_offset(slot, ctx) + Self::level_offset(slot, ctx);
        Point::from_polar(Self::radius(slot, ctx), angle)
    }

    fn name(&self) -> &'static str {
        "polar"
    }
}

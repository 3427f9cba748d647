//! Padded bounding box of placed nodes

use tracing::{span, trace, Level};

use crate::core::{Bounds, LayoutNode};

/// Bounding box of `nodes` grown by the given padding on each side
///
/// Non-finite coordinates are ignored. When nothing finite is left the
/// default ±100 box is returned, so callers never see NaN or infinity.
pub fn compute_bounds(nodes: &[LayoutNode], padding_x: f64, padding_y: f64) -> Bounds {
    let bounds_span = span!(Level::DEBUG, "compute_bounds", node_count = nodes.len());
    let _enter = bounds_span.enter();

    let padding_x = if padding_x.is_finite() { padding_x.max(0.0) } else { 0.0 };
    let padding_y = if padding_y.is_finite() { padding_y.max(0.0) } else { 0.0 };

    let mut extent: Option<Bounds> = None;
    for node in nodes.iter().filter(|n| n.x.is_finite() && n.y.is_finite()) {
        let b = extent.get_or_insert(Bounds {
            min_x: node.x,
            max_x: node.x,
            min_y: node.y,
            max_y: node.y,
        });
        b.min_x = b.min_x.min(node.x);
        b.max_x = b.max_x.max(node.x);
        b.min_y = b.min_y.min(node.y);
        b.max_y = b.max_y.max(node.y);
    }

    let Some(b) = extent else {
        trace!("No finite coordinates, using default bounds");
        return Bounds::default();
    };

    let padded = Bounds {
        min_x: b.min_x - padding_x,
        max_x: b.max_x + padding_x,
        min_y: b.min_y - padding_y,
        max_y: b.max_y + padding_y,
    };
    trace!(
        min_x = padded.min_x,
        max_x = padded.max_x,
        min_y = padded.min_y,
        max_y = padded.max_y,
        "Bounds computed"
    );
    padded
}

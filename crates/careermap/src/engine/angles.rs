//! Angle assignment by force relaxation
//!
//! Paths start evenly spread over the configured arc. Every iteration each
//! path is pushed away from every other path (harder the closer they are) and
//! pulled towards the paths it shares positions with. Damping decays linearly
//! to zero over the iteration budget, so the last iterations only fine-tune.

use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::{debug, span, trace, Level};

use super::Relationships;
use crate::core::{normalize_angle, wrap_angle, Path, Relaxation};

/// Closest two paths are treated as being for repulsion purposes
const MIN_REPULSION_DISTANCE: f64 = 0.1;
const OPPOSITE_EPSILON: f64 = 1e-9;

/// Assign one angle (radians, in `[0, 2π)`) to every path
pub fn assign_angles(
    paths: &[Path],
    relationships: &Relationships,
    start_angle_deg: f64,
    spread_deg: f64,
    relaxation: &Relaxation,
) -> HashMap<String, f64> {
    let angles_span = span!(
        Level::DEBUG,
        "assign_angles",
        path_count = paths.len(),
        iterations = relaxation.iterations
    );
    let _enter = angles_span.enter();

    let start = start_angle_deg.to_radians();
    let spread = spread_deg.to_radians();
    let n = paths.len();

    if n == 0 {
        return HashMap::new();
    }
    if n == 1 {
        trace!("Single path, skipping relaxation");
        return HashMap::from([(paths[0].id.clone(), normalize_angle(start))]);
    }

    let mut angles: Vec<f64> = (0..n)
        .map(|i| start + spread * i as f64 / n as f64)
        .collect();

    let strengths: Vec<Vec<f64>> = paths
        .iter()
        .map(|a| {
            paths
                .iter()
                .map(|b| relationships.strength(&a.id, &b.id) as f64)
                .collect()
        })
        .collect();

    let mut forces = vec![0.0; n];
    for iteration in 0..relaxation.iterations {
        let damping = 1.0 - iteration as f64 / relaxation.iterations as f64;

        for (i, force) in forces.iter_mut().enumerate() {
            *force = (0..n)
                .filter(|&j| j != i)
                .map(|j| pair_force(i, j, &angles, strengths[i][j], relaxation))
                .sum();
        }

        for (angle, force) in angles.iter_mut().zip(&forces) {
            *angle += force * damping * relaxation.step_scale;
        }

        trace!(
            iteration,
            damping,
            max_force = forces.iter().fold(0.0_f64, |m, f| m.max(f.abs())),
            "Relaxation step"
        );
    }

    let assigned: HashMap<String, f64> = paths
        .iter()
        .zip(angles)
        .map(|(path, angle)| (path.id.clone(), normalize_angle(angle)))
        .collect();

    debug!(path_count = assigned.len(), "Angle assignment completed");
    assigned
}

/// Force on path `i` caused by path `j`; positive turns `i` clockwise
fn pair_force(i: usize, j: usize, angles: &[f64], strength: f64, relaxation: &Relaxation) -> f64 {
    let distance = wrap_angle(angles[i] - angles[j]);
    // Direction that splits coincident or opposite paths, mirrored for the pair
    let tie = if i < j { -1.0 } else { 1.0 };

    if PI - distance.abs() < OPPOSITE_EPSILON {
        // Pushed equally from both sides; only attraction can pick a side
        return if strength > 0.0 {
            -tie * relaxation.attraction * strength
        } else {
            0.0
        };
    }

    let away = if distance > 0.0 {
        1.0
    } else if distance < 0.0 {
        -1.0
    } else {
        tie
    };

    let mut force = away * relaxation.repulsion / distance.abs().max(MIN_REPULSION_DISTANCE);
    if strength > 0.0 {
        force -= away * relaxation.attraction * strength;
    }
    force
}

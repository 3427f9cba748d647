//! Route generation for placed paths
//!
//! Turns an ordered list of stations into an SVG path description. Three
//! modes are supported: straight segments, orthogonal ("Manhattan") segments,
//! and orthogonal segments whose corners are rounded with circular arcs.
//!
//! Degenerate geometry never produces malformed output: short legs collapse
//! into direct segments, tight or collinear corners stay sharp, and fewer
//! than two stations give an empty route.

use std::cmp::Ordering;
use std::fmt;

use tracing::{span, trace, Level};

use crate::core::{format_number, LayoutNode, Point, RouteMode, RouteOptions};

/// Legs shorter than this keep a sharp corner in smooth mode
pub const MIN_ARC_SEGMENT: f64 = 2.0;

const COLLINEAR_EPSILON: f64 = 1e-9;

/// One command of an SVG path description
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc; `sweep` is the SVG sweep flag (clockwise on screen)
    ArcTo { radius: f64, sweep: bool, to: Point },
}

impl PathCommand {
    /// End point of this command
    pub fn end(&self) -> Point {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
            PathCommand::ArcTo { to, .. } => to,
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo(p) => write!(f, "M {} {}", format_number(p.x), format_number(p.y)),
            PathCommand::LineTo(p) => write!(f, "L {} {}", format_number(p.x), format_number(p.y)),
            PathCommand::ArcTo { radius, sweep, to } => write!(
                f,
                "A {r} {r} 0 0 {} {} {}",
                u8::from(*sweep),
                format_number(to.x),
                format_number(to.y),
                r = format_number(*radius)
            ),
        }
    }
}

/// A planned route; `Display` renders the path string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    commands: Vec<PathCommand>,
}

impl Route {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Radii of every arc in the route
    pub fn arc_radii(&self) -> impl Iterator<Item = f64> + '_ {
        self.commands.iter().filter_map(|c| match c {
            PathCommand::ArcTo { radius, .. } => Some(*radius),
            _ => None,
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

/// Route generator for one mode and option set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteGenerator {
    pub mode: RouteMode,
    pub options: RouteOptions,
}

impl RouteGenerator {
    /// Create a generator for the given mode
    pub fn new(mode: RouteMode, options: RouteOptions) -> Self {
        Self { mode, options }
    }

    /// Route through `nodes` in station order (level, sequence, x, y)
    pub fn plan<'a>(&self, nodes: impl IntoIterator<Item = &'a LayoutNode>) -> Route {
        let mut ordered: Vec<&LayoutNode> = nodes.into_iter().collect();
        ordered.sort_by(|a, b| station_order(a, b));
        let points: Vec<Point> = ordered.iter().map(|n| n.point()).collect();
        self.through(&points)
    }

    /// Route connecting two arbitrary points
    pub fn connect(&self, from: Point, to: Point) -> Route {
        self.through(&[from, to])
    }

    /// Route through `points` in the given order
    pub fn through(&self, points: &[Point]) -> Route {
        let points: Vec<Point> = points.iter().copied().filter(|p| p.is_finite()).collect();
        if points.len() < 2 {
            return Route::default();
        }

        let commands = match self.mode {
            RouteMode::Direct => polyline(&points),
            RouteMode::Manhattan => polyline(&self.manhattan_waypoints(&points)),
            RouteMode::Smooth => self.rounded(&self.manhattan_waypoints(&points)),
        };
        Route { commands }
    }

    /// Corner point between two stations, if both legs are long enough
    fn corner(&self, a: Point, b: Point) -> Option<Point> {
        let corner = if self.options.vertical_first {
            Point::new(a.x, b.y)
        } else {
            Point::new(b.x, a.y)
        };
        let min = self.options.min_segment_length;
        (a.distance(corner) >= min && corner.distance(b) >= min).then_some(corner)
    }

    fn manhattan_waypoints(&self, points: &[Point]) -> Vec<Point> {
        let mut waypoints = Vec::with_capacity(points.len() * 2);
        waypoints.push(points[0]);
        for pair in points.windows(2) {
            if let Some(corner) = self.corner(pair[0], pair[1]) {
                waypoints.push(corner);
            }
            waypoints.push(pair[1]);
        }
        waypoints
    }

    /// Polyline through `waypoints` with every interior corner rounded
    fn rounded(&self, waypoints: &[Point]) -> Vec<PathCommand> {
        let mut commands = vec![PathCommand::MoveTo(waypoints[0])];

        for window in waypoints.windows(3) {
            let (prev, corner, next) = (window[0], window[1], window[2]);
            match self.fillet(prev, corner, next) {
                Some((start, arc)) => {
                    commands.push(PathCommand::LineTo(start));
                    commands.push(arc);
                }
                None => commands.push(PathCommand::LineTo(corner)),
            }
        }

        if let Some(last) = waypoints.last() {
            commands.push(PathCommand::LineTo(*last));
        }
        commands
    }

    /// Arc replacing the corner at `corner`, with the point where it starts
    ///
    /// The tangent distance from the corner is capped at half of the shorter
    /// leg, so neighbouring arcs never overlap.
    fn fillet(&self, prev: Point, corner: Point, next: Point) -> Option<(Point, PathCommand)> {
        let incoming = corner.sub(prev);
        let outgoing = next.sub(corner);
        let (len_in, len_out) = (incoming.length(), outgoing.length());
        if len_in < MIN_ARC_SEGMENT || len_out < MIN_ARC_SEGMENT {
            return None;
        }

        let dir_in = incoming.normalized()?;
        let dir_out = outgoing.normalized()?;
        let cross = dir_in.cross(dir_out);
        if cross.abs() < COLLINEAR_EPSILON {
            return None;
        }

        // Turn angle between the legs, in (0, π)
        let turn = cross.atan2(dir_in.x * dir_out.x + dir_in.y * dir_out.y).abs();
        let half_tan = (turn / 2.0).tan();
        let half_leg = (len_in / 2.0).min(len_out / 2.0);

        let mut radius = self.options.corner_radius.min(half_leg);
        let mut tangent = radius * half_tan;
        if tangent > half_leg {
            tangent = half_leg;
            radius = tangent / half_tan;
        }
        if !(radius > 0.0 && radius.is_finite() && tangent.is_finite()) {
            return None;
        }

        let start = corner.sub(dir_in.scale(tangent));
        let end = corner.add(dir_out.scale(tangent));
        let arc = PathCommand::ArcTo {
            radius,
            sweep: cross > 0.0,
            to: end,
        };
        Some((start, arc))
    }
}

/// Station order used by every route mode
pub fn station_order(a: &LayoutNode, b: &LayoutNode) -> Ordering {
    a.level
        .cmp(&b.level)
        .then(a.sequence_in_path.cmp(&b.sequence_in_path))
        .then(a.x.total_cmp(&b.x))
        .then(a.y.total_cmp(&b.y))
}

fn polyline(points: &[Point]) -> Vec<PathCommand> {
    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo(points[0]));
    commands.extend(points[1..].iter().copied().map(PathCommand::LineTo));
    commands
}

/// Plan the route through `nodes` without rendering it
pub fn plan_route<'a>(
    nodes: impl IntoIterator<Item = &'a LayoutNode>,
    mode: RouteMode,
    options: &RouteOptions,
) -> Route {
    RouteGenerator::new(mode, *options).plan(nodes)
}

/// Path string through `nodes`; empty for fewer than two nodes
pub fn generate_route<'a>(
    nodes: impl IntoIterator<Item = &'a LayoutNode>,
    mode: RouteMode,
    options: &RouteOptions,
) -> String {
    let nodes: Vec<&LayoutNode> = nodes.into_iter().collect();
    let route_span = span!(
        Level::DEBUG,
        "generate_route",
        mode = %mode,
        node_count = nodes.len()
    );
    let _enter = route_span.enter();

    let route = plan_route(nodes, mode, options);
    trace!(commands = route.len(), "Route planned");
    route.to_string()
}

/// Path string for an ad-hoc connection between two points
pub fn route_between(from: Point, to: Point, mode: RouteMode, options: &RouteOptions) -> String {
    RouteGenerator::new(mode, *options)
        .connect(from, to)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, level: i32, x: f64, y: f64) -> LayoutNode {
        LayoutNode {
            id: id.to_string(),
            position_id: id.to_string(),
            path_id: "a".to_string(),
            level,
            x,
            y,
            color: "#000".to_string(),
            is_interchange: false,
            sequence_in_path: None,
        }
    }

    #[test]
    fn test_fewer_than_two_nodes_is_empty() {
        let options = RouteOptions::default();
        let empty: [LayoutNode; 0] = [];
        assert_eq!(generate_route(&empty, RouteMode::Smooth, &options), "");
        let single = [node("a", 1, 5.0, 5.0)];
        assert_eq!(generate_route(&single, RouteMode::Direct, &options), "");
    }

    #[test]
    fn test_direct_two_nodes() {
        let nodes = [node("a", 1, 0.0, 0.0), node("b", 2, 10.5, -3.25)];
        let path = generate_route(&nodes, RouteMode::Direct, &RouteOptions::default());
        assert_eq!(path, "M 0 0 L 10.5 -3.25");
    }

    #[test]
    fn test_nodes_sorted_by_level() {
        let nodes = [node("c", 3, 30.0, 0.0), node("a", 1, 10.0, 0.0), node("b", 2, 20.0, 0.0)];
        let path = generate_route(&nodes, RouteMode::Direct, &RouteOptions::default());
        assert_eq!(path, "M 10 0 L 20 0 L 30 0");
    }

    #[test]
    fn test_manhattan_vertical_first() {
        let nodes = [node("a", 1, 0.0, 0.0), node("b", 2, 40.0, 30.0)];
        let options = RouteOptions::default();
        let path = generate_route(&nodes, RouteMode::Manhattan, &options);
        assert_eq!(path, "M 0 0 L 0 30 L 40 30");

        let horizontal = RouteOptions {
            vertical_first: false,
            ..options
        };
        let path = generate_route(&nodes, RouteMode::Manhattan, &horizontal);
        assert_eq!(path, "M 0 0 L 40 0 L 40 30");
    }

    #[test]
    fn test_manhattan_short_leg_falls_back_to_direct() {
        let nodes = [node("a", 1, 0.0, 0.0), node("b", 2, 40.0, 0.5)];
        let path = generate_route(&nodes, RouteMode::Manhattan, &RouteOptions::default());
        assert_eq!(path, "M 0 0 L 40 0.5");
    }

    #[test]
    fn test_smooth_rounds_corner() {
        let nodes = [node("a", 1, 0.0, 0.0), node("b", 2, 40.0, 30.0)];
        let route = plan_route(&nodes, RouteMode::Smooth, &RouteOptions::default());
        assert_eq!(route.to_string(), "M 0 0 L 0 18 A 12 12 0 0 0 12 30 L 40 30");
        assert_eq!(route.arc_radii().collect::<Vec<_>>(), vec![12.0]);
    }

    #[test]
    fn test_smooth_radius_limited_by_short_leg() {
        let nodes = [node("a", 1, 0.0, 0.0), node("b", 2, 10.0, 6.0)];
        let route = plan_route(&nodes, RouteMode::Smooth, &RouteOptions::default());
        let radii: Vec<f64> = route.arc_radii().collect();
        assert_eq!(radii, vec![3.0]);
    }

    #[test]
    fn test_smooth_sweep_follows_turn() {
        let generator = RouteGenerator::new(RouteMode::Smooth, RouteOptions::default());
        // Down then right turns counter-clockwise on screen
        let left = generator.through(&[Point::new(0.0, 0.0), Point::new(0.0, 50.0), Point::new(50.0, 50.0)]);
        // Right then down turns clockwise on screen
        let right = generator.through(&[Point::new(0.0, 0.0), Point::new(50.0, 0.0), Point::new(50.0, 50.0)]);
        let sweep = |route: &Route| {
            route.commands().iter().find_map(|c| match c {
                PathCommand::ArcTo { sweep, .. } => Some(*sweep),
                _ => None,
            })
        };
        assert_eq!(sweep(&left), Some(false));
        assert_eq!(sweep(&right), Some(true));
    }

    #[test]
    fn test_smooth_tiny_legs_stay_sharp() {
        let generator = RouteGenerator::new(RouteMode::Smooth, RouteOptions::default());
        let route = generator.through(&[Point::new(0.0, 0.0), Point::new(0.0, 1.5), Point::new(40.0, 1.5)]);
        assert_eq!(route.arc_radii().count(), 0);
        assert_eq!(route.to_string(), "M 0 0 L 0 1.5 L 40 1.5");
    }

    #[test]
    fn test_smooth_collinear_stays_sharp() {
        let generator = RouteGenerator::new(RouteMode::Smooth, RouteOptions::default());
        let route = generator.through(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)]);
        assert_eq!(route.to_string(), "M 0 0 L 10 0 L 20 0");
    }

    #[test]
    fn test_non_finite_points_dropped() {
        let generator = RouteGenerator::new(RouteMode::Direct, RouteOptions::default());
        let route = generator.through(&[Point::new(f64::NAN, 0.0), Point::new(1.0, 1.0)]);
        assert!(route.is_empty());
    }

    #[test]
    fn test_route_between_points() {
        let path = route_between(
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            RouteMode::Manhattan,
            &RouteOptions::default(),
        );
        assert_eq!(path, "M 0 0 L 0 20 L 20 20");
    }
}

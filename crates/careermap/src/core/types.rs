//! Core type definitions for layout processing
//!
//! Input rows (`Path`, `Position`, `PositionDetail`) mirror the host
//! application's records and use its snake_case field names. Output types
//! (`LayoutNode`, `LayoutPath`, `Bounds`, `LayoutResult`) serialize in
//! camelCase for the rendering layer.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::{LayoutConfig, Point, Result, RouteSettings};

/// Half extent of the bounds returned for an empty layout
pub const DEFAULT_EXTENT: f64 = 100.0;

/// A named career path, drawn as one line of the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl Path {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// A generic role title, shared between paths through position details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub name: String,
}

impl Position {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One occurrence of a position inside one path at a seniority level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionDetail {
    pub id: String,
    #[serde(alias = "positionId")]
    pub position_id: String,
    #[serde(alias = "careerPathId", alias = "pathId")]
    pub career_path_id: String,
    pub level: i32,
    #[serde(default, alias = "sequenceInPath")]
    pub sequence_in_path: Option<i32>,
}

impl PositionDetail {
    pub fn new(
        id: impl Into<String>,
        position_id: impl Into<String>,
        career_path_id: impl Into<String>,
        level: i32,
    ) -> Self {
        Self {
            id: id.into(),
            position_id: position_id.into(),
            career_path_id: career_path_id.into(),
            level,
            sequence_in_path: None,
        }
    }

    /// Set the explicit order of this detail inside its path
    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence_in_path = Some(sequence);
        self
    }

    /// Key used to order details inside a path: sequence when present, else level
    pub fn order_key(&self) -> i32 {
        self.sequence_in_path.unwrap_or(self.level)
    }
}

/// A placed position detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    /// Same as the position detail id
    pub id: String,
    pub position_id: String,
    pub path_id: String,
    pub level: i32,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub is_interchange: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_in_path: Option<i32>,
}

impl LayoutNode {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A placed path with its final angle and ordered stations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPath {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Radians in `[0, 2π)`
    pub angle: f64,
    pub node_ids: Vec<String>,
}

/// Axis-aligned bounding box of a layout, padding included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: -DEFAULT_EXTENT,
            max_x: DEFAULT_EXTENT,
            min_y: -DEFAULT_EXTENT,
            max_y: DEFAULT_EXTENT,
        }
    }
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// SVG `viewBox` attribute value for these bounds
    pub fn view_box(&self) -> String {
        format!(
            "{} {} {} {}",
            super::format_number(self.min_x),
            super::format_number(self.min_y),
            super::format_number(self.width()),
            super::format_number(self.height())
        )
    }
}

/// Why a position detail was left out of the layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SkipReason {
    #[serde(rename_all = "camelCase")]
    MissingPosition { position_id: String },
    #[serde(rename_all = "camelCase")]
    MissingPath { path_id: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingPosition { position_id } => {
                write!(f, "references unknown position '{}'", position_id)
            }
            SkipReason::MissingPath { path_id } => {
                write!(f, "references unknown path '{}'", path_id)
            }
        }
    }
}

/// A position detail dropped because of a broken reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDetail {
    pub detail_id: String,
    pub reason: SkipReason,
}

/// Output of one layout run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub nodes: Vec<LayoutNode>,
    pub paths: Vec<LayoutPath>,
    pub bounds: Bounds,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedDetail>,
    /// Route settings of the config the layout ran with
    #[serde(skip)]
    pub routing: Option<RouteSettings>,
}

impl LayoutResult {
    /// Look up a node by position detail id
    ///
    /// Returns the first match when several paths reuse a detail id.
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a path by id
    pub fn path(&self, id: &str) -> Option<&LayoutPath> {
        self.paths.iter().find(|p| p.id == id)
    }

    /// Nodes of one path in station order
    pub fn nodes_for_path(&self, path_id: &str) -> Vec<&LayoutNode> {
        let Some(path) = self.path(path_id) else {
            return Vec::new();
        };
        let owned: HashMap<&str, &LayoutNode> = self
            .nodes
            .iter()
            .filter(|n| n.path_id == path_id)
            .map(|n| (n.id.as_str(), n))
            .collect();
        path.node_ids
            .iter()
            .filter_map(|id| owned.get(id.as_str()).copied())
            .collect()
    }

    /// All interchange nodes
    pub fn interchanges(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(|n| n.is_interchange)
    }
}

/// A complete input document as a host would hand it over
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInput {
    #[serde(default)]
    pub paths: Vec<Path>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default, alias = "position_details")]
    pub position_details: Vec<PositionDetail>,
    #[serde(default)]
    pub config: Option<LayoutConfig>,
}

impl LayoutInput {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_order_key() {
        let detail = PositionDetail::new("d1", "p1", "path", 4);
        assert_eq!(detail.order_key(), 4);
        assert_eq!(detail.with_sequence(1).order_key(), 1);
    }

    #[test]
    fn test_default_bounds() {
        let bounds = Bounds::default();
        assert_eq!(bounds.width(), 200.0);
        assert_eq!(bounds.height(), 200.0);
        assert_eq!(bounds.center(), Point::ORIGIN);
        assert_eq!(bounds.view_box(), "-100 -100 200 200");
    }

    #[test]
    fn test_layout_node_serializes_camel_case() {
        let node = LayoutNode {
            id: "d1".into(),
            position_id: "p1".into(),
            path_id: "eng".into(),
            level: 2,
            x: 1.5,
            y: -3.0,
            color: "#ff0000".into(),
            is_interchange: true,
            sequence_in_path: None,
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["positionId"], "p1");
        assert_eq!(json["isInterchange"], true);
        assert!(json.get("sequenceInPath").is_none());
    }

    #[test]
    fn test_input_accepts_both_spellings() {
        let input = LayoutInput::from_json(
            r#"{
                "paths": [{"id": "eng", "name": "Engineering", "color": "red"}],
                "positions": [{"id": "p1", "name": "Engineer"}],
                "positionDetails": [
                    {"id": "d1", "position_id": "p1", "career_path_id": "eng", "level": 1},
                    {"id": "d2", "positionId": "p1", "careerPathId": "eng", "level": 2, "sequenceInPath": 3}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(input.position_details.len(), 2);
        assert_eq!(input.position_details[1].sequence_in_path, Some(3));
        assert!(input.config.is_none());
    }

    fn node(id: &str, path_id: &str, x: f64) -> LayoutNode {
        LayoutNode {
            id: id.into(),
            position_id: "p".into(),
            path_id: path_id.into(),
            level: 1,
            x,
            y: 0.0,
            color: String::new(),
            is_interchange: false,
            sequence_in_path: None,
        }
    }

    fn layout_path(id: &str, node_ids: &[&str]) -> LayoutPath {
        LayoutPath {
            id: id.into(),
            name: id.into(),
            color: String::new(),
            angle: 0.0,
            node_ids: node_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_nodes_for_path_with_shared_detail_ids() {
        let result = LayoutResult {
            nodes: vec![node("d1", "a", 1.0), node("d1", "b", 2.0), node("d2", "b", 3.0)],
            paths: vec![layout_path("a", &["d1"]), layout_path("b", &["d1", "d2"])],
            ..LayoutResult::default()
        };

        let b: Vec<f64> = result.nodes_for_path("b").iter().map(|n| n.x).collect();
        assert_eq!(b, vec![2.0, 3.0]);
        let a: Vec<f64> = result.nodes_for_path("a").iter().map(|n| n.x).collect();
        assert_eq!(a, vec![1.0]);
        assert!(result.nodes_for_path("missing").is_empty());
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::MissingPath {
            path_id: "gone".into(),
        };
        assert_eq!(reason.to_string(), "references unknown path 'gone'");
    }
}

//! Layout configuration
//!
//! Every option has a documented default, so hosts only send what they want
//! to change. Unknown keys are ignored to keep older hosts working against
//! newer engines and the other way round.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{LayoutError, Result};

/// How consecutive stations of a route are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Straight segments
    Direct,
    /// Horizontal and vertical segments only
    Manhattan,
    /// Manhattan with rounded corners
    #[default]
    Smooth,
}

impl RouteMode {
    pub fn variants() -> &'static [&'static str] {
        &["direct", "manhattan", "smooth"]
    }
}

impl FromStr for RouteMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(RouteMode::Direct),
            "manhattan" => Ok(RouteMode::Manhattan),
            "smooth" => Ok(RouteMode::Smooth),
            other => Err(LayoutError::invalid_config(
                "routeMode",
                format!("has unknown value '{}'", other),
            )),
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMode::Direct => write!(f, "direct"),
            RouteMode::Manhattan => write!(f, "manhattan"),
            RouteMode::Smooth => write!(f, "smooth"),
        }
    }
}

fn default_column_spacing() -> f64 {
    120.0
}

fn default_row_spacing() -> f64 {
    80.0
}

/// Coordinate formula used by the node placer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlacementStrategy {
    /// Lines radiate from the center at their relaxed angles
    #[default]
    Polar,
    /// One column per path, one row per level
    #[serde(rename_all = "camelCase")]
    Grid {
        #[serde(default = "default_column_spacing")]
        column_spacing: f64,
        #[serde(default = "default_row_spacing")]
        row_spacing: f64,
    },
    /// One horizontal lane per path, levels along x
    #[serde(rename_all = "camelCase")]
    Linear {
        #[serde(default = "default_column_spacing")]
        level_spacing: f64,
        #[serde(default = "default_row_spacing")]
        lane_spacing: f64,
    },
}

impl PlacementStrategy {
    pub fn grid() -> Self {
        Self::Grid {
            column_spacing: default_column_spacing(),
            row_spacing: default_row_spacing(),
        }
    }

    pub fn linear() -> Self {
        Self::Linear {
            level_spacing: default_column_spacing(),
            lane_spacing: default_row_spacing(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlacementStrategy::Polar => "polar",
            PlacementStrategy::Grid { .. } => "grid",
            PlacementStrategy::Linear { .. } => "linear",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["polar", "grid", "linear"]
    }

    fn spacings(&self) -> Option<(f64, f64)> {
        match *self {
            PlacementStrategy::Polar => None,
            PlacementStrategy::Grid {
                column_spacing,
                row_spacing,
            } => Some((column_spacing, row_spacing)),
            PlacementStrategy::Linear {
                level_spacing,
                lane_spacing,
            } => Some((level_spacing, lane_spacing)),
        }
    }
}

impl FromStr for PlacementStrategy {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "polar" => Ok(Self::Polar),
            "grid" => Ok(Self::grid()),
            "linear" => Ok(Self::linear()),
            other => Err(LayoutError::invalid_config(
                "placement",
                format!("has unknown kind '{}'", other),
            )),
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Radial distance between adjacent levels
    pub radius_step: f64,
    /// Radius of the innermost ring; negative selects the radial-fan mode
    pub center_radius: f64,
    pub start_angle_deg: f64,
    pub angle_spread_deg: f64,
    pub padding: f64,
    pub mid_level_override: Option<f64>,
    /// Exponent applied to centrality when pulling interchanges inward
    pub centrality_factor: f64,
    pub jitter_amount: f64,
    pub jitter_seed: u64,
    pub route_mode: RouteMode,
    pub vertical_first: bool,
    pub min_segment_length: f64,
    pub corner_radius: f64,
    /// Relaxation iterations of the angle assigner
    pub iterations: usize,
    pub repulsion: f64,
    pub attraction: f64,
    pub step_scale: f64,
    /// Bow of long lines, in radians per `ln(count + 1)`
    pub curve_strength: f64,
    /// Angular nudge per level away from the mid level
    pub level_angle_nudge: f64,
    pub placement: PlacementStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius_step: 80.0,
            center_radius: 60.0,
            start_angle_deg: 0.0,
            angle_spread_deg: 360.0,
            padding: 50.0,
            mid_level_override: None,
            centrality_factor: 0.5,
            jitter_amount: 2.0,
            jitter_seed: 0,
            route_mode: RouteMode::Smooth,
            vertical_first: true,
            min_segment_length: 1.0,
            corner_radius: 12.0,
            iterations: 20,
            repulsion: 0.1,
            attraction: 0.05,
            step_scale: 0.1,
            curve_strength: 0.04,
            level_angle_nudge: 0.02,
            placement: PlacementStrategy::Polar,
        }
    }
}

/// Parameters of the angle relaxation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relaxation {
    pub iterations: usize,
    pub repulsion: f64,
    pub attraction: f64,
    pub step_scale: f64,
}

impl Default for Relaxation {
    fn default() -> Self {
        LayoutConfig::default().relaxation()
    }
}

/// Options of the route generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteOptions {
    pub vertical_first: bool,
    pub min_segment_length: f64,
    pub corner_radius: f64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        LayoutConfig::default().route_options()
    }
}

/// Route mode and options a layout was computed with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSettings {
    pub mode: RouteMode,
    pub options: RouteOptions,
}

/// A config with invalid values replaced by defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub config: LayoutConfig,
    /// Names of the options that were replaced
    pub replaced: Vec<&'static str>,
}

type Rule = (&'static str, bool, &'static str);

impl LayoutConfig {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn relaxation(&self) -> Relaxation {
        Relaxation {
            iterations: self.iterations,
            repulsion: self.repulsion,
            attraction: self.attraction,
            step_scale: self.step_scale,
        }
    }

    pub fn route_options(&self) -> RouteOptions {
        RouteOptions {
            vertical_first: self.vertical_first,
            min_segment_length: self.min_segment_length,
            corner_radius: self.corner_radius,
        }
    }

    pub fn route_settings(&self) -> RouteSettings {
        RouteSettings {
            mode: self.route_mode,
            options: self.route_options(),
        }
    }

    fn rules(&self) -> Vec<Rule> {
        let finite = |v: f64| v.is_finite();
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        let mut rules = vec![
            ("radiusStep", positive(self.radius_step), "must be a positive number"),
            ("centerRadius", finite(self.center_radius), "must be finite"),
            ("startAngleDeg", finite(self.start_angle_deg), "must be finite"),
            ("angleSpreadDeg", positive(self.angle_spread_deg), "must be a positive number"),
            ("padding", non_negative(self.padding), "must not be negative"),
            (
                "midLevelOverride",
                self.mid_level_override.map_or(true, finite),
                "must be finite",
            ),
            ("centralityFactor", non_negative(self.centrality_factor), "must not be negative"),
            ("jitterAmount", non_negative(self.jitter_amount), "must not be negative"),
            ("minSegmentLength", non_negative(self.min_segment_length), "must not be negative"),
            ("cornerRadius", non_negative(self.corner_radius), "must not be negative"),
            ("repulsion", non_negative(self.repulsion), "must not be negative"),
            ("attraction", non_negative(self.attraction), "must not be negative"),
            ("stepScale", non_negative(self.step_scale), "must not be negative"),
            ("curveStrength", finite(self.curve_strength), "must be finite"),
            ("levelAngleNudge", finite(self.level_angle_nudge), "must be finite"),
        ];
        if let Some((a, b)) = self.placement.spacings() {
            rules.push(("placement", positive(a) && positive(b), "spacings must be positive"));
        }
        rules
    }

    /// Strict check, reporting the first invalid option
    pub fn validate(&self) -> Result<()> {
        match self.rules().into_iter().find(|(_, ok, _)| !ok) {
            Some((field, _, message)) => Err(LayoutError::invalid_config(field, message)),
            None => Ok(()),
        }
    }

    /// Lenient check: every invalid option falls back to its default
    pub fn sanitized(&self) -> Sanitized {
        let defaults = LayoutConfig::default();
        let mut config = self.clone();
        let replaced: Vec<&'static str> = self
            .rules()
            .into_iter()
            .filter(|(_, ok, _)| !ok)
            .map(|(field, _, _)| field)
            .collect();

        for field in &replaced {
            match *field {
                "radiusStep" => config.radius_step = defaults.radius_step,
                "centerRadius" => config.center_radius = defaults.center_radius,
                "startAngleDeg" => config.start_angle_deg = defaults.start_angle_deg,
                "angleSpreadDeg" => config.angle_spread_deg = defaults.angle_spread_deg,
                "padding" => config.padding = defaults.padding,
                "midLevelOverride" => config.mid_level_override = None,
                "centralityFactor" => config.centrality_factor = defaults.centrality_factor,
                "jitterAmount" => config.jitter_amount = defaults.jitter_amount,
                "minSegmentLength" => config.min_segment_length = defaults.min_segment_length,
                "cornerRadius" => config.corner_radius = defaults.corner_radius,
                "repulsion" => config.repulsion = defaults.repulsion,
                "attraction" => config.attraction = defaults.attraction,
                "stepScale" => config.step_scale = defaults.step_scale,
                "curveStrength" => config.curve_strength = defaults.curve_strength,
                "levelAngleNudge" => config.level_angle_nudge = defaults.level_angle_nudge,
                "placement" => {
                    config.placement = match config.placement {
                        PlacementStrategy::Grid { .. } => PlacementStrategy::grid(),
                        PlacementStrategy::Linear { .. } => PlacementStrategy::linear(),
                        PlacementStrategy::Polar => PlacementStrategy::Polar,
                    }
                }
                _ => {}
            }
        }

        Sanitized { config, replaced }
    }
}

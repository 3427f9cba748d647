//! Command-line interface for the careermap utility
//!
//! Reads career path data as JSON and writes layouts or route strings as JSON.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use careermap::core::logging::init_logging;
use careermap::engine::placement::validate_details;
use careermap::{LayoutConfig, LayoutEngine, LayoutInput, PlacementStrategy, RouteMode};

/// Careermap - Lay out career paths as a transit map
#[derive(Parser)]
#[command(name = "careermap")]
#[command(about = "Lay out career path data as a transit-style map")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off); defaults to the environment, then info
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Placement strategy choices
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum PlacementChoice {
    Polar,
    Grid,
    Linear,
}

impl From<PlacementChoice> for PlacementStrategy {
    fn from(value: PlacementChoice) -> Self {
        match value {
            PlacementChoice::Polar => PlacementStrategy::Polar,
            PlacementChoice::Grid => PlacementStrategy::grid(),
            PlacementChoice::Linear => PlacementStrategy::linear(),
        }
    }
}

/// Route mode choices
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum RouteChoice {
    Direct,
    Manhattan,
    Smooth,
}

impl From<RouteChoice> for RouteMode {
    fn from(value: RouteChoice) -> Self {
        match value {
            RouteChoice::Direct => RouteMode::Direct,
            RouteChoice::Manhattan => RouteMode::Manhattan,
            RouteChoice::Smooth => RouteMode::Smooth,
        }
    }
}

/// Input, output and config options shared by the layout commands
#[derive(Args, Debug, Default, Clone)]
pub struct LayoutArgs {
    /// Input JSON file with paths, positions and positionDetails (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (use - for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with layout options; overrides the config embedded in the input
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Always pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Per-option overrides, applied on top of every config source
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Placement strategy
    #[arg(long, value_enum)]
    pub placement: Option<PlacementChoice>,

    /// How stations are connected
    #[arg(long, value_enum)]
    pub route_mode: Option<RouteChoice>,

    /// Radial distance between adjacent levels
    #[arg(long, allow_negative_numbers = true)]
    pub radius_step: Option<f64>,

    /// Radius of the innermost ring; negative selects the radial fan
    #[arg(long, allow_negative_numbers = true)]
    pub center_radius: Option<f64>,

    /// Angle of the first path, in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub start_angle: Option<f64>,

    /// Arc the paths are spread over, in degrees
    #[arg(long)]
    pub angle_spread: Option<f64>,

    /// Padding around the bounds
    #[arg(long)]
    pub padding: Option<f64>,

    /// Maximum jitter per axis
    #[arg(long)]
    pub jitter_amount: Option<f64>,

    /// Seed mixed into the jitter hash
    #[arg(long)]
    pub jitter_seed: Option<u64>,

    /// Relaxation iterations for the angle assigner
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Corner radius in smooth route mode
    #[arg(long)]
    pub corner_radius: Option<f64>,

    /// Route the horizontal leg first in manhattan and smooth modes
    #[arg(long)]
    pub horizontal_first: bool,
}

impl ConfigOverrides {
    /// Apply every given override to `config`
    pub fn apply(&self, config: &mut LayoutConfig) {
        if let Some(placement) = self.placement {
            config.placement = placement.into();
        }
        if let Some(mode) = self.route_mode {
            config.route_mode = mode.into();
        }
        if let Some(v) = self.radius_step {
            config.radius_step = v;
        }
        if let Some(v) = self.center_radius {
            config.center_radius = v;
        }
        if let Some(v) = self.start_angle {
            config.start_angle_deg = v;
        }
        if let Some(v) = self.angle_spread {
            config.angle_spread_deg = v;
        }
        if let Some(v) = self.padding {
            config.padding = v;
        }
        if let Some(v) = self.jitter_amount {
            config.jitter_amount = v;
        }
        if let Some(v) = self.jitter_seed {
            config.jitter_seed = v;
        }
        if let Some(v) = self.iterations {
            config.iterations = v;
        }
        if let Some(v) = self.corner_radius {
            config.corner_radius = v;
        }
        if self.horizontal_first {
            config.vertical_first = false;
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a layout and print it as JSON
    Layout {
        #[command(flatten)]
        args: LayoutArgs,
    },

    /// Compute a layout and print the route string of every path
    Routes {
        #[command(flatten)]
        args: LayoutArgs,

        /// Only print the route of this path
        #[arg(long)]
        path: Option<String>,
    },

    /// Check input references and config values
    Validate {
        /// Input file to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSON file with layout options
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show placement strategies and route modes
    Strategies {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Main CLI application
#[derive(Default)]
pub struct CareermapApp {
    verbose: bool,
}

impl CareermapApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Flags win; unset flags fall back to CAREERMAP_LOG_* and RUST_LOG
        if let Err(e) = init_logging(
            cli.log_level.map(|l| l.as_str()),
            cli.log_format.map(|f| f.as_str()),
        ) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        self.verbose = cli.verbose;
        if self.verbose {
            eprintln!("Careermap v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Layout { args } => self.layout_command(&args),
            Commands::Routes { args, path } => self.routes_command(&args, path.as_deref()),
            Commands::Validate { input, config } => self.validate_command(input, config),
            Commands::Strategies { json } => self.strategies_command(json),
        }
    }

    /// Read the input document and resolve the effective config
    ///
    /// Precedence, lowest first: defaults, config embedded in the input, the
    /// `--config` file, per-option flags.
    pub fn load(&self, args: &LayoutArgs) -> Result<(LayoutInput, LayoutConfig)> {
        let content = self.read_input(args.input.clone())?;
        if self.verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let input = LayoutInput::from_json(&content).context("Failed to parse input JSON")?;

        let mut config = resolve_config(input.config.as_ref(), args.config.as_deref())?;
        args.overrides.apply(&mut config);
        Ok((input, config))
    }

    /// Handle the layout command
    fn layout_command(&self, args: &LayoutArgs) -> Result<()> {
        let (input, config) = self.load(args)?;
        let layout = LayoutEngine::with_config(config).compute(
            &input.paths,
            &input.positions,
            &input.position_details,
        );

        if self.verbose {
            eprintln!(
                "Placed {} nodes on {} paths ({} skipped)",
                layout.nodes.len(),
                layout.paths.len(),
                layout.skipped.len()
            );
        }

        let json = to_json(&layout, self.pretty_output(args))?;
        self.write_output(args.output.clone(), &json)
    }

    /// Handle the routes command
    fn routes_command(&self, args: &LayoutArgs, path: Option<&str>) -> Result<()> {
        let (input, config) = self.load(args)?;
        let engine = LayoutEngine::with_config(config);
        let layout = engine.compute(&input.paths, &input.positions, &input.position_details);

        let pretty = self.pretty_output(args);
        let json = match path {
            Some(path_id) => {
                let d = engine.route_path(&layout, path_id)?;
                to_json(&serde_json::json!({ "pathId": path_id, "d": d }), pretty)?
            }
            None => to_json(&engine.route_all(&layout), pretty)?,
        };
        self.write_output(args.output.clone(), &json)
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
        let content = self.read_input(input)?;
        let document = match LayoutInput::from_json(&content) {
            Ok(document) => document,
            Err(e) => {
                println!("✗ Invalid input: {}", e);
                return Err(anyhow!("Invalid input"));
            }
        };

        let config = resolve_config(document.config.as_ref(), config.as_deref())?;

        let mut problems = Vec::new();
        if let Err(e) = config.validate() {
            problems.push(e.to_string());
        }
        let (valid, skipped) = validate_details(
            &document.paths,
            &document.positions,
            &document.position_details,
        );
        problems.extend(
            skipped
                .iter()
                .map(|s| format!("Detail '{}' {}", s.detail_id, s.reason)),
        );

        if problems.is_empty() {
            println!(
                "✓ Valid input: {} paths, {} positions, {} details",
                document.paths.len(),
                document.positions.len(),
                valid.len()
            );
            Ok(())
        } else {
            for problem in &problems {
                println!("✗ {}", problem);
            }
            Err(anyhow!("Found {} problem(s)", problems.len()))
        }
    }

    /// Handle the strategies command
    fn strategies_command(&self, json: bool) -> Result<()> {
        if self.verbose {
            eprintln!("Listing placement strategies and route modes");
        }

        if json {
            let listing = serde_json::json!({
                "placements": PlacementStrategy::variants(),
                "routeModes": RouteMode::variants(),
                "defaults": {
                    "placement": PlacementStrategy::default().name(),
                    "routeMode": RouteMode::default().to_string(),
                }
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Placement strategies:");
            println!("  polar   - Lines radiate from the center at relaxed angles (default)");
            println!("  grid    - One column per path, one row per level");
            println!("  linear  - One lane per path, levels left to right");
            println!();
            println!("Route modes:");
            println!("  direct     - Straight segments");
            println!("  manhattan  - Horizontal and vertical segments");
            println!("  smooth     - Manhattan with rounded corners (default)");
        }

        Ok(())
    }

    /// Pretty-print when forced or when writing to a terminal
    fn pretty_output(&self, args: &LayoutArgs) -> bool {
        if args.pretty {
            return true;
        }
        match &args.output {
            None => crossterm::tty::IsTty::is_tty(&io::stdout()),
            Some(p) if p.to_str() == Some("-") => crossterm::tty::IsTty::is_tty(&io::stdout()),
            Some(_) => false,
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout();
                if content.ends_with('\n') {
                    write!(stdout, "{}", content)?;
                } else {
                    writeln!(stdout, "{}", content)?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

/// Layer the `--config` file over the input's embedded config
///
/// Keys missing from the file keep their embedded values.
fn resolve_config(embedded: Option<&LayoutConfig>, file: Option<&Path>) -> Result<LayoutConfig> {
    let Some(path) = file else {
        return Ok(embedded.cloned().unwrap_or_default());
    };
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
    let layer: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    let Value::Object(layer) = layer else {
        return Err(anyhow!(
            "Config file '{}' must contain a JSON object",
            path.display()
        ));
    };

    let mut merged = serde_json::to_value(embedded.cloned().unwrap_or_default())?;
    if let Value::Object(base) = &mut merged {
        base.extend(layer);
    }
    serde_json::from_value(merged)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

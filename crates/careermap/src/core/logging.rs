//! Logging setup for hosts of the layout engine
//!
//! The engine itself only emits `tracing` spans and events; nothing is printed
//! unless a host installs a subscriber. This module offers the subscriber the
//! CLI and the WASM bindings use.
//!
//! # Usage
//!
//! ```rust,no_run
//! use careermap::core::logging::init_logging;
//!
//! // Level and format from the environment, falling back to info/compact
//! init_logging(None, None).ok();
//!
//! // Or explicitly
//! init_logging(Some("debug"), Some("pretty")).ok();
//! ```
//!
//! # Environment Variables
//!
//! - `CAREERMAP_LOG_LEVEL`: trace|debug|info|warn|error|off
//! - `CAREERMAP_LOG_FORMAT`: compact|pretty|json
//! - `RUST_LOG`: standard `EnvFilter` directives, used when set
//!
//! # Filtering Logs
//!
//! Each pipeline stage logs under its own module path, so stages can be
//! filtered independently:
//!
//! ```bash
//! # Watch the relaxation loop only
//! RUST_LOG="careermap::engine::angles=trace" careermap layout -i paths.json
//!
//! # Everything at info, routing at debug
//! RUST_LOG="info,careermap::engine::routing=debug" careermap routes -i paths.json
//! ```

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

const LEVEL_ENV: &str = "CAREERMAP_LOG_LEVEL";
const FORMAT_ENV: &str = "CAREERMAP_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format
    #[default]
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON lines for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolve the effective level directive: argument, then `CAREERMAP_LOG_LEVEL`,
/// then `RUST_LOG`, then `info`.
pub fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var(LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

/// Resolve the effective format: argument, then `CAREERMAP_LOG_FORMAT`, then compact.
pub fn resolve_format(format: Option<&str>) -> Result<LogFormat, String> {
    match format
        .map(str::to_string)
        .or_else(|| std::env::var(FORMAT_ENV).ok())
    {
        Some(name) => LogFormat::from_str(&name),
        None => Ok(LogFormat::default()),
    }
}

/// Install a global tracing subscriber.
///
/// Fails when the format is unknown or a global subscriber is already set.
/// Unknown level directives fall back to `info`.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        // Browser console output; level filtering happens in devtools.
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let directive = resolve_level(level);
        let format = resolve_format(format).map_err(|e| format!("Invalid log format: {}", e))?;

        let filter = if directive == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        let registry = Registry::default().with(filter);
        match format {
            LogFormat::Compact => registry
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_span_events(FmtSpan::NONE)
                        .compact(),
                )
                .try_init()?,
            LogFormat::Pretty => registry
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .pretty(),
                )
                .try_init()?,
            LogFormat::Json => registry
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?,
        }

        Ok(())
    }
}

/// Initialize logging from the environment only
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_explicit_arguments_win() {
        assert_eq!(resolve_level(Some("trace")), "trace");
        assert_eq!(resolve_format(Some("json")).unwrap(), LogFormat::Json);
        assert!(resolve_format(Some("yaml")).is_err());
    }
}

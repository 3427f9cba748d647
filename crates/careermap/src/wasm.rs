//! WebAssembly bindings for Careermap
//!
//! Browser hosts hand over a JSON document (`paths`, `positions`,
//! `positionDetails`, optional `config`) and get JSON back. Failures are
//! reported in an `error` field instead of throwing.

use wasm_bindgen::prelude::*;

use crate::core::{LayoutInput, SkippedDetail};
use crate::engine::LayoutEngine;

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    // Initialize logging for WASM (logs to browser console)
    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn warnings(skipped: &[SkippedDetail]) -> Vec<String> {
    skipped
        .iter()
        .map(|s| format!("Detail '{}' {}", s.detail_id, s.reason))
        .collect()
}

/// Compute a layout from a JSON input document
///
/// # Returns
/// * JSON string with fields: layout, warnings, error
#[wasm_bindgen]
pub fn compute_layout_json(input: &str) -> String {
    match LayoutInput::from_json(input) {
        Ok(input) => {
            let layout = LayoutEngine::new().compute_input(&input);
            serde_json::json!({
                "warnings": warnings(&layout.skipped),
                "layout": layout,
                "error": null
            })
            .to_string()
        }
        Err(e) => serde_json::json!({
            "layout": null,
            "warnings": [],
            "error": e.to_string()
        })
        .to_string(),
    }
}

/// Compute a layout and return the route string of every path
///
/// # Returns
/// * JSON string with fields: routes (`pathId`, `color`, `d`), warnings, error
#[wasm_bindgen]
pub fn generate_routes_json(input: &str) -> String {
    match LayoutInput::from_json(input) {
        Ok(input) => {
            let engine = LayoutEngine::new();
            let layout = engine.compute_input(&input);
            serde_json::json!({
                "routes": engine.route_all(&layout),
                "warnings": warnings(&layout.skipped),
                "error": null
            })
            .to_string()
        }
        Err(e) => serde_json::json!({
            "routes": [],
            "warnings": [],
            "error": e.to_string()
        })
        .to_string(),
    }
}

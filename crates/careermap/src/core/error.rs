//! Core error types for layout processing
//!
//! Computing a layout never fails: empty or partially broken input degrades to
//! a smaller layout. These errors cover the edges of the engine instead:
//! strict configuration checks, loading input documents, and lookups by id.

use thiserror::Error;

/// Core error types for layout processing
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid config: {field} {message}")]
    InvalidConfig { field: String, message: String },

    #[error("Unknown path: {path_id}")]
    UnknownPath { path_id: String },

    #[error("Unknown node: {node_id}")]
    UnknownNode { node_id: String },

    #[error("Input error: {source}")]
    Input {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl LayoutError {
    /// Create a new config error for the named option
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown path error
    pub fn unknown_path(path_id: impl Into<String>) -> Self {
        Self::UnknownPath {
            path_id: path_id.into(),
        }
    }

    /// Create a new unknown node error
    pub fn unknown_node(node_id: impl Into<String>) -> Self {
        Self::UnknownNode {
            node_id: node_id.into(),
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, LayoutError>;

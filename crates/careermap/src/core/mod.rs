//! Core types shared by every pipeline stage
//!
//! Data model, configuration, errors, geometry helpers, and the observer hook.
//! The stages themselves live in [`crate::engine`].

mod config;
mod error;
mod geometry;
mod grouping;
pub mod logging;
mod observer;
mod types;

pub use config::*;
pub use error::*;
pub use geometry::*;
pub use grouping::*;
pub use logging::*;
pub use observer::*;
pub use types::*;

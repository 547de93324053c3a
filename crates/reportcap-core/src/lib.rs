//! # reportcap-core
//!
//! Core types for the reportcap visual report pipeline.
//!
//! ## Core Paradigm
//!
//! - A capture is one end-to-end run of the pipeline for a single request
//! - The request is read-only for the whole run; all state is request-scoped
//! - One browser process per capture, released on every exit path
//! - A capture either fully succeeds or the whole run is failed

mod config;
mod error;
mod types;

pub use config::{CaptureConfig, StabilizationConfig};
pub use error::{ReportError, Result};
pub use types::*;

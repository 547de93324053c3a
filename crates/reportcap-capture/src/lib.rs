//! Visual report capture pipeline
//!
//! This crate drives a headless Chromium instance over the Chrome DevTools
//! Protocol (CDP) to turn a dashboard, visualization, saved search, or
//! notebook page into a PDF or PNG report artifact.
//!
//! # Pipeline
//!
//! - **Target resolution**: URL building and source classification
//! - **Browser session**: scoped process ownership, navigation, viewport
//! - **Readiness detection**: chrome stripping, ready-selector waits, and
//!   content-length stabilization
//! - **Encoding**: scroll-height-aware PDF printing, full-page screenshots
//! - **Artifact**: base64 payload construction and local persistence
//!
//! # Example
//!
//! ```no_run
//! use reportcap_capture::capture;
//! use reportcap_core::{CaptureConfig, CaptureRequest, ReportFormat, ReportSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = CaptureRequest {
//!         source_url: None,
//!         source: ReportSource::Dashboard,
//!         object_id: Some("722b74f0-b882-11e8-a6d9-e546fe2bba5f".to_string()),
//!         format: ReportFormat::Pdf,
//!         viewport_width: 1680,
//!         viewport_height: 900,
//!     };
//!
//!     let artifact = capture(&request, &CaptureConfig::default()).await?;
//!     println!("Wrote {}", artifact.file_name);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! Chrome or Chromium installed, either on PATH or configured via
//! `CaptureConfig::browser_path`. The browser runs fully headless with OS
//! sandboxing disabled, suitable for restricted server environments.

pub mod artifact;
pub mod browser;
pub mod encode;
pub mod pipeline;
pub mod readiness;
pub mod resolver;

// Re-export commonly used types
pub use artifact::{build_artifact, persist};
pub use browser::{BrowserConfig, BrowserSession};
pub use encode::{encode, pdf_options_for_height};
pub use pipeline::capture;
pub use readiness::{await_ready, wait_for_dynamic_content, ReadinessPolicy, StabilizationState};
pub use resolver::{resolve, ResolvedTarget};

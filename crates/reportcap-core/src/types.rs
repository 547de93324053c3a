//! Core type definitions for the reportcap pipeline

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Classification of the page being captured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Dashboard,
    Visualization,
    Notebook,
    SavedSearch,
    #[default]
    Other,
}

impl ReportSource {
    /// App path segment used when building a URL from a saved object id.
    ///
    /// `Other` has no app of its own and cannot be addressed by object id.
    pub fn app_path(&self) -> Option<&'static str> {
        match self {
            Self::Dashboard => Some("dashboards"),
            Self::Visualization => Some("visualize"),
            Self::Notebook => Some("notebooks"),
            Self::SavedSearch => Some("discover"),
            Self::Other => None,
        }
    }

    /// Infer the source type from a navigable URL by path fragment.
    ///
    /// Match order is fixed: dashboards, visualize, discover, notebooks.
    /// URLs matching none of the known fragments classify as `Other`.
    pub fn infer_from_url(url: &str) -> Self {
        if url.contains("dashboards") {
            Self::Dashboard
        } else if url.contains("visualize") {
            Self::Visualization
        } else if url.contains("discover") {
            Self::SavedSearch
        } else if url.contains("notebooks") {
            Self::Notebook
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for ReportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "dashboard"),
            Self::Visualization => write!(f, "visualization"),
            Self::Notebook => write!(f, "notebook"),
            Self::SavedSearch => write!(f, "saved_search"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ReportSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dashboard" => Ok(Self::Dashboard),
            "visualization" => Ok(Self::Visualization),
            "notebook" => Ok(Self::Notebook),
            "saved_search" | "savedsearch" | "saved-search" | "search" => Ok(Self::SavedSearch),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid report source: {}", s)),
        }
    }
}

/// Output format of a capture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Png,
}

impl ReportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
        }
    }

    /// Data-URI prefix for transporting the encoded payload
    pub fn data_url_prefix(&self) -> String {
        format!("data:{};base64,", self.mime_type())
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Png),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

/// One end-to-end capture request
///
/// Addresses the page either by explicit URL or by (source, object id).
/// The request is created by the caller and read-only for the whole
/// pipeline run; there is no process-wide capture state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Direct URL to capture (takes precedence over object id)
    pub source_url: Option<String>,
    /// Source type, used for URL building and readiness policy
    #[serde(default)]
    pub source: ReportSource,
    /// Saved object id, combined with `source` when no URL is given
    pub object_id: Option<String>,
    /// Output format
    #[serde(default)]
    pub format: ReportFormat,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
}

impl CaptureRequest {
    /// Check the request is well-formed before any browser work starts
    pub fn validate(&self) -> Result<()> {
        if self.source_url.is_none() && self.object_id.is_none() {
            return Err(ReportError::InvalidRequest(
                "either a source URL or an object id is required".to_string(),
            ));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ReportError::InvalidRequest(format!(
                "viewport must be nonzero, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        Ok(())
    }
}

/// The encoded report output, immutable once produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureArtifact {
    /// Capture time in epoch milliseconds
    pub time_created: i64,
    /// Encoded payload, base64
    pub payload_base64: String,
    /// Storage file name
    pub file_name: String,
}

impl CaptureArtifact {
    /// Render the artifact as a `data:<mime>;base64,<payload>` string
    pub fn data_url(&self, format: ReportFormat) -> String {
        format!("{}{}", format.data_url_prefix(), self.payload_base64)
    }
}

/// Report instance status in the backend store
///
/// Status is the only mutable field of a report instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportState {
    Created,
    Pending,
    Shared,
    Error,
}

impl std::fmt::Display for ReportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Pending => write!(f, "Pending"),
            Self::Shared => write!(f, "Shared"),
            Self::Error => write!(f, "Error"),
        }
    }
}

impl std::str::FromStr for ReportState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "pending" => Ok(Self::Pending),
            "shared" => Ok(Self::Shared),
            "error" => Ok(Self::Error),
            _ => Err(format!("Invalid report state: {}", s)),
        }
    }
}

/// Report definition as stored in the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDefinition {
    /// Display name
    pub name: String,
    /// Page classification of the report source
    pub source: ReportSource,
    /// Saved object id of the source, when addressed by id
    #[serde(default)]
    pub object_id: Option<String>,
    /// Output format
    pub format: ReportFormat,
    /// Optional header markdown shown above the report
    #[serde(default)]
    pub header: Option<String>,
    /// Optional footer markdown shown below the report
    #[serde(default)]
    pub footer: Option<String>,
    /// Trigger kind, e.g. "on_demand"
    #[serde(default)]
    pub trigger_type: Option<String>,
    /// Notification channel ids for delivery; request-scoped, never global
    #[serde(default)]
    pub delivery_channels: Vec<String>,
}

/// One generated (or failed) run of a report definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInstance {
    /// Instance id
    pub id: String,
    /// Current status
    pub status: ReportState,
    /// The definition this instance was generated from
    #[serde(default)]
    pub report_definition: Option<ReportDefinition>,
}

/// Notification channel descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel id
    pub id: String,
    /// Display label
    pub label: String,
    /// Channel kind, e.g. "slack", "chime", "email"
    #[serde(rename = "type")]
    pub channel_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_report_source_app_path() {
        assert_eq!(ReportSource::Dashboard.app_path(), Some("dashboards"));
        assert_eq!(ReportSource::Visualization.app_path(), Some("visualize"));
        assert_eq!(ReportSource::Notebook.app_path(), Some("notebooks"));
        assert_eq!(ReportSource::SavedSearch.app_path(), Some("discover"));
        assert_eq!(ReportSource::Other.app_path(), None);
    }

    #[test]
    fn test_report_source_inference() {
        assert_eq!(
            ReportSource::infer_from_url("http://localhost:5601/app/dashboards/abc"),
            ReportSource::Dashboard
        );
        assert_eq!(
            ReportSource::infer_from_url("http://localhost:5601/app/visualize/edit/xyz"),
            ReportSource::Visualization
        );
        assert_eq!(
            ReportSource::infer_from_url("http://localhost:5601/app/discover#/view/1"),
            ReportSource::SavedSearch
        );
        assert_eq!(
            ReportSource::infer_from_url("http://localhost:5601/app/notebooks/note-1"),
            ReportSource::Notebook
        );
        assert_eq!(
            ReportSource::infer_from_url("https://example.com/status"),
            ReportSource::Other
        );
    }

    #[test]
    fn test_report_source_roundtrip() {
        for s in ["dashboard", "visualization", "notebook", "saved_search", "other"] {
            let parsed = ReportSource::from_str(s).unwrap();
            assert_eq!(parsed.to_string(), s);
        }
        assert!(ReportSource::from_str("spreadsheet").is_err());
    }

    #[test]
    fn test_report_format() {
        assert_eq!(ReportFormat::Pdf.extension(), "pdf");
        assert_eq!(ReportFormat::Png.mime_type(), "image/png");
        assert_eq!(
            ReportFormat::Pdf.data_url_prefix(),
            "data:application/pdf;base64,"
        );
        assert_eq!(ReportFormat::from_str("PNG").unwrap(), ReportFormat::Png);
        assert!(ReportFormat::from_str("csv").is_err());
    }

    #[test]
    fn test_capture_request_requires_target() {
        let request = CaptureRequest {
            source_url: None,
            source: ReportSource::Dashboard,
            object_id: None,
            format: ReportFormat::Pdf,
            viewport_width: 1680,
            viewport_height: 900,
        };
        assert!(matches!(
            request.validate(),
            Err(crate::ReportError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_capture_request_requires_nonzero_viewport() {
        let request = CaptureRequest {
            source_url: Some("http://localhost:5601/app/dashboards/abc".to_string()),
            source: ReportSource::Dashboard,
            object_id: None,
            format: ReportFormat::Pdf,
            viewport_width: 0,
            viewport_height: 900,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_capture_request_valid() {
        let request = CaptureRequest {
            source_url: None,
            source: ReportSource::Dashboard,
            object_id: Some("abc123".to_string()),
            format: ReportFormat::Pdf,
            viewport_width: 1680,
            viewport_height: 900,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_artifact_data_url() {
        let artifact = CaptureArtifact {
            time_created: 1700000000000,
            payload_base64: "aGVsbG8=".to_string(),
            file_name: "reporting_anything.pdf".to_string(),
        };
        assert_eq!(
            artifact.data_url(ReportFormat::Pdf),
            "data:application/pdf;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_report_state_roundtrip() {
        for state in [
            ReportState::Created,
            ReportState::Pending,
            ReportState::Shared,
            ReportState::Error,
        ] {
            let parsed = ReportState::from_str(&state.to_string()).unwrap();
            assert_eq!(parsed, state);
        }
    }

    #[test]
    fn test_channel_config_wire_format() {
        let json = r#"{"id": "ch-1", "label": "Ops Slack", "type": "slack"}"#;
        let config: ChannelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.id, "ch-1");
        assert_eq!(config.channel_type, "slack");
    }
}

//! Artifact construction and persistence

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use reportcap_core::{CaptureArtifact, ReportError, ReportFormat, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Fixed artifact file stem
const ARTIFACT_FILE_STEM: &str = "reporting_anything";

/// Wrap encoded bytes into an immutable artifact
///
/// Stamps the capture time and encodes the payload; does not touch storage.
pub fn build_artifact(bytes: &[u8], format: ReportFormat) -> CaptureArtifact {
    CaptureArtifact {
        time_created: Utc::now().timestamp_millis(),
        payload_base64: BASE64.encode(bytes),
        file_name: format!("{}.{}", ARTIFACT_FILE_STEM, format.extension()),
    }
}

/// Decode the artifact payload and write it under `dir`
///
/// Accepts either a bare base64 payload or a full `data:<mime>;base64,<payload>`
/// string, and overwrites any existing file of the same name. Write failures
/// surface as storage errors and fail the capture.
pub async fn persist(artifact: &CaptureArtifact, dir: &Path) -> Result<PathBuf> {
    let payload = artifact
        .payload_base64
        .rsplit(";base64,")
        .next()
        .unwrap_or(&artifact.payload_base64);

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| ReportError::Storage(format!("Artifact payload is not valid base64: {}", e)))?;

    let path = dir.join(&artifact.file_name);
    fs::write(&path, &bytes).await.map_err(|e| {
        ReportError::Storage(format!("Failed to write artifact {}: {}", path.display(), e))
    })?;

    info!("Wrote report artifact {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_file_names() {
        let pdf = build_artifact(b"%PDF-1.7", ReportFormat::Pdf);
        assert_eq!(pdf.file_name, "reporting_anything.pdf");

        let png = build_artifact(b"\x89PNG", ReportFormat::Png);
        assert_eq!(png.file_name, "reporting_anything.png");
    }

    #[test]
    fn test_artifact_is_stamped() {
        let before = Utc::now().timestamp_millis();
        let artifact = build_artifact(b"%PDF-1.7", ReportFormat::Pdf);
        let after = Utc::now().timestamp_millis();

        assert!(artifact.time_created >= before && artifact.time_created <= after);
        assert!(!artifact.payload_base64.is_empty());
    }

    #[tokio::test]
    async fn test_persist_writes_decoded_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = build_artifact(b"report body", ReportFormat::Pdf);

        let path = persist(&artifact, temp_dir.path()).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"report body");
    }

    #[tokio::test]
    async fn test_persist_strips_data_url_wrapper() {
        let temp_dir = TempDir::new().unwrap();
        let mut artifact = build_artifact(b"report body", ReportFormat::Png);
        artifact.payload_base64 = artifact.data_url(ReportFormat::Png);

        let path = persist(&artifact, temp_dir.path()).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"report body");
    }

    #[tokio::test]
    async fn test_persist_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("reporting_anything.pdf"), b"stale").unwrap();

        let artifact = build_artifact(b"fresh", ReportFormat::Pdf);
        let path = persist(&artifact, temp_dir.path()).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_persist_surfaces_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = build_artifact(b"report body", ReportFormat::Pdf);

        let missing_dir = temp_dir.path().join("does/not/exist");
        let result = persist(&artifact, &missing_dir).await;
        assert!(matches!(result, Err(ReportError::Storage(_))));
    }

    #[tokio::test]
    async fn test_persist_rejects_invalid_payload() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = CaptureArtifact {
            time_created: 0,
            payload_base64: "not base64!!".to_string(),
            file_name: "reporting_anything.pdf".to_string(),
        };

        let result = persist(&artifact, temp_dir.path()).await;
        assert!(matches!(result, Err(ReportError::Storage(_))));
    }
}

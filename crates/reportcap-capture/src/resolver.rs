//! Target resolution: turn a capture request into a navigable URL
//!
//! Pure, no I/O. An explicit URL wins and has its source type inferred from
//! known path fragments; otherwise the URL is built from the source's app
//! path and the saved object id.

use reportcap_core::{CaptureRequest, ReportError, ReportSource, Result};

/// A resolved capture target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Navigable URL
    pub url: String,
    /// Classification driving the readiness policy
    pub source: ReportSource,
}

/// Resolve the request into a URL and source classification
pub fn resolve(request: &CaptureRequest, base_url: &str) -> Result<ResolvedTarget> {
    if let Some(url) = &request.source_url {
        return Ok(ResolvedTarget {
            url: url.clone(),
            source: ReportSource::infer_from_url(url),
        });
    }

    if let Some(object_id) = &request.object_id {
        let segment = request.source.app_path().ok_or_else(|| {
            ReportError::InvalidRequest(format!(
                "source '{}' cannot be addressed by object id",
                request.source
            ))
        })?;
        return Ok(ResolvedTarget {
            url: format!(
                "{}/app/{}/{}",
                base_url.trim_end_matches('/'),
                segment,
                object_id
            ),
            source: request.source,
        });
    }

    Err(ReportError::InvalidRequest(
        "either a source URL or an object id is required".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportcap_core::ReportFormat;

    fn request_with_object_id(source: ReportSource, object_id: &str) -> CaptureRequest {
        CaptureRequest {
            source_url: None,
            source,
            object_id: Some(object_id.to_string()),
            format: ReportFormat::Pdf,
            viewport_width: 1680,
            viewport_height: 900,
        }
    }

    fn request_with_url(url: &str) -> CaptureRequest {
        CaptureRequest {
            source_url: Some(url.to_string()),
            source: ReportSource::Other,
            object_id: None,
            format: ReportFormat::Png,
            viewport_width: 1680,
            viewport_height: 900,
        }
    }

    #[test]
    fn test_object_id_is_final_path_segment() {
        let cases = [
            (ReportSource::Dashboard, "dashboards"),
            (ReportSource::Visualization, "visualize"),
            (ReportSource::Notebook, "notebooks"),
            (ReportSource::SavedSearch, "discover"),
        ];
        for (source, segment) in cases {
            let target =
                resolve(&request_with_object_id(source, "abc123"), "http://localhost:5601")
                    .unwrap();
            assert_eq!(
                target.url,
                format!("http://localhost:5601/app/{}/abc123", segment)
            );
            assert!(target.url.ends_with("/abc123"));
            assert_eq!(target.source, source);
        }
    }

    #[test]
    fn test_trailing_slash_on_base_url() {
        let target = resolve(
            &request_with_object_id(ReportSource::Dashboard, "abc123"),
            "http://localhost:5601/",
        )
        .unwrap();
        assert_eq!(target.url, "http://localhost:5601/app/dashboards/abc123");
    }

    #[test]
    fn test_url_source_inference() {
        let cases = [
            ("http://localhost:5601/app/dashboards/d-1", ReportSource::Dashboard),
            ("http://localhost:5601/app/visualize/edit/v-1", ReportSource::Visualization),
            ("http://localhost:5601/app/discover#/s-1", ReportSource::SavedSearch),
            ("http://localhost:5601/app/notebooks/n-1", ReportSource::Notebook),
            ("https://example.com/metrics", ReportSource::Other),
        ];
        for (url, source) in cases {
            let target = resolve(&request_with_url(url), "http://localhost:5601").unwrap();
            assert_eq!(target.url, url);
            assert_eq!(target.source, source);
        }
    }

    #[test]
    fn test_explicit_url_wins_over_object_id() {
        let mut request = request_with_url("http://localhost:5601/app/dashboards/d-1");
        request.object_id = Some("ignored".to_string());
        let target = resolve(&request, "http://localhost:5601").unwrap();
        assert_eq!(target.url, "http://localhost:5601/app/dashboards/d-1");
    }

    #[test]
    fn test_other_source_cannot_use_object_id() {
        let result = resolve(
            &request_with_object_id(ReportSource::Other, "abc123"),
            "http://localhost:5601",
        );
        assert!(matches!(result, Err(ReportError::InvalidRequest(_))));
    }

    #[test]
    fn test_empty_request_is_invalid() {
        let request = CaptureRequest {
            source_url: None,
            source: ReportSource::Dashboard,
            object_id: None,
            format: ReportFormat::Pdf,
            viewport_width: 1680,
            viewport_height: 900,
        };
        assert!(matches!(
            resolve(&request, "http://localhost:5601"),
            Err(ReportError::InvalidRequest(_))
        ));
    }
}

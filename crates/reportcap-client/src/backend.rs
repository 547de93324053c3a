//! Client for the backend report store
//!
//! The store holds report definitions and report instances. The only thing
//! that can be updated on a report instance is its status.

use reportcap_core::{ReportDefinition, ReportError, ReportInstance, ReportState, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// Base path of the report store API
const REPORTS_API_BASE: &str = "/_plugins/_reports";

/// Client for report definitions and instances
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

/// Wire shape of the instance listing
#[derive(Debug, Deserialize)]
struct ListReportInstancesResponse {
    #[serde(rename = "reportInstanceList", default)]
    report_instance_list: Vec<ReportInstance>,
}

impl BackendClient {
    /// Create a client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            REPORTS_API_BASE,
            path
        )
    }

    /// Fetch a report definition by id
    pub async fn get_report_definition(&self, id: &str) -> Result<ReportDefinition> {
        let url = self.url(&format!("/definition/{}", id));
        debug!("Fetching report definition {}", id);

        let response = self.send_get(&url).await?;
        response
            .json()
            .await
            .map_err(|e| ReportError::Backend(format!("Failed to parse report definition: {}", e)))
    }

    /// Fetch a report instance by id
    pub async fn get_report_instance(&self, id: &str) -> Result<ReportInstance> {
        let url = self.url(&format!("/instance/{}", id));
        debug!("Fetching report instance {}", id);

        let response = self.send_get(&url).await?;
        response
            .json()
            .await
            .map_err(|e| ReportError::Backend(format!("Failed to parse report instance: {}", e)))
    }

    /// List all report instances
    pub async fn list_report_instances(&self) -> Result<Vec<ReportInstance>> {
        let url = self.url("/instances");
        debug!("Listing report instances");

        let response = self.send_get(&url).await?;
        let listing: ListReportInstancesResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Backend(format!("Failed to parse instance list: {}", e)))?;

        Ok(listing.report_instance_list)
    }

    /// Transition a report instance to a new status
    ///
    /// Status is the single mutable field of an instance; nothing else is
    /// ever written back.
    pub async fn update_report_instance_status(
        &self,
        id: &str,
        status: ReportState,
    ) -> Result<()> {
        let url = self.url(&format!("/instance/{}", id));
        info!("Updating report instance {} status to {}", id, status);

        let response = self
            .client
            .post(&url)
            .json(&status_update_body(id, status))
            .send()
            .await
            .map_err(|e| ReportError::Backend(format!("Failed to send request: {}", e)))?;

        check_status(response).await?;
        Ok(())
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReportError::Backend(format!("Failed to send request: {}", e)))?;

        check_status(response).await
    }
}

/// Request body for a status transition
fn status_update_body(id: &str, status: ReportState) -> serde_json::Value {
    serde_json::json!({
        "reportInstanceId": id,
        "status": status,
    })
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown".to_string());
        return Err(ReportError::Backend(format!(
            "Report store error {}: {}",
            status, body
        )));
    }
    Ok(response)
}

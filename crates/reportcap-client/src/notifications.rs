//! Client for the notifications subsystem
//!
//! Used to enumerate delivery channels for report definitions and to send a
//! test message to a channel. Delivery itself is the notifications service's
//! concern, not ours.

use reportcap_core::{ChannelConfig, ReportError, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// Base path of the notifications API
const NOTIFICATIONS_API_BASE: &str = "/_plugins/_notifications";

/// Client for notification channel configs
#[derive(Debug, Clone)]
pub struct NotificationsClient {
    base_url: String,
    client: reqwest::Client,
}

/// Wire shape of the channel config listing
#[derive(Debug, Deserialize)]
struct GetConfigsResponse {
    #[serde(default)]
    config_list: Vec<ConfigEntry>,
}

#[derive(Debug, Deserialize)]
struct ConfigEntry {
    config_id: String,
    config: ConfigBody,
}

#[derive(Debug, Deserialize)]
struct ConfigBody {
    name: String,
    config_type: String,
}

impl NotificationsClient {
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
            NOTIFICATIONS_API_BASE,
            path
        )
    }

    /// List channel configs, optionally filtered to specific ids
    pub async fn get_channel_configs(&self, ids: &[String]) -> Result<Vec<ChannelConfig>> {
        let url = self.url("/configs");
        debug!("Fetching channel configs (filter: {:?})", ids);

        let mut request = self.client.get(&url);
        if !ids.is_empty() {
            request = request.query(&[("config_id_list", ids.join(","))]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ReportError::Notification(format!("Failed to send request: {}", e)))?;

        let response = check_status(response).await?;
        let listing: GetConfigsResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Notification(format!("Failed to parse config list: {}", e)))?;

        Ok(listing
            .config_list
            .into_iter()
            .map(|entry| ChannelConfig {
                id: entry.config_id,
                label: entry.config.name,
                channel_type: entry.config.config_type,
            })
            .collect())
    }

    /// Send a test message through a channel
    pub async fn send_test_message(&self, channel_id: &str) -> Result<()> {
        let url = self.url(&format!("/feature/test/{}", channel_id));
        info!("Sending test message to channel {}", channel_id);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ReportError::Notification(format!("Failed to send request: {}", e)))?;

        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown".to_string());
        return Err(ReportError::Notification(format!(
            "Notifications error {}: {}",
            status, body
        )));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = NotificationsClient::new("http://localhost:9200");
        assert_eq!(
            client.url("/configs"),
            "http://localhost:9200/_plugins/_notifications/configs"
        );
        assert_eq!(
            client.url("/feature/test/ch-1"),
            "http://localhost:9200/_plugins/_notifications/feature/test/ch-1"
        );
    }

    #[test]
    fn test_config_list_wire_format() {
        let json = r#"{
            "start_index": 0,
            "total_hits": 2,
            "config_list": [
                {"config_id": "ch-1", "config": {"name": "Ops Slack", "config_type": "slack"}},
                {"config_id": "ch-2", "config": {"name": "Reports list", "config_type": "email"}}
            ]
        }"#;
        let listing: GetConfigsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(listing.config_list.len(), 2);
        assert_eq!(listing.config_list[0].config.name, "Ops Slack");
        assert_eq!(listing.config_list[1].config.config_type, "email");
    }

    #[test]
    fn test_empty_config_list() {
        let listing: GetConfigsResponse = serde_json::from_str("{}").unwrap();
        assert!(listing.config_list.is_empty());
    }
}

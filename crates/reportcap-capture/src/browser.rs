//! Browser lifecycle management using Chrome DevTools Protocol

use headless_chrome::types::Bounds;
use headless_chrome::{Browser, LaunchOptions, Tab};
use reportcap_core::{CaptureConfig, ReportError, Result};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Chromium arguments for restricted server environments: no OS sandbox,
/// no GPU, single process. Sandboxing itself is disabled via the launch
/// options, which adds `--no-sandbox`.
const LAUNCH_ARGS: [&str; 5] = [
    "--disable-setuid-sandbox",
    "--disable-gpu",
    "--no-zygote",
    "--single-process",
    "--font-render-hinting=none",
];

/// Interval between network-quiet samples
const NETWORK_QUIET_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// Consecutive unchanged resource-count samples required for network quiet
const NETWORK_QUIET_SAMPLES: u32 = 2;

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Browser window width at launch
    pub window_width: u32,
    /// Browser window height at launch
    pub window_height: u32,
    /// Chromium/Chrome executable path; discovered from PATH when unset
    pub browser_path: Option<PathBuf>,
    /// Upper bound on navigation (load event plus network quiet)
    pub navigation_deadline: Duration,
    /// Default timeout for individual CDP operations
    pub operation_timeout: Duration,
}

impl BrowserConfig {
    /// Build a launch configuration from pipeline config and viewport size
    pub fn from_capture(config: &CaptureConfig, width: u32, height: u32) -> Self {
        Self {
            window_width: width,
            window_height: height,
            browser_path: config.browser_path.clone(),
            navigation_deadline: Duration::from_secs(config.navigation_deadline_secs),
            operation_timeout: Duration::from_secs(config.operation_timeout_secs),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            window_width: 1680,
            window_height: 900,
            browser_path: None,
            navigation_deadline: Duration::from_secs(120),
            operation_timeout: Duration::from_secs(100),
        }
    }
}

/// Active browser session with Chrome DevTools Protocol
///
/// Owns exactly one browser process and one open tab for the duration of a
/// single capture. The process is terminated when the session is dropped, so
/// every exit path through the pipeline releases it.
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    /// Configuration
    config: BrowserConfig,
}

impl BrowserSession {
    /// Launch a new headless browser instance
    ///
    /// Timestamps rendered by the page are deterministic: the browser
    /// process runs with `TZ=UTC`.
    pub async fn launch(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching headless browser (window: {}x{})",
            config.window_width, config.window_height
        );

        let mut launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((config.window_width, config.window_height)))
            .path(config.browser_path.clone())
            .ignore_certificate_errors(true)
            .process_envs(Some(HashMap::from([(
                "TZ".to_string(),
                "UTC".to_string(),
            )])))
            .build()
            .map_err(|e| ReportError::Browser(format!("Failed to build launch options: {}", e)))?;

        for arg in LAUNCH_ARGS {
            launch_options.args.push(OsStr::new(arg));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| ReportError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| ReportError::Browser(format!("Failed to create tab: {}", e)))?;

        tab.set_default_timeout(config.operation_timeout);

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Navigate to a URL and wait for the page to load and the network to
    /// go quiet
    ///
    /// Bounded by the configured navigation deadline; a page that never
    /// finishes loading fails with a navigation error rather than hanging.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        let deadline = Instant::now() + self.config.navigation_deadline;

        // Navigation gets the full deadline; subsequent operations revert
        // to the per-operation timeout.
        self.tab.set_default_timeout(self.config.navigation_deadline);

        let navigated = self
            .tab
            .navigate_to(url)
            .map_err(|e| ReportError::Navigation(format!("Failed to navigate to {}: {}", url, e)))
            .and_then(|tab| {
                tab.wait_until_navigated().map_err(|e| {
                    ReportError::Navigation(format!("Navigation timeout for {}: {}", url, e))
                })
            });

        self.tab.set_default_timeout(self.config.operation_timeout);
        navigated?;

        self.wait_for_network_quiet(deadline).await?;

        info!("Successfully navigated to {}", url);
        Ok(())
    }

    /// Wait until no new network resources have been fetched for a
    /// sustained interval
    ///
    /// Samples the page's resource-timing entry count; the count holding
    /// steady across consecutive samples approximates network idle without
    /// request interception.
    async fn wait_for_network_quiet(&self, deadline: Instant) -> Result<()> {
        let mut previous_count = -1i64;
        let mut quiet_samples = 0u32;

        loop {
            let ready_state = self
                .evaluate("document.readyState")
                .await?
                .as_str()
                .unwrap_or("")
                .to_string();

            let resource_count = self
                .evaluate("performance.getEntriesByType('resource').length")
                .await?
                .as_i64()
                .unwrap_or(0);

            if ready_state == "complete" && resource_count == previous_count {
                quiet_samples += 1;
                if quiet_samples >= NETWORK_QUIET_SAMPLES {
                    debug!("Network quiet after {} resources", resource_count);
                    return Ok(());
                }
            } else {
                quiet_samples = 0;
            }
            previous_count = resource_count;

            if Instant::now() + NETWORK_QUIET_SAMPLE_INTERVAL > deadline {
                return Err(ReportError::Navigation(
                    "Page network activity never settled within the navigation deadline"
                        .to_string(),
                ));
            }
            tokio::time::sleep(NETWORK_QUIET_SAMPLE_INTERVAL).await;
        }
    }

    /// Apply the requested viewport
    ///
    /// Called after navigation, since many pages reflow on first paint.
    pub fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        debug!("Applying viewport {}x{}", width, height);

        self.tab
            .set_bounds(Bounds::Normal {
                left: None,
                top: None,
                width: Some(width as f64),
                height: Some(height as f64),
            })
            .map_err(|e| ReportError::Browser(format!("Failed to set viewport: {}", e)))?;

        Ok(())
    }

    /// Block until an element matching the selector is present and visible
    ///
    /// # Arguments
    /// * `selector` - CSS selector for the element
    /// * `timeout` - Optional bound (uses the per-operation timeout if None)
    pub async fn wait_for_element(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let timeout_duration = timeout.unwrap_or(self.config.operation_timeout);

        debug!(
            "Waiting for element: {} (timeout: {:?})",
            selector, timeout_duration
        );

        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout_duration)
            .map_err(|_e| {
                ReportError::ReadinessTimeout(format!("Element never appeared: {}", selector))
            })?;

        debug!("Element found: {}", selector);
        Ok(())
    }

    /// Execute JavaScript in the page context
    ///
    /// # Returns
    /// JSON result from JavaScript execution
    pub async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| ReportError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Get the full serialized page content
    pub fn content(&self) -> Result<String> {
        self.tab
            .get_content()
            .map_err(|e| ReportError::Browser(format!("Failed to read page content: {}", e)))
    }

    /// Read the document scroll height from the live DOM
    pub async fn scroll_height(&self) -> Result<f64> {
        let result = self
            .evaluate("document.documentElement.scrollHeight")
            .await?;
        result.as_f64().ok_or_else(|| {
            ReportError::Browser("scrollHeight evaluated to a non-numeric value".to_string())
        })
    }

    /// Get reference to the active tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        // Browser process is terminated on drop
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, browser process will be terminated");
    }
}

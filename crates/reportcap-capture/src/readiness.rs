//! Content readiness detection
//!
//! After navigation the page is not yet a report: UI chrome needs stripping,
//! the content root may still be mounting, and asynchronous renders may be
//! pending. Readiness runs four stages in strict order: chrome strip, a fixed
//! settle delay, a per-source ready-selector wait, and a content-length
//! stabilization poll.

use crate::browser::BrowserSession;
use reportcap_core::{ReportSource, Result, StabilizationConfig};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fixed delay after DOM mutation, letting layout/reflow begin
const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Content root selector for dashboards
const DASHBOARD_READY_SELECTOR: &str = "#dashboardViewport";
/// Content root selector for visualizations
const VISUALIZATION_READY_SELECTOR: &str = ".visChart";
/// Content root selector for notebooks
const NOTEBOOK_READY_SELECTOR: &str = ".euiPageBody";

/// UI chrome removed from every known source: action buttons and the top
/// navigation header, matched by class prefix.
const CHROME_STRIP_ALL: [&str; 2] = ["[class^='euiButton']", "[class^='euiHeader']"];

/// Editor chrome only present on visualization pages
const CHROME_STRIP_VISUALIZATION: [&str; 2] = [
    "[data-test-subj=\"splitPanelResizer\"]",
    ".visEditor__collapsibleSidebar",
];

/// Per-source readiness policy: what to strip and what to wait for
///
/// An absent ready selector means the visibility wait is skipped and the
/// pipeline proceeds directly to the stabilization poll.
#[derive(Debug, Clone)]
pub struct ReadinessPolicy {
    /// Selector that must be present and visible before capture
    pub ready_selector: Option<&'static str>,
    /// Selectors removed wherever they match
    pub strip_all: &'static [&'static str],
    /// Selectors removed at their first match only
    pub strip_first: &'static [&'static str],
}

impl ReadinessPolicy {
    /// Look up the policy for a source type
    pub fn for_source(source: ReportSource) -> Self {
        match source {
            ReportSource::Dashboard => Self {
                ready_selector: Some(DASHBOARD_READY_SELECTOR),
                strip_all: &CHROME_STRIP_ALL,
                strip_first: &[],
            },
            ReportSource::Visualization => Self {
                ready_selector: Some(VISUALIZATION_READY_SELECTOR),
                strip_all: &CHROME_STRIP_ALL,
                strip_first: &CHROME_STRIP_VISUALIZATION,
            },
            ReportSource::Notebook => Self {
                ready_selector: Some(NOTEBOOK_READY_SELECTOR),
                strip_all: &CHROME_STRIP_ALL,
                strip_first: &[],
            },
            ReportSource::SavedSearch => Self {
                ready_selector: None,
                strip_all: &CHROME_STRIP_ALL,
                strip_first: &[],
            },
            // Pages outside the dashboards application carry no known chrome
            ReportSource::Other => Self {
                ready_selector: None,
                strip_all: &[],
                strip_first: &[],
            },
        }
    }

    /// Generate the chrome-stripping script for this policy
    ///
    /// Built from the selector table and evaluated in the page's own
    /// execution context; returns None when there is nothing to strip.
    pub fn strip_script(&self) -> Option<String> {
        if self.strip_all.is_empty() && self.strip_first.is_empty() {
            return None;
        }

        let mut script = String::new();
        for selector in self.strip_all {
            script.push_str(&format!(
                "document.querySelectorAll(\"{}\").forEach((e) => e.remove());\n",
                selector.replace('"', "\\\"")
            ));
        }
        for selector in self.strip_first {
            script.push_str(&format!(
                "document.querySelector('{}')?.remove();\n",
                selector.replace('\'', "\\'")
            ));
        }
        script.push_str("document.body.style.paddingTop = '0px';");
        Some(script)
    }
}

/// Progress of the dynamic-content stabilization poll
///
/// Mutated only by the polling loop; reset per capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilizationState {
    /// Serialized content length at the previous sample
    pub previous_content_length: usize,
    /// Consecutive samples with unchanged content length
    pub consecutive_stable_checks: u32,
    /// Total samples taken
    pub checks_performed: u32,
}

impl StabilizationState {
    /// Whether the required run of unchanged samples was observed
    pub fn stable(&self, config: &StabilizationConfig) -> bool {
        self.consecutive_stable_checks >= config.required_checks
    }
}

/// Poll the page content length until it stops changing
///
/// The sampler is called once per interval; a changed (or first) sample
/// resets the consecutive-stable counter. The loop always terminates by the
/// configured sample ceiling — stability is a best-effort heuristic and the
/// capture proceeds with whatever state exists at that point.
pub async fn wait_for_dynamic_content<F>(
    mut sample: F,
    config: &StabilizationConfig,
) -> Result<StabilizationState>
where
    F: FnMut() -> Result<usize>,
{
    let interval = Duration::from_secs(config.interval_secs);
    let max_samples = config.max_samples();
    let mut state = StabilizationState::default();

    while state.checks_performed < max_samples {
        let current_length = sample()?;
        state.checks_performed += 1;

        if state.previous_content_length == 0 || state.previous_content_length != current_length {
            state.consecutive_stable_checks = 0;
        } else {
            state.consecutive_stable_checks += 1;
        }

        if state.stable(config) {
            break;
        }

        state.previous_content_length = current_length;
        tokio::time::sleep(interval).await;
    }

    Ok(state)
}

/// Wait for the page to finish rendering as a report
///
/// Stages, strictly ordered:
/// 1. chrome stripping (skipped for `Other`)
/// 2. fixed settle delay
/// 3. ready-selector visibility wait, when the source has one — terminal on
///    timeout
/// 4. content-length stabilization poll
pub async fn await_ready(
    session: &BrowserSession,
    source: ReportSource,
    stabilization: &StabilizationConfig,
) -> Result<()> {
    let policy = ReadinessPolicy::for_source(source);

    if let Some(script) = policy.strip_script() {
        debug!("Stripping UI chrome for {}", source);
        session.evaluate(&script).await?;
    }

    tokio::time::sleep(SETTLE_DELAY).await;

    if let Some(selector) = policy.ready_selector {
        session.wait_for_element(selector, None).await?;
    }

    // sampling the serialized DOM is a cheap proxy for "no async renders
    // pending" without cooperation from the page
    let state = wait_for_dynamic_content(
        || session.content().map(|content| content.len()),
        stabilization,
    )
    .await?;

    if state.stable(stabilization) {
        info!(
            "Page content stabilized after {} samples",
            state.checks_performed
        );
    } else {
        warn!(
            "Page content never stabilized ({} samples taken), proceeding with current state",
            state.checks_performed
        );
    }

    Ok(())
}

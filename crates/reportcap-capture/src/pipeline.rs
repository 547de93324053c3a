//! End-to-end capture orchestration
//!
//! Sequences the pipeline stages for one request: resolve, acquire a scoped
//! browser session, await readiness, encode, release the session, persist.
//! Stages short-circuit: a resolution failure never launches a browser and a
//! readiness failure never encodes.

use crate::artifact::{build_artifact, persist};
use crate::browser::{BrowserConfig, BrowserSession};
use crate::encode::encode;
use crate::readiness::await_ready;
use crate::resolver::resolve;
use reportcap_core::{CaptureArtifact, CaptureConfig, CaptureRequest, Result};
use tracing::{error, info};

/// Run one capture end to end
///
/// Any stage failure fails the whole capture; there is no partial-success
/// reporting and no retry here (retry policy belongs to the caller). The
/// browser process is released on every exit path, including when the
/// returned future is dropped by an external timeout: the session owns the
/// process and tears it down on drop. Concurrent captures are supported as
/// independent pipelines; nothing here is shared mutable state.
pub async fn capture(
    request: &CaptureRequest,
    config: &CaptureConfig,
) -> Result<CaptureArtifact> {
    match run_stages(request, config).await {
        Ok(artifact) => Ok(artifact),
        Err(e) => {
            error!(
                source = %request.source,
                url = request.source_url.as_deref().unwrap_or(""),
                object_id = request.object_id.as_deref().unwrap_or(""),
                "Capture failed: {}",
                e
            );
            Err(e)
        }
    }
}

async fn run_stages(request: &CaptureRequest, config: &CaptureConfig) -> Result<CaptureArtifact> {
    request.validate()?;
    let target = resolve(request, &config.base_url)?;

    info!(
        "Capturing {} report of {} ({})",
        request.format, target.url, target.source
    );

    let session = BrowserSession::launch(BrowserConfig::from_capture(
        config,
        request.viewport_width,
        request.viewport_height,
    ))
    .await?;

    session.navigate(&target.url).await?;
    session.set_viewport(request.viewport_width, request.viewport_height)?;

    await_ready(&session, target.source, &config.stabilization).await?;

    let bytes = encode(&session, request.format).await?;

    // release the browser before touching storage; no session outlives its
    // capture
    session.close().await?;

    let artifact = build_artifact(&bytes, request.format);
    persist(&artifact, &config.output_dir).await?;

    Ok(artifact)
}

use crate::{RenderError, RenderSession, Renderer};
use ink_base::ViewportSpec;
use ink_image::RawFrame;
use std::time::Duration;
use tokio::time::Instant;

/// Runs one renderer session per call under a hard deadline.
pub struct FrameCapture<R> {
    renderer: R,
}

impl<R: Renderer> FrameCapture<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render `source` at `viewport` and return the snapshot.
    ///
    /// Opens a fresh session, navigates, waits for `ready_selector` and takes
    /// the snapshot, all within `timeout`. The session is closed on success
    /// and on error; when the deadline cuts it off, it is dropped instead.
    ///
    /// # Errors
    ///
    /// - `RenderError::InvalidRequest` for a zero-sized viewport or zero timeout
    /// - `RenderError::Timeout` if the whole capture did not finish in time
    /// - `RenderError::Failure` / `RenderError::Decode` if the renderer failed,
    ///   including a snapshot that is empty or malformed
    pub async fn capture(
        &self,
        viewport: ViewportSpec,
        source: &str,
        ready_selector: &str,
        timeout: Duration,
    ) -> Result<RawFrame, RenderError> {
        viewport
            .validate()
            .map_err(|e| RenderError::InvalidRequest(e.to_string()))?;
        if timeout.is_zero() {
            return Err(RenderError::InvalidRequest("timeout must be positive".to_string()));
        }

        let started = Instant::now();
        let frame = tokio::time::timeout(
            timeout,
            self.run_session(viewport, source, ready_selector, timeout, started),
        )
        .await
        .map_err(|_| RenderError::Timeout(timeout))??;

        log::debug!(
            "captured {} as {}x{} {:?} in {:?}",
            source,
            frame.width,
            frame.height,
            frame.format,
            started.elapsed()
        );
        Ok(frame)
    }

    async fn run_session(
        &self,
        viewport: ViewportSpec,
        source: &str,
        ready_selector: &str,
        timeout: Duration,
        started: Instant,
    ) -> Result<RawFrame, RenderError> {
        let mut session = self.renderer.open_session(viewport).await?;
        let result = Self::drive(&mut session, source, ready_selector, timeout, started).await;
        if let Err(e) = session.close().await {
            log::warn!("render session did not close cleanly: {}", e);
        }

        let frame = result?;
        if frame.data.is_empty() {
            return Err(RenderError::Failure("renderer returned an empty snapshot".to_string()));
        }
        frame
            .validate()
            .map_err(|e| RenderError::Failure(format!("renderer returned a malformed snapshot: {e}")))?;
        Ok(frame)
    }

    async fn drive(
        session: &mut R::Session,
        source: &str,
        ready_selector: &str,
        timeout: Duration,
        started: Instant,
    ) -> Result<RawFrame, RenderError> {
        session.navigate(source).await?;
        let remaining = timeout.saturating_sub(started.elapsed());
        session.wait_for(ready_selector, remaining).await?;
        session.snapshot().await
    }
}

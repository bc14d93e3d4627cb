use crate::{CycleError, Stage};
use ink_base::ViewportSpec;
use ink_display::{DisplayAdapter, DisplayDriver};
use ink_image::{Palette, TranscodeOptions};
use ink_render::{FrameCapture, Renderer};
use std::time::{Duration, SystemTime};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// What one cycle needs besides its capture and display.
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub viewport: ViewportSpec,
    pub source: String,
    pub ready_selector: String,
    pub render_timeout: Duration,
    pub palette: Palette,
    pub transcode: TranscodeOptions,
    /// Put the panel into deep sleep after each refresh.
    pub sleep_between: bool,
}

#[derive(Debug)]
pub enum CycleOutcome {
    /// A new frame reached the panel.
    Shown,
    /// Shutdown was requested before the cycle could finish.
    Cancelled,
    Failed(CycleError),
}

/// Record of a single cycle, for logging.
#[derive(Debug)]
pub struct CycleResult {
    pub started: SystemTime,
    pub elapsed: Duration,
    pub outcome: CycleOutcome,
}

impl CycleResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Shown)
    }

    pub fn error(&self) -> Option<&CycleError> {
        match &self.outcome {
            CycleOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Stage that failed, if any.
    pub fn failed_stage(&self) -> Option<Stage> {
        self.error().map(CycleError::stage)
    }
}

/// One refresh: capture, transcode, show.
///
/// Owns the long-lived display adapter; the renderer opens a fresh session on
/// every run. A failing stage ends the cycle and is reported in the result,
/// never raised.
pub struct UpdateCycle<R, D> {
    capture: FrameCapture<R>,
    adapter: DisplayAdapter<D>,
    settings: CycleSettings,
    shutdown: CancellationToken,
}

impl<R: Renderer, D: DisplayDriver + 'static> UpdateCycle<R, D> {
    /// `adapter` must already be initialized.
    pub fn new(
        capture: FrameCapture<R>,
        adapter: DisplayAdapter<D>,
        settings: CycleSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            capture,
            adapter,
            settings,
            shutdown,
        }
    }

    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    pub fn adapter(&self) -> &DisplayAdapter<D> {
        &self.adapter
    }

    /// Hand back the display, e.g. to put it to sleep on exit.
    pub fn into_adapter(self) -> DisplayAdapter<D> {
        self.adapter
    }

    pub async fn run(&mut self) -> CycleResult {
        let started = SystemTime::now();
        let clock = Instant::now();
        log::info!("refreshing from {}", self.settings.source);

        let outcome = match self.stages().await {
            Ok(outcome) => outcome,
            Err(err) => CycleOutcome::Failed(err),
        };
        let result = CycleResult {
            started,
            elapsed: clock.elapsed(),
            outcome,
        };

        match &result.outcome {
            CycleOutcome::Shown => log::info!("refresh done in {:?}", result.elapsed),
            CycleOutcome::Cancelled => log::info!("refresh cancelled by shutdown"),
            CycleOutcome::Failed(err) => {
                log::error!("refresh failed in {} stage after {:?}: {}", err.stage(), result.elapsed, err)
            }
        }
        result
    }

    async fn stages(&mut self) -> Result<CycleOutcome, CycleError> {
        let settings = &self.settings;

        if self.shutdown.is_cancelled() {
            return Ok(CycleOutcome::Cancelled);
        }
        let stage_clock = Instant::now();
        let frame = self
            .capture
            .capture(
                settings.viewport,
                &settings.source,
                &settings.ready_selector,
                settings.render_timeout,
            )
            .await?;
        log::debug!("capture took {:?}", stage_clock.elapsed());

        if self.shutdown.is_cancelled() {
            return Ok(CycleOutcome::Cancelled);
        }
        let stage_clock = Instant::now();
        let panel = ink_image::transcode(
            frame,
            settings.viewport,
            settings.palette.clone(),
            settings.transcode,
        )
        .await?;
        log::debug!("transcode took {:?}", stage_clock.elapsed());

        if self.shutdown.is_cancelled() {
            return Ok(CycleOutcome::Cancelled);
        }
        let stage_clock = Instant::now();
        self.adapter.show(panel).await?;
        log::debug!("display took {:?}", stage_clock.elapsed());

        // the frame is already on the panel, a failed sleep only costs power
        if settings.sleep_between {
            if let Err(e) = self.adapter.sleep().await {
                log::warn!("display did not go to sleep: {}", e);
            }
        }

        Ok(CycleOutcome::Shown)
    }
}

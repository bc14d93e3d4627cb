use crate::RenderError;
use ink_base::ViewportSpec;
use ink_image::RawFrame;
use std::time::Duration;

/// Something that can render a named visual source into a bitmap.
#[allow(async_fn_in_trait)]
pub trait Renderer {
    type Session: RenderSession;

    /// Start a fresh, isolated session whose surface is `viewport` sized.
    async fn open_session(&self, viewport: ViewportSpec) -> Result<Self::Session, RenderError>;
}

/// One single-use rendering context.
///
/// Implementations must release everything they hold when dropped, so that a
/// session abandoned mid-way (timeout, cancellation) leaks nothing. `close`
/// is the orderly path and may report problems; dropping is the fallback.
#[allow(async_fn_in_trait)]
pub trait RenderSession {
    async fn navigate(&mut self, source: &str) -> Result<(), RenderError>;

    /// Block until content matching `selector` is present, or fail with
    /// `RenderError::Timeout` once `timeout` has elapsed.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), RenderError>;

    /// Capture the whole rendered surface.
    async fn snapshot(&mut self) -> Result<RawFrame, RenderError>;

    async fn close(self) -> Result<(), RenderError>
    where
        Self: Sized;
}

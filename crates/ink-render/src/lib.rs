//! Frame capture for ink panels.
//!
//! A `Renderer` turns a named visual source into a bitmap through single-use
//! sessions; `FrameCapture` drives one session per call under a deadline.

pub mod capture;
pub mod error;
pub mod selector;
pub mod traits;

#[cfg(feature = "chromium")]
pub mod chromium;

pub use capture::FrameCapture;
pub use error::RenderError;
pub use selector::ReadySelector;
pub use traits::{RenderSession, Renderer};

#[cfg(feature = "chromium")]
pub use chromium::{ChromiumConfig, ChromiumRenderer, ChromiumSession};

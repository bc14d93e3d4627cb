//! Panel output for ink frames.
//!
//! `DisplayDriver` is the bus-level contract a panel controller fulfils;
//! `DisplayAdapter` owns one driver for the life of the process and enforces
//! its init-once discipline.

pub mod adapter;
pub mod error;
pub mod preview;
pub mod traits;
pub mod waveshare;

pub use adapter::{AdapterState, DisplayAdapter};
pub use error::DisplayError;
pub use preview::PngDriver;
pub use traits::DisplayDriver;
pub use waveshare::Epd4in01f;

#[cfg(feature = "waveshare")]
pub use waveshare::{LinuxEpd4in01f, WaveshareConfig};

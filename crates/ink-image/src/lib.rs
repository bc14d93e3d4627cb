//! Frame transcoding for ink panels.
//!
//! Turns a rendered bitmap of any size and color model into the packed,
//! palette-indexed buffer a multi-color e-paper controller expects:
//! contain-fit onto the panel, nearest-color quantization, then bit packing.

pub mod error;
pub mod fit;
pub mod palette;
pub mod panel;
pub mod quantize;
pub mod raw;

pub use error::ImageError;
pub use palette::{ACEP_7, Color, Palette};
pub use panel::{PanelFrame, pack, packed_len};
pub use raw::{PixelFormat, RawFrame};

use ink_base::ViewportSpec;

/// Knobs for `transcode` beyond the target size and palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Fill for letterbox bars and for transparent pixels.
    pub background: Color,
    /// Use error diffusion instead of plain nearest-color mapping.
    pub dither: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            dither: false,
        }
    }
}

/// Fit, quantize and pack `frame` for a `target`-sized panel showing `palette`.
///
/// The result always holds exactly `target.width * target.height` pixels at
/// `palette.bits_per_pixel()`, whatever the shape of the input. The output
/// depends only on the inputs, so the same frame always packs to the same bytes.
///
/// # Errors
///
/// Returns `ImageError::UnsupportedFormat` if the frame's bytes do not match
/// its declared size and color model, and `ImageError::InvalidDimensions` for
/// a zero-sized frame or target. Nothing is returned on failure.
pub fn transcode_blocking(
    frame: &RawFrame,
    target: ViewportSpec,
    palette: &Palette,
    options: &TranscodeOptions,
) -> Result<PanelFrame, ImageError> {
    target.validate()?;
    let rgb = frame.to_rgb(options.background)?;
    let fitted = fit::contain(rgb, target, options.background);
    let indices = if options.dither {
        quantize::quantize_dithered(&fitted, palette)
    } else {
        quantize::quantize(&fitted, palette)
    };
    let bpp = palette.bits_per_pixel();
    PanelFrame::new(target.width, target.height, bpp, pack(&indices, bpp))
}

/// `transcode_blocking` on tokio's blocking thread pool.
///
/// Takes ownership of the frame; a cycle consumes its frame exactly once.
pub async fn transcode(
    frame: RawFrame,
    target: ViewportSpec,
    palette: Palette,
    options: TranscodeOptions,
) -> Result<PanelFrame, ImageError> {
    tokio::task::spawn_blocking(move || transcode_blocking(&frame, target, &palette, &options))
        .await
        .map_err(|e| ImageError::Encode(format!("transcode task failed: {e}")))?
}

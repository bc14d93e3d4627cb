use crate::{Color, ImageError};
use crates_image::{DynamicImage, RgbImage};

/// Color model of a `RawFrame`'s bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Luma8,
    LumaA8,
    Rgb8,
    Rgba8,
    /// Alpha first, as some compositors hand out.
    Argb8,
}

impl PixelFormat {
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Luma8 => 1,
            PixelFormat::LumaA8 => 2,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 | PixelFormat::Argb8 => 4,
        }
    }

    /// Split one pixel into color and alpha.
    fn split(&self, px: &[u8]) -> ([u8; 3], u8) {
        match self {
            PixelFormat::Luma8 => ([px[0]; 3], 0xFF),
            PixelFormat::LumaA8 => ([px[0]; 3], px[1]),
            PixelFormat::Rgb8 => ([px[0], px[1], px[2]], 0xFF),
            PixelFormat::Rgba8 => ([px[0], px[1], px[2]], px[3]),
            PixelFormat::Argb8 => ([px[1], px[2], px[3]], px[0]),
        }
    }
}

/// One rendered bitmap, in whatever color model the renderer produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl RawFrame {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self, ImageError> {
        let frame = Self {
            width,
            height,
            format,
            data,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// A frame of one flat color.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, ImageError> {
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .filter(|n| n.checked_mul(3).is_some())
            .ok_or(ImageError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            format: PixelFormat::Rgb8,
            data: [color.r, color.g, color.b].repeat(pixels),
        })
    }

    /// Decode an encoded bitmap (PNG, JPEG, ...) as produced by a screenshot.
    ///
    /// 8-bit luma and RGB variants are kept as-is; deeper or float variants
    /// are narrowed to RGBA8 since the panel has a handful of colors anyway.
    pub fn decode(encoded: &[u8]) -> Result<Self, ImageError> {
        let img = crates_image::load_from_memory(encoded)?;
        let (width, height) = (img.width(), img.height());
        let (format, data) = match img {
            DynamicImage::ImageLuma8(buf) => (PixelFormat::Luma8, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (PixelFormat::LumaA8, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (PixelFormat::Rgb8, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (PixelFormat::Rgba8, buf.into_raw()),
            other => (PixelFormat::Rgba8, other.to_rgba8().into_raw()),
        };
        Self::new(width, height, format, data)
    }

    /// Check that the buffer can be read as `width * height` pixels of `format`.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.format.channels()))
            .ok_or(ImageError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        if self.data.len() != expected {
            return Err(ImageError::UnsupportedFormat(format!(
                "{} bytes cannot be read as {}x{} {:?} ({} expected)",
                self.data.len(),
                self.width,
                self.height,
                self.format,
                expected
            )));
        }
        Ok(())
    }

    /// Flatten to opaque RGB, blending any alpha over `background`.
    pub fn to_rgb(&self, background: Color) -> Result<RgbImage, ImageError> {
        self.validate()?;
        let bg = [background.r, background.g, background.b];
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(self.format.channels()) {
            let (color, alpha) = self.format.split(px);
            if alpha == 0xFF {
                rgb.extend_from_slice(&color);
            } else {
                let a = alpha as u32;
                for (c, b) in color.iter().zip(bg) {
                    rgb.push(((*c as u32 * a + b as u32 * (255 - a) + 127) / 255) as u8);
                }
            }
        }
        RgbImage::from_raw(self.width, self.height, rgb).ok_or(ImageError::InvalidDimensions {
            width: self.width,
            height: self.height,
        })
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportError {
    ZeroDimension { width: u32, height: u32 },
    Overflow { width: u32, height: u32 },
}

impl fmt::Display for ViewportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewportError::ZeroDimension { width, height } => {
                write!(f, "viewport dimensions must be positive, got {width}x{height}")
            }
            ViewportError::Overflow { width, height } => {
                write!(f, "viewport {width}x{height} overflows the pixel count")
            }
        }
    }
}

impl std::error::Error for ViewportError {}

/// Pixel dimensions of the panel, and of everything rendered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportSpec {
    pub width: u32,
    pub height: u32,
}

impl ViewportSpec {
    /// Create a viewport, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, ViewportError> {
        let viewport = Self { width, height };
        viewport.validate()?;
        Ok(viewport)
    }

    pub fn validate(&self) -> Result<(), ViewportError> {
        if self.width == 0 || self.height == 0 {
            return Err(ViewportError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(ViewportError::Overflow {
                width: self.width,
                height: self.height,
            })?;
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for ViewportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

use crate::{DisplayDriver, DisplayError};
use ink_image::{PanelFrame, Palette};
use std::path::{Path, PathBuf};

/// Stands in for a panel by writing each frame, as the panel would show it,
/// to a PNG file. The file is replaced atomically so viewers never see a
/// half-written image.
#[derive(Debug)]
pub struct PngDriver {
    path: PathBuf,
    palette: Palette,
    frames_written: u64,
}

impl PngDriver {
    pub fn new(path: impl Into<PathBuf>, palette: Palette) -> Self {
        Self {
            path: path.into(),
            palette,
            frames_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl DisplayDriver for PngDriver {
    fn init(&mut self) -> Result<(), DisplayError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn write(&mut self, frame: &PanelFrame) -> Result<(), DisplayError> {
        let png = frame.to_png(&self.palette)?;
        let staging = self.path.with_extension("png.tmp");
        std::fs::write(&staging, png)?;
        std::fs::rename(&staging, &self.path)?;
        self.frames_written += 1;
        log::debug!("preview written to {}", self.path.display());
        Ok(())
    }
}

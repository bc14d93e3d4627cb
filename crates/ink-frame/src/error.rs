use ink_display::DisplayError;
use ink_image::ImageError;
use ink_render::RenderError;
use std::fmt;
use std::time::Duration;

/// Pipeline stage of an update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capture,
    Transcode,
    Display,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Capture => write!(f, "capture"),
            Stage::Transcode => write!(f, "transcode"),
            Stage::Display => write!(f, "display"),
        }
    }
}

/// Why a single update cycle failed. None of these stop the scheduler.
#[derive(Debug)]
pub enum CycleError {
    RenderTimeout(Duration),
    RenderFailure(RenderError),
    UnsupportedFormat(ImageError),
    DisplayIo(DisplayError),
}

impl CycleError {
    pub fn stage(&self) -> Stage {
        match self {
            CycleError::RenderTimeout(_) | CycleError::RenderFailure(_) => Stage::Capture,
            CycleError::UnsupportedFormat(_) => Stage::Transcode,
            CycleError::DisplayIo(_) => Stage::Display,
        }
    }
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::RenderTimeout(after) => write!(f, "render timed out after {after:?}"),
            CycleError::RenderFailure(err) => write!(f, "{err}"),
            CycleError::UnsupportedFormat(err) => write!(f, "{err}"),
            CycleError::DisplayIo(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CycleError::RenderTimeout(_) => None,
            CycleError::RenderFailure(err) => Some(err),
            CycleError::UnsupportedFormat(err) => Some(err),
            CycleError::DisplayIo(err) => Some(err),
        }
    }
}

impl From<RenderError> for CycleError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Timeout(after) => CycleError::RenderTimeout(after),
            other => CycleError::RenderFailure(other),
        }
    }
}

impl From<ImageError> for CycleError {
    fn from(err: ImageError) -> Self {
        CycleError::UnsupportedFormat(err)
    }
}

impl From<DisplayError> for CycleError {
    fn from(err: DisplayError) -> Self {
        CycleError::DisplayIo(err)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "cannot read config: {err}"),
            ConfigError::Parse(err) => write!(f, "cannot parse config: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<ImageError> for ConfigError {
    fn from(err: ImageError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

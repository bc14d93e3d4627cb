use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum RenderError {
    InvalidRequest(String),
    Timeout(Duration),
    Failure(String),
    Decode(ink_image::ImageError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidRequest(msg) => write!(f, "invalid capture request: {msg}"),
            RenderError::Timeout(after) => write!(f, "render timed out after {after:?}"),
            RenderError::Failure(msg) => write!(f, "render failed: {msg}"),
            RenderError::Decode(err) => write!(f, "snapshot decode error: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Failure(err.to_string())
    }
}

impl From<ink_image::ImageError> for RenderError {
    fn from(err: ink_image::ImageError) -> Self {
        RenderError::Decode(err)
    }
}

use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum DisplayError {
    NotInitialized,
    AlreadyInitialized,
    Io(String),
    BusyTimeout(Duration),
    FrameMismatch {
        expected: (u32, u32, u8),
        got: (u32, u32, u8),
    },
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::NotInitialized => write!(f, "display used before init"),
            DisplayError::AlreadyInitialized => write!(f, "display already initialized"),
            DisplayError::Io(msg) => write!(f, "display I/O error: {msg}"),
            DisplayError::BusyTimeout(after) => write!(f, "panel still busy after {after:?}"),
            DisplayError::FrameMismatch { expected, got } => write!(
                f,
                "frame is {}x{}@{}bpp, panel needs {}x{}@{}bpp",
                got.0, got.1, got.2, expected.0, expected.1, expected.2
            ),
        }
    }
}

impl std::error::Error for DisplayError {}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::Io(err.to_string())
    }
}

impl From<ink_image::ImageError> for DisplayError {
    fn from(err: ink_image::ImageError) -> Self {
        DisplayError::Io(err.to_string())
    }
}

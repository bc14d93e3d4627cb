use std::fmt;

#[derive(Debug)]
pub enum ImageError {
    UnsupportedFormat(String),
    InvalidDimensions { width: u32, height: u32 },
    InvalidPalette(String),
    Decode(String),
    Encode(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedFormat(msg) => write!(f, "unsupported format: {msg}"),
            ImageError::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions: {width}x{height}")
            }
            ImageError::InvalidPalette(msg) => write!(f, "invalid palette: {msg}"),
            ImageError::Decode(msg) => write!(f, "decode error: {msg}"),
            ImageError::Encode(msg) => write!(f, "encode error: {msg}"),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        match err {
            crates_image::ImageError::Unsupported(e) => ImageError::UnsupportedFormat(e.to_string()),
            crates_image::ImageError::Encoding(e) => ImageError::Encode(e.to_string()),
            other => ImageError::Decode(other.to_string()),
        }
    }
}

impl From<ink_base::ViewportError> for ImageError {
    fn from(err: ink_base::ViewportError) -> Self {
        match err {
            ink_base::ViewportError::ZeroDimension { width, height }
            | ink_base::ViewportError::Overflow { width, height } => {
                ImageError::InvalidDimensions { width, height }
            }
        }
    }
}

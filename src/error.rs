use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while setting up or feeding the slideshow.
///
/// Navigation itself never fails: out-of-range indices are clamped and
/// broken images still count towards hiding the loading indicator.
#[derive(Error, Debug)]
pub enum SlideshowError {
    /// A required anchor element is absent from the page, nothing was rendered
    #[error("Required page element not found: .{class}")]
    MissingAnchor { class: &'static str },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No image files found in directory: {path:?}")]
    NoImages { path: PathBuf },

    #[error("Failed to load image {path:?}: {message}")]
    Image { path: PathBuf, message: String },
}

impl SlideshowError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn image(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Image { path: path.into(), message: message.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, SlideshowError>;

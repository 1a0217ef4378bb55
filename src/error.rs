//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, image codec and resampler errors, and provides semantic
//! variants for argument validation, engine launch and UCI parsing failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Resize error: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    #[error("Image buffer error: {0}")]
    ImageBuffer(#[from] fast_image_resize::ImageBufferError),

    #[error("Failed to launch engine {program}: {source}")]
    EngineSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed UCI line {line:?}: {reason}")]
    UciParse { line: String, reason: String },

    #[error("{arg} must be greater than 0")]
    ZeroSize { arg: &'static str },

    #[error("Processing error: {0}")]
    Processing(String),
}

impl Error {
    pub(crate) fn uci(line: &str, reason: impl Into<String>) -> Self {
        Error::UciParse {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

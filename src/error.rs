use thiserror::Error;

#[derive(Error, Debug)]
pub enum PngShuffleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid file format at byte {offset}: {reason}")]
    InvalidFormat { offset: usize, reason: String },

    #[error(
        "Truncated stream at byte {offset}: requested {requested} bytes, only {available} remain"
    )]
    TruncatedStream {
        offset: usize,
        requested: usize,
        available: usize,
    },

    #[error("Inconsistent chunk position {position} at byte {offset}: {reason}")]
    InconsistentPositions {
        offset: usize,
        position: u32,
        reason: String,
    },

    #[error("Cannot read a {width}-byte integer at byte {offset}: at most 8 bytes fit in a u64")]
    IntegerWidth { offset: usize, width: usize },

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),
}

impl PngShuffleError {
    /// Byte offset into the input buffer the error refers to, if any
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidFormat { offset, .. }
            | Self::TruncatedStream { offset, .. }
            | Self::InconsistentPositions { offset, .. }
            | Self::IntegerWidth { offset, .. } => Some(*offset),
            Self::Io(_) | Self::Json(_) | Self::InvalidSeed(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PngShuffleError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("gif encoding failed: {0}")]
    GifEncode(#[from] gif::EncodingError),

    #[error("gif decoding failed: {0}")]
    GifDecode(#[from] gif::DecodingError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad time array shape: {0}")]
    Shape(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("refusing to write an animation with no frames")]
    EmptyAnimation,

    #[error("frame {index} is {found:?}, expected {expected:?}")]
    FrameSizeMismatch {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("time step {t} out of range for {n_timepoints} timepoints")]
    TimeOutOfRange { t: usize, n_timepoints: usize },
}

pub type Result<T> = std::result::Result<T, VizError>;

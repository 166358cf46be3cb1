use thiserror::Error;

/// Fatal errors surfaced by generation and serialization.
///
/// Point queries and chunk extraction never produce these; they degrade to
/// safe defaults instead (see `sample` and `chunk`).
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("invalid terrain dimensions: width {width}, height {height}, resolution {resolution} yield an empty grid")]
    InvalidDimensions {
        width: f32,
        height: f32,
        resolution: f32,
    },

    #[error("generation produced an empty grid")]
    EmptyResult,

    #[error("unknown serialization format '{0}'")]
    UnknownFormat(String),

    #[error("import from {0} is not supported")]
    UnsupportedImport(&'static str),

    #[error("raw import requires width/height/resolution parameters")]
    MissingRawParams,

    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

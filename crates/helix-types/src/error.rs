use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelixError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("Sample index out of bounds: index={index}, len={len}")]
    SampleOutOfBounds { index: usize, len: usize },

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HelixResult<T> = Result<T, HelixError>;

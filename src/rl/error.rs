use thiserror::Error;

/// Errors raised by the environment and its configuration
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("unsupported render mode '{0}', expected one of: human, rgb_array")]
    UnsupportedRenderMode(String),

    #[error("invalid action index {0}, expected 0..4")]
    InvalidAction(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("terminal display error: {0}")]
    Display(String),
}

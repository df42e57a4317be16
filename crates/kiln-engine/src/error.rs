//! Engine error types

use thiserror::Error;

/// Result type alias using the engine's error type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while rebuilding the active shader program
#[derive(Error, Debug)]
pub enum EngineError {
    /// The scene or config could not be turned into shader source
    #[error(transparent)]
    Scene(#[from] kiln_sdf::Error),

    /// The backend rejected the assembled source
    #[error("Shader compilation failed: {0}")]
    Compile(String),
}

//! Error types for the signature pad

use thiserror::Error;

/// Result type alias for signature pad operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, drawing on or exporting a surface
#[derive(Error, Debug)]
pub enum Error {
    /// The requested surface could not be found in the document
    #[error("Surface not found: {0}")]
    SurfaceNotFound(String),

    /// The resolved element does not support a 2D drawing context
    #[error("Element does not support a 2D context: {0}")]
    NotDrawable(String),

    /// A CSS selector used for lookup failed to parse
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// The surface holds cross-origin content and may not be read back
    #[error("Security error: {0}")]
    SecurityError(String),

    /// The image encoder failed
    #[error("Image encoding failed: {0}")]
    EncodeError(String),

    /// A stroke style value could not be parsed
    #[error("Invalid stroke style: {0}")]
    InvalidStyle(String),

    /// Invalid configuration or page input
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

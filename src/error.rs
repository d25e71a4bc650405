//! Error types for the slide exporter

use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconstructing or writing a slide
#[derive(Error, Debug)]
pub enum Error {
    /// The captured DOM tree could not be turned into snapshots
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// A color string could not be parsed
    #[error("Unparseable color: {0}")]
    ColorError(String),

    /// Chart metadata attached to an element was malformed
    #[error("Malformed chart metadata: {0}")]
    ChartError(String),

    /// The snapshot collaborator failed to rasterize a subtree
    #[error("Snapshot failed: {0}")]
    SnapshotError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error while writing the output document
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error writing the presentation container
    #[cfg(feature = "pptx")]
    #[error("Archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

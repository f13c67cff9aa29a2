// src/error.rs

use thiserror::Error;

/// Core error types for atxpkg
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O errors with extra context about the path involved
    #[error("I/O error: {0}")]
    IoError(String),

    /// A file on disk is in the way of the operation
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Package, version or repository entry not found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Package is already installed
    #[error("Package {0} already installed")]
    AlreadyInstalled(String),

    /// Repository listing or package download failed
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Malformed package reference, version or document
    #[error("Parse error: {0}")]
    ParseError(String),

    /// External merge tool failed
    #[error("Merge error: {0}")]
    MergeError(String),

    /// Ledger (de)serialization errors
    #[error("Ledger error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zip archive errors
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Directory traversal errors
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type alias using atxpkg's Error type
pub type Result<T> = std::result::Result<T, Error>;

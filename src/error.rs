//! Error types for the converters and the uploader.

use std::path::PathBuf;

/// Failure while turning a tracker database into GPX files.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("File '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Unexpected database structure: {0}")]
    Schema(#[from] rusqlite::Error),

    #[error("Malformed data in ride {ride_id}: {reason}")]
    Parse { ride_id: i64, reason: String },

    #[error("Failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize GPX: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("Timestamp out of range: {0}")]
    TimeRange(#[from] time::error::ComponentRange),

    #[error("Timestamp out of range")]
    OutOfRange,

    #[error("Failed to format timestamp: {0}")]
    TimeFormat(#[from] time::error::Format),

    #[error("Failed to read back timestamp: {0}")]
    TimeParse(#[from] time::error::Parse),

    #[error("Cannot determine the local UTC offset, pass --utc-offset")]
    LocalOffset(#[from] time::error::IndeterminateOffset),
}

/// Failure while authorizing against Strava or uploading a file.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Directory '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid API config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Strava API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unreadable Strava response (HTTP {status}): {reason}")]
    InvalidResponse { status: u16, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

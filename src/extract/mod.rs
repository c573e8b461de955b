//! Readers for the tracker databases.

pub mod literal;
pub mod supercycle;
pub mod zeopoxa;

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use time::PrimitiveDateTime;

use crate::error::ConvertError;

/// One GPS sample, with its wall-clock time in the recording zone.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub time: PrimitiveDateTime,
}

/// Open a tracker database without write access.
pub fn open_database(path: &Path) -> Result<Connection, ConvertError> {
    if !path.is_file() {
        return Err(ConvertError::NotFound(path.to_path_buf()));
    }
    let sqlite = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    tracing::debug!(path = %path.display(), "opened database");
    Ok(sqlite)
}

//! Sequential upload of every GPX file in a directory.
//!
//! Each file is attempted once. A failed upload is recorded and the batch
//! moves on to the next file.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::UploadError;
use crate::strava::StravaSession;

/// Something that can upload a GPX file and answer with a JSON payload.
pub trait GpxUploader {
    fn upload(&self, path: &Path) -> Result<Value, UploadError>;
}

impl GpxUploader for StravaSession {
    fn upload(&self, path: &Path) -> Result<Value, UploadError> {
        self.upload_gpx(path)
    }
}

/// `.gpx` files directly inside `dir`, sorted by file name.
pub fn gpx_files(dir: &Path) -> Result<Vec<PathBuf>, UploadError> {
    if !dir.is_dir() {
        return Err(UploadError::NotFound(dir.to_path_buf()));
    }
    let io_error = |source: std::io::Error| UploadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_gpx = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(".gpx"));
        if is_gpx && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    tracing::debug!(count = files.len(), dir = %dir.display(), "found GPX files");
    Ok(files)
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub file_name: String,
    pub result: Result<Value, UploadError>,
}

/// One outcome per file, in upload order.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Upload `files` in order, calling `on_outcome` after each attempt.
pub fn upload_all<U, F>(uploader: &U, files: &[PathBuf], mut on_outcome: F) -> UploadReport
where
    U: GpxUploader + ?Sized,
    F: FnMut(&UploadOutcome),
{
    let mut report = UploadReport::default();
    for path in files {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let result = uploader.upload(path);
        match &result {
            Ok(_) => tracing::info!(file = %file_name, "uploaded"),
            Err(error) => tracing::warn!(file = %file_name, %error, "upload failed"),
        }
        let outcome = UploadOutcome { file_name, result };
        on_outcome(&outcome);
        report.outcomes.push(outcome);
    }
    report
}

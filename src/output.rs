//! Output layout: one run directory, one subdirectory per bike, one file per ride.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::timezone::{run_stamp, TimeZone};

/// `007_ride.gpx`
pub fn ride_file_name(ride_id: i64) -> String {
    format!("{ride_id:03}_ride.gpx")
}

/// Spaces and path separators become underscores.
pub fn dir_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

/// Like [`dir_name`], with every non-ASCII character replaced as well.
pub fn ascii_dir_name(name: &str) -> String {
    dir_name(
        &name
            .chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect::<String>(),
    )
}

/// A run directory named `<prefix><timestamp>` and the bike directories in it.
#[derive(Debug)]
pub struct OutputTree {
    root: PathBuf,
    bikes: HashSet<String>,
}

impl OutputTree {
    /// Create a fresh run directory under `parent`. Fails if it already exists.
    pub fn create(parent: &Path, prefix: &str, timezone: TimeZone) -> Result<Self, ConvertError> {
        let root = parent.join(format!("{prefix}{}", run_stamp(timezone.now()?)?));
        fs::create_dir(&root).map_err(|source| ConvertError::Output {
            path: root.clone(),
            source,
        })?;
        tracing::info!(path = %root.display(), "created output directory");
        Ok(Self {
            root,
            bikes: HashSet::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a bike directory, created on first use.
    pub fn bike_dir(&mut self, name: &str) -> Result<PathBuf, ConvertError> {
        let path = self.root.join(name);
        if self.bikes.insert(name.to_string()) && !path.is_dir() {
            fs::create_dir(&path).map_err(|source| ConvertError::Output {
                path: path.clone(),
                source,
            })?;
        }
        Ok(path)
    }

    pub fn write_ride(
        &mut self,
        bike: &str,
        ride_id: i64,
        contents: &[u8],
    ) -> Result<PathBuf, ConvertError> {
        let path = self.bike_dir(bike)?.join(ride_file_name(ride_id));
        fs::write(&path, contents).map_err(|source| ConvertError::Output {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::UtcOffset;

    #[test]
    fn ride_files_are_zero_padded() {
        assert_eq!(ride_file_name(7), "007_ride.gpx");
        assert_eq!(ride_file_name(42), "042_ride.gpx");
        assert_eq!(ride_file_name(1234), "1234_ride.gpx");
    }

    #[test]
    fn names_are_sanitized() {
        assert_eq!(dir_name("My Road Bike"), "My_Road_Bike");
        assert_eq!(dir_name("Vélo 2"), "Vélo_2");
        assert_eq!(dir_name("a/b"), "a_b");
        assert_eq!(ascii_dir_name("Vélo 🚲"), "V_lo__");
    }

    #[test]
    fn writes_rides_under_bike_dirs() {
        let parent = tempfile::tempdir().unwrap();
        let mut tree =
            OutputTree::create(parent.path(), "rides_gpx_", TimeZone::Fixed(UtcOffset::UTC))
                .unwrap();

        let name = tree.root().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("rides_gpx_"));
        assert_eq!(name.len(), "rides_gpx_".len() + "2023_09_15T22_08_06".len());

        let first = tree.write_ride("Road", 1, b"one").unwrap();
        let second = tree.write_ride("Road", 2, b"two").unwrap();
        assert_eq!(first, tree.root().join("Road").join("001_ride.gpx"));
        assert_eq!(fs::read(&second).unwrap(), b"two");
    }
}

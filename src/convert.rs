//! Batch conversion of a tracker database into a tree of GPX files.
//!
//! A run is all-or-nothing: the first database, parse or output error
//! aborts it. Rides without points are skipped.

use std::path::PathBuf;

use crate::error::ConvertError;
use crate::extract::{self, supercycle, zeopoxa, TrackPoint};
use crate::output::{dir_name, OutputTree};
use crate::timezone::{self, TimeZone};
use crate::track;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Tracker database to read.
    pub database: PathBuf,
    /// Directory in which the run directory is created.
    pub output_root: PathBuf,
    pub timezone: TimeZone,
}

/// What a run produced.
#[derive(Debug)]
pub struct ConversionReport {
    pub run_dir: PathBuf,
    pub written: Vec<PathBuf>,
    /// Ids of rides that had no points.
    pub skipped: Vec<i64>,
}

struct RideWriter {
    output: OutputTree,
    creator: &'static str,
    written: Vec<PathBuf>,
    skipped: Vec<i64>,
}

impl RideWriter {
    fn new(output: OutputTree, creator: &'static str) -> Self {
        Self {
            output,
            creator,
            written: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn write(
        &mut self,
        bike: &str,
        ride_id: i64,
        points: &[TrackPoint],
    ) -> Result<(), ConvertError> {
        let Some(document) = track::ride_document(self.creator, points) else {
            tracing::debug!(ride_id, bike, "ride has no points, skipping");
            self.skipped.push(ride_id);
            return Ok(());
        };
        let path = self
            .output
            .write_ride(bike, ride_id, &track::to_bytes(&document)?)?;
        let start = timezone::gpx_timestamp(points[0].time)?;
        tracing::info!(
            ride_id,
            points = points.len(),
            start = %start,
            path = %path.display(),
            "wrote ride"
        );
        self.written.push(path);
        Ok(())
    }

    fn finish(self) -> ConversionReport {
        ConversionReport {
            run_dir: self.output.root().to_path_buf(),
            written: self.written,
            skipped: self.skipped,
        }
    }
}

/// Convert a SuperCycle backup into `rides_gpx_<timestamp>/<id>_<bike>/<ride>_ride.gpx`.
pub fn supercycle(options: &ConvertOptions) -> Result<ConversionReport, ConvertError> {
    let sqlite = extract::open_database(&options.database)?;
    let mut reader = supercycle::SuperCycleReader::new(&sqlite)?;
    let bikes = reader.bikes()?;
    tracing::debug!(bikes = bikes.len(), "read bikes");

    let output = OutputTree::create(
        &options.output_root,
        supercycle::OUTPUT_PREFIX,
        options.timezone,
    )?;
    let mut writer = RideWriter::new(output, supercycle::CREATOR);

    for bike in bikes {
        let bike_dir = bike.dir_name();
        writer.output.bike_dir(&bike_dir)?;
        for ride_id in reader.ride_ids(bike.id)? {
            let points = reader.ride_points(ride_id, options.timezone)?;
            writer.write(&bike_dir, ride_id, &points)?;
        }
    }

    Ok(writer.finish())
}

/// Convert a Zeopoxa database into `rides_zeopoxa_gpx_<timestamp>/<bike>/<ride>_ride.gpx`.
pub fn zeopoxa(options: &ConvertOptions) -> Result<ConversionReport, ConvertError> {
    let sqlite = extract::open_database(&options.database)?;
    let mut reader = zeopoxa::ZeopoxaReader::new(&sqlite)?;

    let output = OutputTree::create(
        &options.output_root,
        zeopoxa::OUTPUT_PREFIX,
        options.timezone,
    )?;
    let mut writer = RideWriter::new(output, zeopoxa::CREATOR);

    reader.for_each_ride(|ride, bike| {
        let bike_dir = dir_name(&bike);
        writer.output.bike_dir(&bike_dir)?;
        let points = ride.points(options.timezone)?;
        writer.write(&bike_dir, ride.id, &points)
    })?;

    Ok(writer.finish())
}

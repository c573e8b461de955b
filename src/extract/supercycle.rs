//! SuperCycle backups.
//!
//! Relevant tables:
//! - `bike(id, name)`
//! - `ride(id, bikeId)`
//! - `ride_detail(rideId, lat, lon, timestamp)`, one row per second, with
//!   `timestamp` in Unix milliseconds.

use rusqlite::{Connection, Statement};

use super::TrackPoint;
use crate::error::ConvertError;
use crate::output::ascii_dir_name;
use crate::timezone::TimeZone;

pub const CREATOR: &str = "SuperCycle2GPX";
pub const OUTPUT_PREFIX: &str = "rides_gpx_";

#[derive(Debug, Clone, PartialEq)]
pub struct Bike {
    pub id: i64,
    pub name: String,
}

impl Bike {
    /// `007_Road_Bike`
    pub fn dir_name(&self) -> String {
        format!("{:03}_{}", self.id, ascii_dir_name(&self.name))
    }
}

#[derive(Debug)]
struct PointRow {
    lat: f64,
    lon: f64,
    timestamp: f64,
}

/// Prepared queries over one SuperCycle database.
///
/// Preparing every statement up front rejects a database without the
/// expected tables before any output is created.
pub struct SuperCycleReader<'conn> {
    bikes: Statement<'conn>,
    rides: Statement<'conn>,
    points: Statement<'conn>,
}

impl<'conn> SuperCycleReader<'conn> {
    pub fn new(sqlite: &'conn Connection) -> Result<Self, ConvertError> {
        Ok(Self {
            bikes: sqlite.prepare("SELECT id, name FROM bike ORDER BY id")?,
            rides: sqlite.prepare("SELECT id FROM ride WHERE bikeId = ?1 ORDER BY id")?,
            points: sqlite.prepare(
                "
                SELECT
                    lat,
                    lon,
                    timestamp
                FROM ride_detail
                WHERE rideId = ?1
                ORDER BY rowid",
            )?,
        })
    }

    pub fn bikes(&mut self) -> Result<Vec<Bike>, ConvertError> {
        let bikes = self
            .bikes
            .query_map([], |row| {
                Ok(Bike {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<Bike>>>()?;
        Ok(bikes)
    }

    pub fn ride_ids(&mut self, bike_id: i64) -> Result<Vec<i64>, ConvertError> {
        let ids = self
            .rides
            .query_map([bike_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Points of one ride in recording order.
    pub fn ride_points(
        &mut self,
        ride_id: i64,
        timezone: TimeZone,
    ) -> Result<Vec<TrackPoint>, ConvertError> {
        let rows = self
            .points
            .query_map([ride_id], |row| {
                Ok(PointRow {
                    lat: row.get(0)?,
                    lon: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<PointRow>>>()?;

        rows.into_iter()
            .map(|row| -> Result<TrackPoint, ConvertError> {
                Ok(TrackPoint {
                    lat: row.lat,
                    lon: row.lon,
                    time: timezone.wall_clock_from_millis(row.timestamp)?,
                })
            })
            .collect()
    }
}

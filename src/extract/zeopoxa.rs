//! Zeopoxa Cycling databases.
//!
//! Relevant tables:
//! - `main_table(ID, YEAR, MONTH, DAY, START_TIME, LATLON_ARRAY, BICYCLE_ID)`
//! - `bicycle_table(ID, BICYCLE_NAME)`
//!
//! Rides may reference a `BICYCLE_ID` that is missing from `bicycle_table`.
//! Points carry no timestamps; they are sampled once per second from the
//! ride start.

use rusqlite::{types::Value as SqlValue, Connection, OptionalExtension, Row, Statement};
use serde::Deserialize;
use time::{macros::format_description, Date, Month, PrimitiveDateTime, Time};

use super::{literal, TrackPoint};
use crate::error::ConvertError;
use crate::timezone::TimeZone;

pub const CREATOR: &str = "Zeopoxa2GPX";
pub const OUTPUT_PREFIX: &str = "rides_zeopoxa_gpx_";

#[derive(Debug, Clone)]
pub struct RideRow {
    pub id: i64,
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub start_time: String,
    pub latlon_array: Option<String>,
    pub bicycle_id: SqlValue,
}

#[derive(Debug, Deserialize)]
struct PointRecord {
    latitude: f64,
    longitude: f64,
}

impl RideRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            year: row.get(1)?,
            month: row.get(2)?,
            day: row.get(3)?,
            start_time: row.get(4)?,
            latlon_array: row.get(5)?,
            bicycle_id: row.get(6)?,
        })
    }

    fn invalid(&self, reason: impl Into<String>) -> ConvertError {
        ConvertError::Parse {
            ride_id: self.id,
            reason: reason.into(),
        }
    }

    /// Local wall-clock start assembled from `YEAR`, `MONTH`, `DAY` and `START_TIME`.
    pub fn start(&self) -> Result<PrimitiveDateTime, ConvertError> {
        let year = i32::try_from(self.year).map_err(|_| self.invalid("year out of range"))?;
        let month = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| self.invalid(format!("invalid month {}", self.month)))?;
        let day = u8::try_from(self.day).map_err(|_| self.invalid("day out of range"))?;
        let date = Date::from_calendar_date(year, month, day)
            .map_err(|e| self.invalid(format!("invalid date: {e}")))?;
        let time = parse_start_time(&self.start_time).ok_or_else(|| {
            self.invalid(format!("invalid START_TIME '{}'", self.start_time))
        })?;
        Ok(PrimitiveDateTime::new(date, time))
    }

    /// Points of the ride, one second apart from the start.
    ///
    /// An absent or blank array yields no points.
    pub fn points(&self, timezone: TimeZone) -> Result<Vec<TrackPoint>, ConvertError> {
        let text = match self.latlon_array.as_deref().map(str::trim) {
            None | Some("") => return Ok(Vec::new()),
            Some(text) => text,
        };
        let value = literal::parse(text).map_err(|e| self.invalid(e.to_string()))?;
        let records: Vec<PointRecord> = serde_json::from_value(value)
            .map_err(|e| self.invalid(format!("unexpected point record: {e}")))?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let start = timezone.instant_of(self.start()?)?;
        records
            .into_iter()
            .zip(0..)
            .map(|(record, second)| -> Result<TrackPoint, ConvertError> {
                Ok(TrackPoint {
                    lat: record.latitude,
                    lon: record.longitude,
                    time: timezone.offset_by(start, second)?,
                })
            })
            .collect()
    }
}

/// `hh:mm` (seconds taken as zero) or `hh:mm:ss`.
fn parse_start_time(value: &str) -> Option<Time> {
    let value = value.trim();
    Time::parse(
        value,
        format_description!("[hour padding:none]:[minute padding:none]:[second padding:none]"),
    )
    .or_else(|_| {
        Time::parse(
            value,
            format_description!("[hour padding:none]:[minute padding:none]"),
        )
    })
    .ok()
}

/// Directory label for a bike id that has no row in `bicycle_table`.
fn placeholder_name(bicycle_id: &SqlValue) -> String {
    let id = match bicycle_id {
        SqlValue::Null => "None".to_string(),
        SqlValue::Integer(id) => id.to_string(),
        SqlValue::Real(id) => id.to_string(),
        SqlValue::Text(id) => id.clone(),
        SqlValue::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    };
    format!("bike_{id}")
}

fn resolve_bike_name(
    bike_names: &mut Statement<'_>,
    bicycle_id: &SqlValue,
) -> Result<String, ConvertError> {
    let name: Option<String> = bike_names
        .query_row([bicycle_id], |row| row.get(0))
        .optional()?;
    Ok(name.unwrap_or_else(|| {
        tracing::debug!(?bicycle_id, "bike not found, using placeholder name");
        placeholder_name(bicycle_id)
    }))
}

/// Prepared queries over one Zeopoxa database.
pub struct ZeopoxaReader<'conn> {
    rides: Statement<'conn>,
    bike_names: Statement<'conn>,
}

impl<'conn> ZeopoxaReader<'conn> {
    pub fn new(sqlite: &'conn Connection) -> Result<Self, ConvertError> {
        Ok(Self {
            rides: sqlite.prepare(
                "
                SELECT
                    ID,
                    YEAR,
                    MONTH,
                    DAY,
                    START_TIME,
                    LATLON_ARRAY,
                    BICYCLE_ID
                FROM main_table",
            )?,
            bike_names: sqlite.prepare("SELECT BICYCLE_NAME FROM bicycle_table WHERE ID = ?1")?,
        })
    }

    /// Bike name for a ride, or `bike_<id>` when the bike is unknown.
    pub fn bike_name(&mut self, bicycle_id: &SqlValue) -> Result<String, ConvertError> {
        resolve_bike_name(&mut self.bike_names, bicycle_id)
    }

    /// Visit every ride with its resolved bike name, in table order.
    pub fn for_each_ride<F>(&mut self, mut visit: F) -> Result<(), ConvertError>
    where
        F: FnMut(RideRow, String) -> Result<(), ConvertError>,
    {
        let mut rows = self.rides.query([])?;
        while let Some(row) = rows.next()? {
            let ride = RideRow::from_row(row)?;
            let bike = resolve_bike_name(&mut self.bike_names, &ride.bicycle_id)?;
            visit(ride, bike)?;
        }
        Ok(())
    }
}

//! Wall-clock conversions for the zone the trackers recorded in.
//!
//! Both trackers store local times. GPX output keeps the local wall-clock
//! value but renders it with a literal `Z` suffix, which is what the
//! apps importing these files have always received.

use time::{macros::format_description, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::ConvertError;

/// Zone used to turn instants into wall-clock times and back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeZone {
    /// System zone, resolved per instant so DST transitions are honoured.
    #[default]
    Local,
    /// A fixed offset, used for reproducible output.
    Fixed(UtcOffset),
}

impl TimeZone {
    pub fn from_offset(offset: Option<UtcOffset>) -> Self {
        offset.map_or(TimeZone::Local, TimeZone::Fixed)
    }

    fn offset_at(&self, instant: OffsetDateTime) -> Result<UtcOffset, ConvertError> {
        match self {
            TimeZone::Local => Ok(UtcOffset::local_offset_at(instant)?),
            TimeZone::Fixed(offset) => Ok(*offset),
        }
    }

    /// Wall-clock time of `instant` in this zone.
    pub fn wall_clock(&self, instant: OffsetDateTime) -> Result<PrimitiveDateTime, ConvertError> {
        let offset = self.offset_at(instant)?;
        let utc = instant.to_offset(UtcOffset::UTC);
        PrimitiveDateTime::new(utc.date(), utc.time())
            .checked_add(Duration::seconds(offset.whole_seconds().into()))
            .ok_or(ConvertError::OutOfRange)
    }

    /// Instant at which this zone shows `wall`.
    pub fn instant_of(&self, wall: PrimitiveDateTime) -> Result<OffsetDateTime, ConvertError> {
        let guess = self.offset_at(wall.assume_utc())?;
        let offset = self.offset_at(wall.assume_offset(guess))?;
        Ok(wall.assume_offset(offset))
    }

    /// Wall-clock time of a Unix timestamp in milliseconds, truncated to whole seconds.
    pub fn wall_clock_from_millis(&self, millis: f64) -> Result<PrimitiveDateTime, ConvertError> {
        let seconds = (millis / 1000.0).floor() as i64;
        self.wall_clock(OffsetDateTime::from_unix_timestamp(seconds)?)
    }

    /// Wall-clock time `seconds` after the instant shown as `start`.
    pub fn offset_by(
        &self,
        start: OffsetDateTime,
        seconds: i64,
    ) -> Result<PrimitiveDateTime, ConvertError> {
        self.wall_clock(start + Duration::seconds(seconds))
    }

    pub fn now(&self) -> Result<PrimitiveDateTime, ConvertError> {
        self.wall_clock(OffsetDateTime::now_utc())
    }
}

/// `2023-09-15T22:08:06Z`
pub fn gpx_timestamp(wall: PrimitiveDateTime) -> Result<String, ConvertError> {
    Ok(wall.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
    ))?)
}

/// `2023_09_15T22_08_06`, used in run directory names.
pub fn run_stamp(wall: PrimitiveDateTime) -> Result<String, ConvertError> {
    Ok(wall.format(format_description!(
        "[year]_[month]_[day]T[hour]_[minute]_[second]"
    ))?)
}

/// Parses `+02:00`, `-05:30` or `Z`.
pub fn parse_utc_offset(value: &str) -> Result<UtcOffset, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        value,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map_err(|e| format!("expected an offset like +02:00: {e}"))
}

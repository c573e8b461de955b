//! GPX 1.1 documents for a single ride.

use geo_types::Point;
use gpx::{Gpx, GpxVersion, Metadata, Time, Track, TrackSegment, Waypoint};
use time::format_description::well_known::Iso8601;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::ConvertError;
use crate::extract::TrackPoint;
use crate::timezone::gpx_timestamp;

pub const TRACK_NAME: &str = "WOW!";
pub const TRACK_TYPE: &str = "cycling";

const SCHEMA_ATTRIBUTES: &str = "xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
    xsi:schemaLocation=\"http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd\" ";

/// Wall-clock times are stored as if they were UTC, giving the `Z` suffix.
fn gpx_time(point: &TrackPoint) -> Time {
    Time::from(point.time.assume_utc())
}

/// One track with one segment holding every point in order.
///
/// Returns `None` for a ride without points, which has no metadata time.
pub fn ride_document(creator: &str, points: &[TrackPoint]) -> Option<Gpx> {
    let first = points.first()?;

    let mut segment = TrackSegment::new();
    for track_point in points {
        let mut point = Waypoint::new(Point::new(track_point.lon, track_point.lat));
        point.time = Some(gpx_time(track_point));
        segment.points.push(point);
    }

    let mut track = Track::new();
    track.name = Some(TRACK_NAME.to_string());
    track.type_ = Some(TRACK_TYPE.to_string());
    track.segments.push(segment);

    let mut gpx = Gpx::default();
    gpx.version = GpxVersion::Gpx11;
    gpx.creator = Some(creator.to_string());
    gpx.metadata = Some(Metadata {
        time: Some(gpx_time(first)),
        ..Metadata::default()
    });
    gpx.tracks.push(track);
    Some(gpx)
}

/// Pretty-printed UTF-8 XML, with the schema location on the root element.
///
/// The gpx writer renders times with nanoseconds and coordinates in Rust's
/// float notation; both are rewritten to the `2023-09-15T22:08:06Z` and
/// `45.0` forms tracker exports have always used.
pub fn to_bytes(gpx: &Gpx) -> Result<Vec<u8>, ConvertError> {
    let mut xml = Vec::new();
    gpx::write(gpx, &mut xml)?;
    let xml = String::from_utf8_lossy(&xml);
    let xml = rewrite_between(&xml, "<time>", "</time>", literal_time)?;
    let xml = rewrite_between(&xml, " lat=\"", "\"", coordinate)?;
    let xml = rewrite_between(&xml, " lon=\"", "\"", coordinate)?;
    Ok(with_schema_location(xml).into_bytes())
}

/// Replace every text found between `open` and the next `close`.
fn rewrite_between<F>(xml: &str, open: &str, close: &str, render: F) -> Result<String, ConvertError>
where
    F: Fn(&str) -> Result<String, ConvertError>,
{
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    while let Some(at) = rest.find(open) {
        let (head, tail) = rest.split_at(at + open.len());
        out.push_str(head);
        let Some(end) = tail.find(close) else {
            rest = tail;
            break;
        };
        out.push_str(&render(tail[..end].trim())?);
        rest = &tail[end..];
    }
    out.push_str(rest);
    Ok(out)
}

fn literal_time(value: &str) -> Result<String, ConvertError> {
    let stamp = OffsetDateTime::parse(value, &Iso8601::DEFAULT)?;
    gpx_timestamp(PrimitiveDateTime::new(stamp.date(), stamp.time()))
}

fn coordinate(value: &str) -> Result<String, ConvertError> {
    Ok(value
        .parse::<f64>()
        .map(format_coordinate)
        .unwrap_or_else(|_| value.to_string()))
}

/// Shortest round-trip form, keeping `.0` on whole numbers.
pub fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn with_schema_location(xml: String) -> String {
    if xml.contains("xsi:schemaLocation") {
        return xml;
    }
    xml.replacen("<gpx ", &format!("<gpx {SCHEMA_ATTRIBUTES}"), 1)
}

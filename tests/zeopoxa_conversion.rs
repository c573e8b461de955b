mod common;

use std::fs;

use ride_gpx_tools::convert;
use ride_gpx_tools::error::ConvertError;

#[test]
fn rides_are_written_per_bike_with_placeholder_names() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("2023-10-16-10-54-49_Database_Zeopoxa_Cycling.db");
    common::zeopoxa_db(&db);

    let report = convert::zeopoxa(&common::options(&db, dir.path())).unwrap();

    let run_name = report.run_dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(run_name.starts_with("rides_zeopoxa_gpx_"));
    assert_eq!(
        common::names_in(&report.run_dir),
        vec!["Gravel_Bike", "bike_7"]
    );
    // Ride 6 has an empty point list.
    assert_eq!(
        common::names_in(&report.run_dir.join("Gravel_Bike")),
        vec!["005_ride.gpx"]
    );
    assert_eq!(
        common::names_in(&report.run_dir.join("bike_7")),
        vec!["007_ride.gpx"]
    );
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.skipped, vec![6]);
}

#[test]
fn point_times_count_seconds_from_ride_start() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("zeopoxa.db");
    common::zeopoxa_db(&db);

    let report = convert::zeopoxa(&common::options(&db, dir.path())).unwrap();
    let xml = fs::read_to_string(report.run_dir.join("Gravel_Bike").join("005_ride.gpx")).unwrap();

    assert!(xml.contains("creator=\"Zeopoxa2GPX\""));
    assert_eq!(
        common::track_times(&xml),
        vec!["2023-10-01T07:30:00Z", "2023-10-01T07:30:01Z"]
    );

    let gpx = gpx::read(xml.as_bytes()).unwrap();
    let coords: Vec<(f64, f64)> = gpx.tracks[0].segments[0]
        .points
        .iter()
        .map(|p| (p.point().y(), p.point().x()))
        .collect();
    assert_eq!(coords, vec![(45.1, -73.1), (45.2, -73.2)]);
}

#[test]
fn malformed_point_array_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("zeopoxa.db");
    common::zeopoxa_db(&db);
    {
        let sqlite = rusqlite::Connection::open(&db).unwrap();
        sqlite
            .execute(
                "UPDATE main_table SET LATLON_ARRAY = ?1 WHERE ID = 7",
                ["__import__('os').system('echo pwned')"],
            )
            .unwrap();
    }

    let err = convert::zeopoxa(&common::options(&db, dir.path())).unwrap_err();
    assert!(matches!(err, ConvertError::Parse { ride_id: 7, .. }));
}

#[test]
fn missing_database_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let err = convert::zeopoxa(&common::options(&dir.path().join("none.db"), dir.path()))
        .unwrap_err();
    assert!(matches!(err, ConvertError::NotFound(_)));
    assert!(common::entries(dir.path()).is_empty());
}

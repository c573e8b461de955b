mod common;

use std::fs;

use ride_gpx_tools::convert;
use ride_gpx_tools::error::ConvertError;

#[test]
fn writes_one_file_per_ride_under_bike_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("SuperCycle-20230904-1159.scbak");
    common::supercycle_db(&db);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let report = convert::supercycle(&common::options(&db, &out)).unwrap();

    let run_name = report.run_dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(run_name.starts_with("rides_gpx_"));
    assert_eq!(common::entries(&out), vec![report.run_dir.clone()]);

    assert_eq!(
        common::names_in(&report.run_dir),
        vec!["001_Road_Bike", "002_V_lo_Cargo", "003_Spare"]
    );
    // Ride 4 has no points.
    assert_eq!(
        common::names_in(&report.run_dir.join("001_Road_Bike")),
        vec!["001_ride.gpx", "002_ride.gpx"]
    );
    assert_eq!(
        common::names_in(&report.run_dir.join("002_V_lo_Cargo")),
        vec!["003_ride.gpx"]
    );
    assert!(common::names_in(&report.run_dir.join("003_Spare")).is_empty());
    assert_eq!(report.written.len(), 3);
    assert_eq!(report.skipped, vec![4]);
}

#[test]
fn ride_points_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sc.db");
    common::supercycle_db(&db);

    let report = convert::supercycle(&common::options(&db, dir.path())).unwrap();
    let path = report.run_dir.join("001_Road_Bike").join("001_ride.gpx");
    let xml = fs::read_to_string(&path).unwrap();

    assert!(xml.contains("creator=\"SuperCycle2GPX\""));
    assert!(xml.contains("<name>WOW!</name>"));
    assert!(xml.contains("<type>cycling</type>"));
    assert_eq!(xml.matches("<trkpt ").count(), 3);
    assert_eq!(xml.matches("<time>2023-09-16T02:08:06Z</time>").count(), 2);

    let gpx = gpx::read(xml.as_bytes()).unwrap();
    assert_eq!(gpx.tracks.len(), 1);
    assert_eq!(gpx.tracks[0].segments.len(), 1);
    let coords: Vec<(f64, f64)> = gpx.tracks[0].segments[0]
        .points
        .iter()
        .map(|p| (p.point().y(), p.point().x()))
        .collect();
    assert_eq!(
        coords,
        vec![(45.5017, -73.5673), (45.50171, -73.56728), (45.50175, -73.5672)]
    );
    assert_eq!(
        common::track_times(&xml),
        vec![
            "2023-09-16T02:08:06Z",
            "2023-09-16T02:08:07Z",
            "2023-09-16T02:08:08Z",
        ]
    );
}

#[test]
fn missing_database_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let err = convert::supercycle(&common::options(&dir.path().join("missing.scbak"), dir.path()))
        .unwrap_err();
    assert!(matches!(err, ConvertError::NotFound(_)));
    assert!(common::entries(dir.path()).is_empty());
}

#[test]
fn wrong_schema_fails_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("zeopoxa.db");
    common::zeopoxa_db(&db);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let err = convert::supercycle(&common::options(&db, &out)).unwrap_err();
    assert!(matches!(err, ConvertError::Schema(_)));
    assert!(common::entries(&out).is_empty());
}

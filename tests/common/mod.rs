use std::fs;
use std::path::{Path, PathBuf};

use ride_gpx_tools::convert::ConvertOptions;
use ride_gpx_tools::timezone::TimeZone;
use rusqlite::Connection;
use time::UtcOffset;

/// Create a SuperCycle-shaped database at `path`.
#[allow(dead_code)]
pub fn supercycle_db(path: &Path) {
    let sqlite = Connection::open(path).expect("Failed to create SuperCycle fixture");
    sqlite
        .execute_batch(
            "
            CREATE TABLE bike (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
            CREATE TABLE ride (id INTEGER PRIMARY KEY, bikeId INTEGER NOT NULL);
            CREATE TABLE ride_detail (
                id INTEGER PRIMARY KEY,
                rideId INTEGER NOT NULL,
                lat REAL NOT NULL,
                lon REAL NOT NULL,
                timestamp INTEGER NOT NULL
            );

            INSERT INTO bike (id, name) VALUES (1, 'Road Bike'), (2, 'Vélo Cargo'), (3, 'Spare');
            INSERT INTO ride (id, bikeId) VALUES (1, 1), (2, 1), (3, 2), (4, 1);

            -- 2023-09-16T02:08:06Z onwards
            INSERT INTO ride_detail (rideId, lat, lon, timestamp) VALUES
                (1, 45.5017, -73.5673, 1694830086000),
                (1, 45.50171, -73.56728, 1694830087000),
                (1, 45.50175, -73.5672, 1694830088500),
                (2, 46.8139, -71.208, 1694900000000),
                (3, 43.6532, -79.3832, 1695000000000),
                (3, 43.6533, -79.3831, 1695000001000);
            ",
        )
        .expect("Failed to populate SuperCycle fixture");
}

/// Create a Zeopoxa-shaped database at `path`.
#[allow(dead_code)]
pub fn zeopoxa_db(path: &Path) {
    let sqlite = Connection::open(path).expect("Failed to create Zeopoxa fixture");
    sqlite
        .execute_batch(
            "
            CREATE TABLE main_table (
                ID INTEGER PRIMARY KEY,
                YEAR INTEGER,
                MONTH INTEGER,
                DAY INTEGER,
                START_TIME TEXT,
                LATLON_ARRAY TEXT,
                BICYCLE_ID INTEGER
            );
            CREATE TABLE bicycle_table (ID INTEGER PRIMARY KEY, BICYCLE_NAME TEXT);

            INSERT INTO bicycle_table (ID, BICYCLE_NAME) VALUES (1, 'Gravel Bike');
            INSERT INTO main_table VALUES
                (5, 2023, 10, 1, '07:30',
                 '[{''latitude'': 45.1, ''longitude'': -73.1, ''altitude'': 20.5}, {''latitude'': 45.2, ''longitude'': -73.2, ''altitude'': 21.0}]',
                 1),
                (6, 2023, 10, 2, '18:05', '[]', 1),
                (7, 2023, 10, 3, '09:00',
                 '[{''latitude'': 44.9, ''longitude'': -72.9}]',
                 7);
            ",
        )
        .expect("Failed to populate Zeopoxa fixture");
}

#[allow(dead_code)]
pub fn options(database: &Path, output_root: &Path) -> ConvertOptions {
    ConvertOptions {
        database: database.to_path_buf(),
        output_root: output_root.to_path_buf(),
        timezone: TimeZone::Fixed(UtcOffset::UTC),
    }
}

/// Sorted file names inside `dir`.
#[allow(dead_code)]
pub fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to list directory")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Entries directly inside `dir`.
#[allow(dead_code)]
pub fn entries(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .expect("Failed to list directory")
        .map(|entry| entry.unwrap().path())
        .collect()
}

/// `<time>` values inside the track segment, in document order.
#[allow(dead_code)]
pub fn track_times(xml: &str) -> Vec<String> {
    let segment = xml.split_once("<trkseg>").map_or("", |(_, rest)| rest);
    segment
        .split("<time>")
        .skip(1)
        .filter_map(|chunk| chunk.split_once("</time>"))
        .map(|(time, _)| time.trim().to_string())
        .collect()
}

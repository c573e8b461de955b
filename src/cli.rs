use std::path::PathBuf;

use clap::{Args, Parser};
use time::UtcOffset;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::convert::ConvertOptions;
use crate::timezone::{parse_utc_offset, TimeZone};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Tracker database file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Directory in which the timestamped output directory is created
    #[arg(short, long, default_value = ".")]
    pub output_root: PathBuf,

    /// Interpret stored times at this offset (e.g. -04:00) instead of the system zone
    #[arg(short, long, value_parser = parse_utc_offset, allow_hyphen_values = true)]
    pub utc_offset: Option<UtcOffset>,
}

impl ConvertArgs {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            database: self.file.clone(),
            output_root: self.output_root.clone(),
            timezone: TimeZone::from_offset(self.utc_offset),
        }
    }
}

/// Convert SuperCycle rides to GPX files
#[derive(Parser, Debug)]
#[command(version)]
pub struct SuperCycleCli {
    #[command(flatten)]
    pub convert: ConvertArgs,
}

/// Convert Zeopoxa Cycling rides to GPX files
#[derive(Parser, Debug)]
#[command(version)]
pub struct ZeopoxaCli {
    #[command(flatten)]
    pub convert: ConvertArgs,
}

/// Upload GPX files to Strava
#[derive(Parser, Debug)]
#[command(version)]
pub struct UploadCli {
    /// Directory with GPX files
    #[arg(short, long)]
    pub dir: PathBuf,

    /// JSON file with client_id and client_secret
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Timeout for each request to Strava, in seconds
    #[arg(short, long, default_value_t = 30)]
    pub timeout_secs: u64,
}

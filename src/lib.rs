//! Convert SuperCycle and Zeopoxa ride databases to GPX, and upload GPX
//! files to Strava.

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod logging;
pub mod output;
pub mod strava;
pub mod timezone;
pub mod track;
pub mod upload;

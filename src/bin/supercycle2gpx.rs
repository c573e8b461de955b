use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ride_gpx_tools::{cli, convert, error::ConvertError, logging};

fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init();

    let args = cli::SuperCycleCli::parse();
    let report = match convert::supercycle(&args.convert.options()) {
        Err(err @ ConvertError::NotFound(_)) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        result => result.wrap_err("Failed to convert SuperCycle rides")?,
    };

    println!(
        "Wrote {} rides to {} ({} empty rides skipped)",
        report.written.len(),
        report.run_dir.display(),
        report.skipped.len()
    );
    Ok(())
}

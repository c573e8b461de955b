use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{bail, Result, WrapErr};
use ride_gpx_tools::{
    cli,
    config::ApiInfo,
    error::UploadError,
    logging,
    strava::{self, StravaClient},
    upload,
};

fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init();

    let args = cli::UploadCli::parse();
    let files = match upload::gpx_files(&args.dir) {
        Err(err @ UploadError::NotFound(_)) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        result => result?,
    };

    let api_info = ApiInfo::load(&args.config)?;
    let client = StravaClient::new(api_info, Duration::from_secs(args.timeout_secs))?;

    println!("Authenticate yourself, so you can grant the permissions");
    println!("that the app is requesting for the uploading.");
    println!("Required permission '{}'", strava::SCOPE);
    println!();
    println!("Open the link below, log in, and copy the value of 'code' from the URL:");
    println!();
    println!("{}", client.authorization_url());
    println!();
    print!("Enter the value of 'code': ");
    io::stdout().flush()?;

    let code = strava::read_authorization_code(io::stdin().lock())?;
    let session = client
        .exchange_code(&code)
        .wrap_err("Failed to obtain a Strava access token")?;

    println!();
    println!("Uploading {} files...", files.len());
    let report = upload::upload_all(&session, &files, |outcome| match &outcome.result {
        Ok(response) => println!("{}: {}", outcome.file_name, response),
        Err(error) => println!("{}: {}", outcome.file_name, error),
    });

    println!(
        "{} uploaded, {} failed",
        report.succeeded(),
        report.failed()
    );
    if report.failed() > 0 {
        bail!("{} of {} uploads failed", report.failed(), report.outcomes.len());
    }
    Ok(())
}

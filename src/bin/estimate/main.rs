//! One-shot estimate from the command line
//!
//! Usage: estimate <parameters.json> <form.json> [city]
//!
//! Exit codes: 0 estimate printed, 1 no data for the property,
//! 2 incomplete or out-of-range input.

use anyhow::{bail, Context, Result};
use rent_estimator::config::Config;
use rent_estimator::estimation::{estimate, format_range, RentForm};
use rent_estimator::params::load_parameters;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: {} <parameters.json> <form.json> [city]", args[0]);
    }

    let parameters_path = PathBuf::from(&args[1]);
    let form_path = PathBuf::from(&args[2]);
    let reference_city = match args.get(3) {
        Some(city) => city.clone(),
        None => Config::from_env()?.reference_city,
    };

    let parameters = load_parameters(&parameters_path)?;

    let form_json = fs::read_to_string(&form_path)
        .with_context(|| format!("Failed to read form {:?}", form_path))?;
    let form: RentForm = serde_json::from_str(&form_json)
        .with_context(|| format!("Invalid form JSON in {:?}", form_path))?;

    let attrs = form.to_attributes(&reference_city);
    debug!("Parsed attributes: {:?}", attrs);

    match estimate(&attrs, &parameters) {
        Ok(range) => {
            info!("Estimated {:.2}", range.estimated);
            println!("{}", format_range(&range));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", err);
            debug!("No estimate ({})", err.code());
            if err.is_missing_data() {
                Ok(ExitCode::from(1))
            } else {
                Ok(ExitCode::from(2))
            }
        }
    }
}

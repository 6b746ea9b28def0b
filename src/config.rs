//! Configuration loaded from environment variables

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::estimation::DEFAULT_CITY;

#[derive(Debug, Clone)]
pub struct Config {
    pub parameters_path: PathBuf,
    pub reference_city: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            parameters_path: env::var("PARAMETERS_PATH")
                .unwrap_or_else(|_| "data/parameters.json".to_string())
                .into(),

            reference_city: env::var("REFERENCE_CITY")
                .unwrap_or_else(|_| DEFAULT_CITY.to_string()),

            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
                .parse()
                .context("BIND_ADDR must be a valid socket address")?,
        })
    }
}

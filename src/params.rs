//! Parameter source - loads the neighborhood parameter table from JSON
//!
//! The file holds a JSON array of documents. Documents may be of several
//! kinds (the same collection can hold captured properties); only documents
//! whose `kind` is missing or `"parameter"` are loaded.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::estimation::NeighborhoodParameters;

/// Immutable snapshot shared by every caller
pub type ParameterTable = Arc<[NeighborhoodParameters]>;

const PARAMETER_KIND: &str = "parameter";

#[derive(Debug, Error)]
pub enum ParameterSourceError {
    #[error("failed to read parameter file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no neighborhood parameters found in {0:?}")]
    Empty(PathBuf),
}

/// Load the parameter table from a JSON file
pub fn load_parameters(path: &Path) -> Result<ParameterTable, ParameterSourceError> {
    info!("Loading neighborhood parameters from {:?}", path);

    let json = fs::read_to_string(path).map_err(|source| ParameterSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parameters = parse_parameters(&json)?;
    if parameters.is_empty() {
        return Err(ParameterSourceError::Empty(path.to_path_buf()));
    }

    info!("Loaded parameters for {} neighborhoods", parameters.len());

    Ok(parameters.into())
}

/// Parse a JSON array of documents, keeping the parameter documents
pub fn parse_parameters(json: &str) -> Result<Vec<NeighborhoodParameters>, serde_json::Error> {
    let documents: Vec<Value> = serde_json::from_str(json)?;

    let mut parameters = Vec::new();
    let mut parse_errors = 0;

    for (idx, document) in documents.into_iter().enumerate() {
        let kind = document.get("kind").and_then(Value::as_str);
        if kind.is_some_and(|k| k != PARAMETER_KIND) {
            debug!("Skipping document {} of kind {:?}", idx, kind);
            continue;
        }

        match serde_json::from_value::<NeighborhoodParameters>(document) {
            Ok(entry) => parameters.push(entry),
            Err(e) => {
                parse_errors += 1;
                if parse_errors <= 10 {
                    // Only log first 10 errors
                    warn!("Failed to parse parameter document {}: {}", idx, e);
                }
            }
        }
    }

    if parse_errors > 0 {
        warn!("Skipped {} malformed parameter documents", parse_errors);
    }

    Ok(parameters)
}

//! Errors for loading configuration and templates

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::rules::RuleBookError;

/// Errors from the fallible outer layers (rule books, catalogs, input files).
///
/// Resolution itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    /// Error loading a rule book
    #[error("rule book error: {0}")]
    RuleBook(#[from] RuleBookError),

    /// Error loading or querying a template catalog
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error reading a template file or stdin
    #[error("error reading {}: {source}", display_source(.path))]
    Input {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// Error encoding JSON output
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed `KEY=CATEGORY` input map argument
    #[error("invalid input map entry '{0}': expected KEY=CATEGORY")]
    InvalidMapping(String),
}

fn display_source(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!("'{}'", path.display()),
        None => "stdin".to_string(),
    }
}

impl Error {
    /// Create an input error for a file path, or stdin when `None`
    pub fn input(path: Option<PathBuf>, source: std::io::Error) -> Self {
        Self::Input { path, source }
    }
}

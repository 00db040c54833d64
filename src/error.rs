// Error types for censusview.
// Covers census API errors, table and file errors, and lookup failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CensusError {
    #[error("Census API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unknown geography: {0}")]
    UnknownGeography(String),

    #[error("Missing column in census response: {0}")]
    MissingColumn(String),

    #[error("Malformed census response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Frame error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CensusError>;

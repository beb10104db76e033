use thiserror::Error;

/// Failures that abort report generation.
///
/// Malformed model JSON and non-numeric set fields are recovered where
/// they occur (empty object / zero volume) and never reach this enum.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("image decode error: {0}")]
    Decode(String),

    #[error("model API error: {0}")]
    ModelApi(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Spreadsheet sink failures.
///
/// Returned to the caller instead of aborting: the binary shows the report
/// and downgrades these to a warning. No retries.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("spreadsheet not found: {0}")]
    SheetNotFound(String),

    #[error("sheet sync credentials not configured")]
    MissingCredentials,

    #[error("{0}")]
    Other(String),
}

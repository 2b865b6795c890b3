use thiserror::Error;

/// Everything that can refuse an import or fail a file operation.
#[derive(Debug, Error)]
pub enum OrgChartError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported org chart version: {found} (expected {expected})")]
    UnsupportedVersion { found: String, expected: u32 },

    #[error("org chart document is missing the `{0}` array")]
    MissingArray(&'static str),

    #[error("org chart document is not an object")]
    NotAnObject,

    #[error("CSV input has no header row")]
    MissingHeader,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("invalid org chart data (as JSON: {json}; as CSV: {csv})")]
    InvalidData { json: String, csv: String },

    #[error("element id `{0}` already exists in the scene")]
    DuplicateElement(String),

    #[error("invalid scene file: {0}")]
    Scene(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OrgChartError>;

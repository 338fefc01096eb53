use thiserror::Error;

#[derive(Error, Debug)]
pub enum FragForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot Parse Error: {0}")]
    Parse(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type FfResult<T> = Result<T, FragForgeError>;

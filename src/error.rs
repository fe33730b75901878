use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElevateError>;

#[derive(Error, Debug)]
pub enum ElevateError {
    #[error("{operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },
    #[error("Gateway '{0}' is not in the catalog")]
    UnknownGateway(String),
    #[error("Gateway selection is disabled")]
    SelectionDisabled,
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl ElevateError {
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        ElevateError::Remote {
            operation,
            message: message.into(),
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for ElevateError {
    fn from(e: rocksdb::Error) -> Self {
        ElevateError::InternalError(Box::new(e))
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Missing required field: {field}")]
    Validation { field: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

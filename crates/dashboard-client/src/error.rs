use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The API request returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Unknown chart view '{0}'")]
    UnknownView(String),
}

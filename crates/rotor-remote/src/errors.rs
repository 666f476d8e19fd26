use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

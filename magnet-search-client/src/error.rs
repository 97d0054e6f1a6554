use surf::StatusCode;
use thiserror::Error as ThisError;

/// Error returned by the client, wrapping the failure [`ErrorKind`].
#[derive(Debug, ThisError)]
#[error(transparent)]
pub struct Error {
    #[from]
    kind: ErrorKind,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error("couldn't reach upstream: {0}")]
    Request(surf::Error),
    #[error("bad upstream response: {0}")]
    Status(StatusCode),
    #[error("couldn't decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("upstream issued an empty session token")]
    EmptyToken,
    #[error("cache backend failure: {0}")]
    Cache(String),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl From<surf::Error> for Error {
    fn from(err: surf::Error) -> Self {
        ErrorKind::Request(err).into()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("permission denied ({status}): {message}")]
    Permission { status: u16, message: String },
    #[error("network failure: {0}")]
    Network(String),
    #[error("unable to (de)serialize row: {0}")]
    Serialization(String),
}

impl Error {
    /// Classifies a non-success HTTP status returned by the store
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Error::Permission { status, message },
            _ => Error::Rejected { status, message },
        }
    }
}

// Froms
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

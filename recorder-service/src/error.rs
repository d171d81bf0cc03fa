use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{1}")]
    Server(StatusCode, String),
    // Froms
    #[error(transparent)]
    Recorder(#[from] recorder::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let msg = self.to_string();
        let status: StatusCode = self.into();

        (status, msg).into_response()
    }
}

impl From<Error> for StatusCode {
    fn from(error: Error) -> Self {
        match error {
            Error::Server(c, _) => c,
            Error::Recorder(e) => match e {
                recorder::Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
                recorder::Error::Permission { .. } => StatusCode::FORBIDDEN,
                recorder::Error::Rejected { .. } => StatusCode::BAD_GATEWAY,
                recorder::Error::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
                recorder::Error::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

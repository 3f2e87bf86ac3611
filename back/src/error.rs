use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dew_api::v1::{ErrorBody, ErrorKind};
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("todo {0} not found")]
    NotFound(i64),

    /// The body is JSON but does not have the shape of the request type.
    #[error("{0}")]
    InvalidInput(String),

    /// The body is not JSON at all.
    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::InvalidInput(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::BadRequest(_) => ErrorKind::BadRequest,
            Error::Database(_) => ErrorKind::Database,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidInput(_) | Error::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => Error::InvalidInput(err.body_text()),
            other => Error::BadRequest(other.body_text()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::Database(ref err) = self {
            tracing::error!("database error: {:?}", err);
        }

        let body = ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

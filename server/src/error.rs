//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::{Error, ErrorKind};

/// Wrapper converting core errors into HTTP responses.
///
/// The body is the error's wire form; the status comes from the fixed
/// taxonomy mapping and never strays outside it.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::BadParam | ErrorKind::BadQuery | ErrorKind::BadRequest => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::BadTable
            | ErrorKind::BadIndex
            | ErrorKind::BadDatabase
            | ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MissingDriver => StatusCode::NOT_IMPLEMENTED,
            ErrorKind::Multiple => StatusCode::MULTIPLE_CHOICES,
            ErrorKind::Generic => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.0)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

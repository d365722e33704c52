use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Error talking to the backend API")]
    Backend(#[from] BackendError),
    #[error("{0}")]
    InvalidInput(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
        }

        let (status, message) = match self {
            Self::Backend(BackendError::InvalidPath(path)) => {
                tracing::warn!("Rejected backend path: {}", path);
                (StatusCode::BAD_REQUEST, "Invalid request path".to_owned())
            }
            Self::Backend(BackendError::HttpError(e)) => {
                tracing::error!("{}", e);
                let status = if e.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (status, "Please try again later".to_owned())
            }
            Self::Backend(BackendError::ParseError(e)) => {
                tracing::error!("{}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Please try again later".to_owned())
            }
            Self::InvalidInput(message) => {
                tracing::warn!("{}", message);
                (StatusCode::BAD_REQUEST, message)
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_a_bad_request() {
        let response = WebError::InvalidInput("days must be between 1 and 14".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn escaping_path_is_a_bad_request() {
        let response = WebError::from(BackendError::InvalidPath("../x".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

use crate::geojson::UploadShapeError;
use crate::store::StoreError;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};

const INTERNAL_ERROR: &str = "Internal Server Error";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub success: bool,
    #[serde(serialize_with = "serialize_status")]
    pub status_code: StatusCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    UploadShape(#[from] UploadShapeError),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => {
                ErrorMessage::from((StatusCode::BAD_REQUEST, msg)).into_response()
            }
            ApiError::UploadShape(e) => {
                ErrorMessage::from((StatusCode::BAD_REQUEST, e.to_string())).into_response()
            }
            // same body whichever field was wrong
            ApiError::InvalidCredentials => ErrorMessage::from((
                StatusCode::UNAUTHORIZED,
                "Invalid username or password",
            ))
            .into_response(),
            ApiError::NotFound(what) => {
                ErrorMessage::from((StatusCode::NOT_FOUND, format!("{what} not found")))
                    .into_response()
            }
            ApiError::Store(StoreError::Duplicate { collection, key }) => {
                info!(collection, key = %key, "duplicate key");
                let message = match collection {
                    "officers" => "Username is already registered",
                    _ => "Record already exists",
                };
                ErrorMessage::from((StatusCode::CONFLICT, message)).into_response()
            }
            ApiError::Store(StoreError::Sql(e)) => {
                warn!(error = ?e, "sql error");
                ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR))
                    .into_response()
            }
            ApiError::Multipart(e) => {
                warn!(error = ?e, "malformed multipart body");
                ErrorMessage::from((e.status(), e.body_text())).into_response()
            }
            ApiError::Io(e) => {
                warn!(error = ?e, "io error");
                ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR))
                    .into_response()
            }
            ApiError::PasswordHash(e) => {
                warn!(error = e, "password hashing failed");
                ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR))
                    .into_response()
            }
        }
    }
}

fn serialize_status<S>(value: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(value.as_u16())
}

impl From<(StatusCode, String)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, String)) -> Self {
        Self {
            success: false,
            status_code,
            message,
        }
    }
}

impl From<(StatusCode, &str)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, &str)) -> Self {
        Self::from((status_code, message.to_string()))
    }
}

impl IntoResponse for ErrorMessage {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

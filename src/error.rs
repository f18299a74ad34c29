use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Recognition failed: {0}")]
    RecognitionError(String),

    #[error("Preprocessing failed: {0}")]
    #[allow(dead_code)]
    PreprocessingError(String),

    #[error("Unsupported upload type: {0}")]
    UnsupportedUpload(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::EngineUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "ENGINE_UNAVAILABLE")
            }
            AppError::RecognitionError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RECOGNITION_ERROR"),
            AppError::PreprocessingError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PREPROCESSING_ERROR")
            }
            AppError::UnsupportedUpload(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_UPLOAD")
            }
            AppError::ImageTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE"),
            AppError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

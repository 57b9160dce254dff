//! Error translation: engine taxonomy → HTTP statuses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use freight_messaging::MessagingError;

use crate::models::{Data, ErrorBody};

/// Handler result: success envelope or translated engine failure
pub type ApiResult<T> = Result<Json<Data<T>>, ApiError>;

/// Wrap a payload in the success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(Data::new(data)))
}

/// Engine failure carried to the response layer
#[derive(Debug)]
pub struct ApiError(pub MessagingError);

impl From<MessagingError> for ApiError {
    fn from(e: MessagingError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MessagingError::Validation(_) | MessagingError::InvalidRole(_) => {
                StatusCode::BAD_REQUEST
            }
            MessagingError::Forbidden(_) => StatusCode::FORBIDDEN,
            MessagingError::NotFound { .. } => StatusCode::NOT_FOUND,
            MessagingError::ConversationClosed(_) | MessagingError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            MessagingError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(ErrorBody::message(self.0.to_string()))).into_response()
    }
}

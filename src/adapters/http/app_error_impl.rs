use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Shown for every server-side failure; details stay in the logs.
const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidEmail => {
                tracing::debug!(error = %self, "Rejected signup");
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidEmail, self.to_string())
            }
            AppError::InvalidInput(_) => {
                tracing::debug!(error = %self, "Rejected request");
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, self.to_string())
            }
            AppError::RefCodeNotFound => {
                error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, self.to_string())
            }
            AppError::Store(_) => {
                tracing::error!(error = ?self, "Request failed");
                error_resp(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StoreError,
                    GENERIC_FAILURE.into(),
                )
            }
            AppError::Internal(_) => {
                tracing::error!(error = ?self, "Request failed");
                error_resp(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    GENERIC_FAILURE.into(),
                )
            }
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: String) -> Response {
    let body = serde_json::json!({ "error": message, "code": code.as_str() });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_store_errors_do_not_leak_details() {
        let resp = AppError::Store("redis://secret@host refused".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(resp).await;
        assert_eq!(body["error"], GENERIC_FAILURE);
        assert_eq!(body["code"], "STORE_ERROR");
    }

    #[tokio::test]
    async fn test_not_found_shape() {
        let resp = AppError::RefCodeNotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(resp).await;
        assert_eq!(body["error"], "Referral code not found.");
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_email_shape() {
        let resp = AppError::InvalidEmail.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(body["error"], "Please enter a valid email address.");
    }
}

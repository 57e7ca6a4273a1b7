//! Shared response envelope types for API handlers.
//!
//! All API responses use the `{ "status": ..., "message": ..., "data": ... }`
//! envelope. Use [`ApiResponse`] instead of ad-hoc `serde_json::json!` calls
//! to get compile-time type safety and consistent serialization. Error
//! responses are produced by [`AppError`](crate::error::AppError) in the same
//! envelope shape (without `data`).

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::Serialize;
use vigil_core::error::CoreError;

use crate::error::AppError;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload in the success envelope.
    pub fn success(message: impl Into<String>, data: T) -> axum::Json<Self> {
        axum::Json(Self {
            status: "success",
            message: message.into(),
            data,
        })
    }
}

/// `Json<T>` wrapper whose rejection is a validation error in the project
/// envelope (400) instead of Axum's default plain-text response.
///
/// Malformed bodies -- including status values outside the defined
/// vocabularies -- never reach a handler or the store.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Core(CoreError::Validation(rejection.body_text())))?;
        Ok(AppJson(value))
    }
}

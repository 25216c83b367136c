use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::error::VaultError;

/// JSON body extractor whose rejections render as `{"detail": ...}`.
///
/// Oversized bodies become 413; every other decode failure is a 400.
pub struct VaultJson<T>(pub T);

impl<S, T> FromRequest<S> for VaultJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = VaultError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(VaultJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> VaultError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return VaultError::PayloadTooLarge;
    }
    VaultError::Validation(format!("Invalid request body: {}", rejection.body_text()))
}

use axum::{
    Json,
    extract::{RawQuery, State},
    http::HeaderMap,
};
use tracing::{info, warn};

use crate::error::VaultError;
use crate::middleware::auth::{ensure_authorized, secret_matches};
use crate::middleware::VaultJson;
use crate::router::VaultState;
use crate::types::{LoginRequest, LoginResponse, VerifyResponse};

/// POST /auth/login -> the shared token plus the persisted theme when the password matches.
pub async fn login(
    State(state): State<VaultState>,
    VaultJson(body): VaultJson<LoginRequest>,
) -> Result<Json<LoginResponse>, VaultError> {
    if let Some(limiter) = state.login_limiter.as_ref()
        && limiter.check().is_err()
    {
        warn!("login throttled");
        return Err(VaultError::TooManyAttempts);
    }

    let password = body.password.unwrap_or_default();
    if !secret_matches(&password, &state.config.vault_password) {
        warn!("login rejected");
        return Err(VaultError::InvalidPassword);
    }

    let theme = state.store.theme().await?;
    info!(theme = %theme, "login accepted");
    Ok(Json(LoginResponse {
        success: true,
        token: state.config.vault_token.clone(),
        theme,
    }))
}

/// GET /auth/verify?token=... (a bearer header is accepted too)
pub async fn verify(
    State(state): State<VaultState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<VerifyResponse>, VaultError> {
    ensure_authorized(&headers, query.as_deref(), &state.config.vault_token)?;
    Ok(Json(VerifyResponse { valid: true }))
}

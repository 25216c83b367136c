use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::error::VaultError;
use crate::router::VaultState;

/// Constant-time comparison against the configured secret.
pub fn secret_matches(candidate: &str, expected: &str) -> bool {
    bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()))
}

/// Ensure the inbound request carries the vault token.
/// Accepts either:
/// - Header: `x-vault-token: ...`
/// - Header: `Authorization: Bearer ...`
/// - Query string: `?token=...`
pub fn ensure_authorized(
    headers: &HeaderMap,
    query: Option<&str>,
    expected: &str,
) -> Result<(), VaultError> {
    // 1) header: x-vault-token
    if let Some(hv) = headers.get("x-vault-token").and_then(|v| v.to_str().ok())
        && secret_matches(hv, expected)
    {
        return Ok(());
    }

    // 2) header: Authorization: Bearer <token>
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        let auth = auth.trim();
        if let Some(token) = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            && secret_matches(token.trim(), expected)
        {
            return Ok(());
        }
    }

    // 3) query: token=...
    if let Some(qs) = query {
        for (k, v) in url::form_urlencoded::parse(qs.as_bytes()) {
            if k == "token" && secret_matches(&v, expected) {
                return Ok(());
            }
        }
    }

    Err(VaultError::InvalidToken)
}

/// Route layer guarding resource routes when `PROTECT_API` is on.
pub async fn require_token(
    State(state): State<VaultState>,
    req: Request,
    next: Next,
) -> Result<Response, VaultError> {
    ensure_authorized(req.headers(), req.uri().query(), &state.config.vault_token)?;
    Ok(next.run(req).await)
}

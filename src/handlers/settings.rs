use axum::{Json, extract::State};
use tracing::info;

use crate::error::VaultError;
use crate::middleware::VaultJson;
use crate::router::VaultState;
use crate::types::{ThemeResponse, ThemeUpdate};

/// GET /settings/theme
pub async fn get_theme(State(state): State<VaultState>) -> Result<Json<ThemeResponse>, VaultError> {
    let theme = state.store.theme().await?;
    Ok(Json(ThemeResponse { theme }))
}

/// PUT /settings/theme
pub async fn put_theme(
    State(state): State<VaultState>,
    VaultJson(body): VaultJson<ThemeUpdate>,
) -> Result<Json<ThemeResponse>, VaultError> {
    let theme = body.validate()?;
    state.store.set_theme(&theme).await?;

    info!(theme = %theme, "theme updated");
    Ok(Json(ThemeResponse { theme }))
}

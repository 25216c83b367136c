use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::db::Achievement;
use crate::error::VaultError;
use crate::middleware::VaultJson;
use crate::router::VaultState;
use crate::types::NewAchievement;

/// POST /achievements
pub async fn create_achievement(
    State(state): State<VaultState>,
    VaultJson(body): VaultJson<NewAchievement>,
) -> Result<(StatusCode, Json<Achievement>), VaultError> {
    let valid = body.validate()?;
    let achievement = Achievement::new(
        valid.title,
        valid.description,
        valid.date,
        valid.image_data,
    );
    state.store.insert(&achievement).await?;

    info!(id = %achievement.id, date = %achievement.date, "achievement recorded");
    Ok((StatusCode::CREATED, Json(achievement)))
}

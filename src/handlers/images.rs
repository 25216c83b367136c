//! Gallery and tribute share one payload shape; handlers are generic over the collection.

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::db::models::ImageDocument;
use crate::error::VaultError;
use crate::middleware::VaultJson;
use crate::router::VaultState;
use crate::types::NewImage;

/// POST /gallery, POST /tribute
pub async fn create_image<D: ImageDocument>(
    State(state): State<VaultState>,
    VaultJson(body): VaultJson<NewImage>,
) -> Result<(StatusCode, Json<D>), VaultError> {
    let (image_data, caption) = body.validate()?;
    let item = D::create(image_data, caption);
    state.store.insert(&item).await?;

    info!(
        collection = D::COLLECTION.as_str(),
        id = item.id(),
        "image stored"
    );
    Ok((StatusCode::CREATED, Json(item)))
}

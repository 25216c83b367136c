//! HTTP handlers, one module per resource.

pub mod achievements;
pub mod auth;
pub mod images;
pub mod settings;
pub mod todos;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use crate::db::Document;
use crate::error::VaultError;
use crate::router::VaultState;
use crate::types::DeleteResponse;

/// GET on any collection: newest first, capped, timestamps normalized.
pub async fn list_documents<D: Document>(
    State(state): State<VaultState>,
) -> Result<Json<Vec<D>>, VaultError> {
    Ok(Json(state.store.list::<D>().await?))
}

/// DELETE by id on any collection.
pub async fn delete_document<D: Document>(
    State(state): State<VaultState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, VaultError> {
    let collection = D::COLLECTION;
    if !state.store.delete(collection, &id).await? {
        return Err(VaultError::NotFound(collection.label()));
    }
    info!(collection = collection.as_str(), id = %id, "document deleted");
    Ok(Json(DeleteResponse::ok()))
}

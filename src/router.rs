use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post},
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Config, CorsOrigins};
use crate::db::{Achievement, GalleryItem, Todo, TributeItem, VaultStore};
use crate::error::VaultError;
use crate::handlers::{
    achievements, auth, delete_document, images, list_documents, settings, todos,
};
use crate::middleware::require_token;

/// Shared state handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct VaultState {
    pub store: VaultStore,
    pub config: Arc<Config>,
    pub login_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl VaultState {
    pub fn new(store: VaultStore, config: Config) -> Self {
        let login_limiter = NonZeroU32::new(config.login_attempts_per_minute)
            .map(|n| Arc::new(RateLimiter::direct(Quota::per_minute(n))));
        Self {
            store,
            config: Arc::new(config),
            login_limiter,
        }
    }
}

/// Build the full application router, every route nested under `/api`.
pub fn vault_router(state: VaultState) -> Result<Router, VaultError> {
    let cors = build_cors_layer(&state.config.cors_origins())?;

    let mut resources = Router::new()
        .route(
            "/gallery",
            get(list_documents::<GalleryItem>).post(images::create_image::<GalleryItem>),
        )
        .route("/gallery/{id}", delete(delete_document::<GalleryItem>))
        .route(
            "/achievements",
            get(list_documents::<Achievement>).post(achievements::create_achievement),
        )
        .route(
            "/achievements/{id}",
            delete(delete_document::<Achievement>),
        )
        .route(
            "/todos",
            get(list_documents::<Todo>).post(todos::create_todo),
        )
        .route(
            "/todos/{id}",
            patch(todos::update_todo).delete(delete_document::<Todo>),
        )
        .route(
            "/tribute",
            get(list_documents::<TributeItem>).post(images::create_image::<TributeItem>),
        )
        .route("/tribute/{id}", delete(delete_document::<TributeItem>))
        .route(
            "/settings/theme",
            get(settings::get_theme).put(settings::put_theme),
        );

    if state.config.protect_api {
        resources =
            resources.route_layer(middleware::from_fn_with_state(state.clone(), require_token));
    }

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/verify", get(auth::verify))
        .merge(resources);

    Ok(Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(state.config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// `*` allows any origin without credentials; an explicit list allows exactly
/// those origins with credentials.
pub fn build_cors_layer(origins: &CorsOrigins) -> Result<CorsLayer, VaultError> {
    match origins {
        CorsOrigins::Any => Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)),
        CorsOrigins::List(list) => {
            let values = list
                .iter()
                .map(|origin| parse_origin(origin))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CorsLayer::new()
                .allow_origin(AllowOrigin::list(values))
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true))
        }
    }
}

fn parse_origin(origin: &str) -> Result<HeaderValue, VaultError> {
    let invalid = || VaultError::InvalidOrigin(origin.to_string());
    let url = url::Url::parse(origin).map_err(|_| invalid())?;
    if url.host_str().is_none() {
        return Err(invalid());
    }
    HeaderValue::from_str(origin.trim_end_matches('/')).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_origins_must_be_urls() {
        let ok = CorsOrigins::List(vec!["http://localhost:3000".to_string()]);
        assert!(build_cors_layer(&ok).is_ok());

        let bad = CorsOrigins::List(vec!["localhost:3000 ".to_string(), "nope".to_string()]);
        assert!(matches!(
            build_cors_layer(&bad),
            Err(VaultError::InvalidOrigin(_))
        ));
    }
}

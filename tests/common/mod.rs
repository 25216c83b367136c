#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use memory_vault::config::Config;
use memory_vault::db::VaultStore;
use memory_vault::router::{VaultState, vault_router};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

pub const PASSWORD: &str = "open-sesame";
pub const TOKEN: &str = "vault-session-token";

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

pub struct TestApp {
    pub router: Router,
    pub store: VaultStore,
    dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// Router over a fresh on-disk store; `configure` tweaks the config before startup.
pub async fn spawn_app(configure: impl FnOnce(&mut Config)) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "memory-vault-test-{}-{}-{}",
        std::process::id(),
        nanos,
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    ));

    let mut cfg = Config {
        database_url: format!("sqlite://{}", dir.display()),
        database_name: "vault".to_string(),
        vault_password: PASSWORD.to_string(),
        vault_token: TOKEN.to_string(),
        ..Config::default()
    };
    configure(&mut cfg);

    let store = VaultStore::connect(&cfg.database_url, &cfg.database_name)
        .await
        .expect("failed to open store");
    let router = vault_router(VaultState::new(store.clone(), cfg)).expect("failed to build router");

    TestApp { router, store, dir }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("request failed");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body was not JSON")
        };
        (status, json)
    }
}

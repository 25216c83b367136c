use crate::db::models::{Collection, Document, Todo};
use crate::db::schema::SQLITE_INIT;
use crate::db::timestamp;
use crate::error::VaultError;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Maximum number of documents returned by a list query.
pub const LIST_LIMIT: i64 = 1000;

pub const THEME_KEY: &str = "theme";
pub const DEFAULT_THEME: &str = "dark";

/// Newest first, ordered by the same timestamp the read returns: strings as
/// stored, epoch millis and `$date` wrappers rendered canonically, anything
/// unusable as the current time. Ties fall back to insertion order.
const LIST_SQL: &str = r#"
SELECT body FROM documents
WHERE collection = ?1
ORDER BY
    COALESCE(
        CASE json_type(body, '$.timestamp')
            WHEN 'text' THEN json_extract(body, '$.timestamp')
            WHEN 'integer' THEN strftime('%Y-%m-%dT%H:%M:%fZ', json_extract(body, '$.timestamp') / 1000.0, 'unixepoch')
            WHEN 'real' THEN strftime('%Y-%m-%dT%H:%M:%fZ', json_extract(body, '$.timestamp') / 1000.0, 'unixepoch')
            WHEN 'object' THEN CASE json_type(body, '$.timestamp."$date"')
                WHEN 'text' THEN strftime('%Y-%m-%dT%H:%M:%fZ', json_extract(body, '$.timestamp."$date"'))
                WHEN 'integer' THEN strftime('%Y-%m-%dT%H:%M:%fZ', json_extract(body, '$.timestamp."$date"') / 1000.0, 'unixepoch')
                WHEN 'real' THEN strftime('%Y-%m-%dT%H:%M:%fZ', json_extract(body, '$.timestamp."$date"') / 1000.0, 'unixepoch')
                WHEN 'object' THEN strftime('%Y-%m-%dT%H:%M:%fZ', CAST(json_extract(body, '$.timestamp."$date"."$numberLong"') AS INTEGER) / 1000.0, 'unixepoch')
                ELSE strftime('%Y-%m-%dT%H:%M:%fZ', CAST(json_extract(body, '$.timestamp."$numberLong"') AS INTEGER) / 1000.0, 'unixepoch')
            END
        END,
        strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    ) DESC,
    rowid DESC
LIMIT ?2
"#;

/// Document store handle. Cheap to clone; all clones share one pool.
#[derive(Clone)]
pub struct VaultStore {
    pool: SqlitePool,
}

impl VaultStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the store named `database_name` under `database_url` and create the schema.
    ///
    /// `database_url` names a directory (`sqlite://data`) that receives
    /// `<database_name>.sqlite`. An in-memory URL (`sqlite::memory:`) keeps a
    /// single connection alive so every query sees the same database.
    pub async fn connect(database_url: &str, database_name: &str) -> Result<Self, VaultError> {
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(SqliteConnectOptions::from_str(database_url)?)
                .await?
        } else {
            let opts = SqliteConnectOptions::from_str(database_url)?;
            let dir = opts.get_filename().to_path_buf();
            tokio::fs::create_dir_all(&dir).await?;
            let file = dir.join(format!("{database_name}.sqlite"));
            info!(path = %file.display(), "opening document store");
            SqlitePoolOptions::new()
                .connect_with(opts.filename(file).create_if_missing(true))
                .await?
        };

        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), VaultError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn insert<D: Document>(&self, doc: &D) -> Result<(), VaultError> {
        let body = serde_json::to_string(doc)?;
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(D::COLLECTION.as_str())
            .bind(doc.id())
            .bind(body)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Up to [`LIST_LIMIT`] documents, newest first, timestamps normalized.
    pub async fn list<D: Document>(&self) -> Result<Vec<D>, VaultError> {
        let rows: Vec<(String,)> = sqlx::query_as(LIST_SQL)
            .bind(D::COLLECTION.as_str())
            .bind(LIST_LIMIT)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|(body,)| Self::decode::<D>(&body))
            .collect()
    }

    /// Returns whether a document was removed.
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<bool, VaultError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set `completed` on one todo and return the updated document.
    pub async fn set_todo_completed(
        &self,
        id: &str,
        completed: bool,
    ) -> Result<Option<Todo>, VaultError> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"UPDATE documents SET body = json_set(body, '$.completed', json(?))
               WHERE collection = ? AND id = ?
               RETURNING body"#,
        )
        .bind(if completed { "true" } else { "false" })
        .bind(Collection::Todos.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(body,)| Self::decode::<Todo>(&body)).transpose()
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, VaultError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    /// Upsert by unique key.
    pub async fn upsert_setting(&self, key: &str, value: &str) -> Result<(), VaultError> {
        sqlx::query(
            r#"INSERT INTO settings (key, value) VALUES (?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value"#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Persisted theme, or the default when unset or empty.
    pub async fn theme(&self) -> Result<String, VaultError> {
        Ok(self
            .get_setting(THEME_KEY)
            .await?
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_THEME.to_string()))
    }

    pub async fn set_theme(&self, theme: &str) -> Result<(), VaultError> {
        self.upsert_setting(THEME_KEY, theme).await
    }

    fn decode<D: Document>(body: &str) -> Result<D, VaultError> {
        let mut value: Value = serde_json::from_str(body)?;
        timestamp::normalize_document(&mut value);
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Achievement, GalleryItem, TributeItem};
    use std::collections::HashSet;

    async fn memory_store() -> VaultStore {
        VaultStore::connect("sqlite::memory:", "unused")
            .await
            .expect("in-memory store")
    }

    async fn insert_raw(store: &VaultStore, collection: Collection, id: &str, body: Value) {
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(collection.as_str())
            .bind(id)
            .bind(body.to_string())
            .execute(store.pool())
            .await
            .expect("raw insert");
    }

    #[tokio::test]
    async fn collections_have_separate_id_spaces() {
        let store = memory_store().await;
        let image = GalleryItem::new("data:image/png;base64,AAAA".into(), String::new());
        store.insert(&image).await.unwrap();

        assert_eq!(store.list::<GalleryItem>().await.unwrap(), vec![image.clone()]);
        assert!(store.list::<TributeItem>().await.unwrap().is_empty());
        assert!(!store.delete(Collection::Tribute, &image.id).await.unwrap());
        assert!(store.delete(Collection::Gallery, &image.id).await.unwrap());
    }

    #[tokio::test]
    async fn list_orders_mixed_timestamps_newest_first() {
        let store = memory_store().await;
        insert_raw(
            &store,
            Collection::Achievements,
            "numeric",
            serde_json::json!({
                "id": "numeric", "title": "t", "description": "d", "date": "2024",
                "image_data": null, "timestamp": 1_704_067_200_000_i64
            }),
        )
        .await;
        insert_raw(
            &store,
            Collection::Achievements,
            "older",
            serde_json::json!({
                "id": "older", "title": "t", "description": "d", "date": "2023",
                "image_data": null, "timestamp": "2023-06-01T00:00:00.000Z"
            }),
        )
        .await;
        let fresh = Achievement::new("t".into(), "d".into(), "2025".into(), None);
        store.insert(&fresh).await.unwrap();

        let listed = store.list::<Achievement>().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec![fresh.id.as_str(), "numeric", "older"]);
        assert_eq!(listed[1].timestamp, "2024-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn list_order_matches_normalized_timestamps() {
        let store = memory_store().await;
        let image = |id: &str, timestamp: Value| {
            serde_json::json!({
                "id": id, "image_data": "data:image/png;base64,AAAA", "caption": "",
                "timestamp": timestamp
            })
        };
        insert_raw(
            &store,
            Collection::Gallery,
            "old",
            image("old", serde_json::json!("2020-01-01T00:00:00.000Z")),
        )
        .await;
        let fresh = GalleryItem::new("data:image/png;base64,BBBB".into(), String::new());
        store.insert(&fresh).await.unwrap();
        insert_raw(
            &store,
            Collection::Gallery,
            "undated",
            image("undated", Value::Null),
        )
        .await;
        insert_raw(
            &store,
            Collection::Gallery,
            "future",
            image("future", serde_json::json!({"$date": 4_102_444_800_000_i64})),
        )
        .await;
        insert_raw(
            &store,
            Collection::Gallery,
            "long",
            image("long", serde_json::json!({"$date": {"$numberLong": "4000000000000"}})),
        )
        .await;
        insert_raw(
            &store,
            Collection::Gallery,
            "offset",
            image("offset", serde_json::json!({"$date": "2021-06-01T02:00:00+02:00"})),
        )
        .await;

        let listed = store.list::<GalleryItem>().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["future", "long", "undated", fresh.id.as_str(), "offset", "old"]
        );
        assert_eq!(listed[0].timestamp, "2100-01-01T00:00:00.000Z");
        assert_eq!(listed[4].timestamp, "2021-06-01T00:00:00.000Z");
        assert!(
            listed
                .windows(2)
                .all(|pair| pair[0].timestamp >= pair[1].timestamp)
        );
    }

    #[tokio::test]
    async fn list_is_capped() {
        let store = memory_store().await;
        let mut ids = HashSet::new();
        for i in 0..(LIST_LIMIT + 5) {
            let todo = Todo::new(format!("task {i}"));
            assert!(ids.insert(todo.id.clone()), "duplicate id generated");
            store.insert(&todo).await.unwrap();
        }

        let listed = store.list::<Todo>().await.unwrap();
        assert_eq!(listed.len() as i64, LIST_LIMIT);
        assert!(
            listed
                .windows(2)
                .all(|pair| pair[0].timestamp >= pair[1].timestamp)
        );
        assert_eq!(listed[0].task, format!("task {}", LIST_LIMIT + 4));
    }

    #[tokio::test]
    async fn set_todo_completed_updates_only_that_field() {
        let store = memory_store().await;
        let todo = Todo::new("water plants".into());
        store.insert(&todo).await.unwrap();

        let updated = store.set_todo_completed(&todo.id, true).await.unwrap().unwrap();
        assert!(updated.completed);
        assert_eq!(updated.task, todo.task);
        assert_eq!(updated.timestamp, todo.timestamp);

        let restored = store.set_todo_completed(&todo.id, false).await.unwrap().unwrap();
        assert!(!restored.completed);
        assert!(store.set_todo_completed("missing", true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn theme_defaults_and_upserts() {
        let store = memory_store().await;
        assert_eq!(store.theme().await.unwrap(), DEFAULT_THEME);
        store.set_theme("light").await.unwrap();
        store.set_theme("purple").await.unwrap();
        assert_eq!(store.theme().await.unwrap(), "purple");

        let rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM settings")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(rows.0, 1);
    }
}

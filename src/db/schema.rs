//! SQL DDL for initializing the vault storage.
//! SQLite-first design; JSON documents rely on the bundled JSON functions.

/// SQLite schema with:
/// - `documents`: one row per document, keyed by (`collection`, `id`);
///   `body` holds the full JSON document including `id` and `timestamp`
/// - `settings`: one row per setting key, written with upserts
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL, -- JSON object
    PRIMARY KEY (collection, id)
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

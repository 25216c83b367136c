//! Database module: document models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: documents stored per collection, plus the `Document` trait
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: `VaultStore`, the document store handle shared by handlers
//! - `timestamp.rs`: canonical timestamp formatting and read-side normalization

pub mod models;
pub mod schema;
pub mod sqlite;
pub mod timestamp;

pub use models::{Achievement, Collection, Document, GalleryItem, ImageDocument, Todo, TributeItem};
pub use schema::SQLITE_INIT;
pub use sqlite::{LIST_LIMIT, SqlitePool, VaultStore};

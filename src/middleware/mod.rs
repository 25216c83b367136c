pub mod auth;
pub mod json_body;

pub use auth::{ensure_authorized, require_token};
pub use json_body::VaultJson;

//! Request and response payloads of the HTTP API.

pub mod requests;
pub mod responses;

pub use requests::{
    LoginRequest, NewAchievement, NewImage, NewTodo, ThemeUpdate, TodoUpdate, ValidAchievement,
};
pub use responses::{DeleteResponse, LoginResponse, ThemeResponse, VerifyResponse};

use crate::error::VaultError;
use serde::Deserialize;
use serde_json::Value;

/// Missing, null and empty strings are all rejected.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
}

/// Body of `POST /gallery` and `POST /tribute`.
#[derive(Debug, Default, Deserialize)]
pub struct NewImage {
    pub image_data: Option<String>,
    pub caption: Option<String>,
}

impl NewImage {
    /// Returns `(image_data, caption)`; the caption defaults to empty.
    pub fn validate(self) -> Result<(String, String), VaultError> {
        let image_data = present(self.image_data)
            .ok_or_else(|| VaultError::validation("image_data is required"))?;
        Ok((image_data, self.caption.unwrap_or_default()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewAchievement {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub image_data: Option<String>,
}

#[derive(Debug)]
pub struct ValidAchievement {
    pub title: String,
    pub description: String,
    pub date: String,
    pub image_data: Option<String>,
}

impl NewAchievement {
    pub fn validate(self) -> Result<ValidAchievement, VaultError> {
        match (
            present(self.title),
            present(self.description),
            present(self.date),
        ) {
            (Some(title), Some(description), Some(date)) => Ok(ValidAchievement {
                title,
                description,
                date,
                image_data: self.image_data,
            }),
            _ => Err(VaultError::validation(
                "title, description and date are required",
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewTodo {
    pub task: Option<String>,
}

impl NewTodo {
    pub fn validate(self) -> Result<String, VaultError> {
        present(self.task).ok_or_else(|| VaultError::validation("task is required"))
    }
}

/// Body of `PATCH /todos/{id}`. Kept loose so a non-boolean value is a 400
/// with a specific message rather than a generic decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct TodoUpdate {
    pub completed: Option<Value>,
}

impl TodoUpdate {
    pub fn validate(&self) -> Result<bool, VaultError> {
        self.completed
            .as_ref()
            .and_then(Value::as_bool)
            .ok_or_else(|| VaultError::validation("completed (boolean) is required"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ThemeUpdate {
    pub theme: Option<String>,
}

impl ThemeUpdate {
    pub fn validate(self) -> Result<String, VaultError> {
        present(self.theme).ok_or_else(|| VaultError::validation("theme is required"))
    }
}

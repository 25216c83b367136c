use crate::db::timestamp;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Named document collections. Each has its own id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Gallery,
    Achievements,
    Todos,
    Tribute,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Gallery => "gallery",
            Collection::Achievements => "achievements",
            Collection::Todos => "todos",
            Collection::Tribute => "tribute",
        }
    }

    /// Subject used in not-found errors.
    pub fn label(self) -> &'static str {
        match self {
            Collection::Gallery | Collection::Tribute => "Image",
            Collection::Achievements => "Achievement",
            Collection::Todos => "Todo",
        }
    }
}

/// A JSON document persisted in one collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

/// Documents created from an uploaded image and an optional caption.
pub trait ImageDocument: Document {
    fn create(image_data: String, caption: String) -> Self;
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryItem {
    pub id: String,
    pub image_data: String,
    #[serde(default)]
    pub caption: String,
    pub timestamp: String,
}

impl GalleryItem {
    pub fn new(image_data: String, caption: String) -> Self {
        Self {
            id: new_id(),
            image_data,
            caption,
            timestamp: timestamp::now(),
        }
    }
}

impl Document for GalleryItem {
    const COLLECTION: Collection = Collection::Gallery;

    fn id(&self) -> &str {
        &self.id
    }
}

impl ImageDocument for GalleryItem {
    fn create(image_data: String, caption: String) -> Self {
        Self::new(image_data, caption)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_data: Option<String>,
    pub date: String,
    pub timestamp: String,
}

impl Achievement {
    pub fn new(
        title: String,
        description: String,
        date: String,
        image_data: Option<String>,
    ) -> Self {
        Self {
            id: new_id(),
            title,
            description,
            image_data,
            date,
            timestamp: timestamp::now(),
        }
    }
}

impl Document for Achievement {
    const COLLECTION: Collection = Collection::Achievements;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub completed: bool,
    pub timestamp: String,
}

impl Todo {
    pub fn new(task: String) -> Self {
        Self {
            id: new_id(),
            task,
            completed: false,
            timestamp: timestamp::now(),
        }
    }
}

impl Document for Todo {
    const COLLECTION: Collection = Collection::Todos;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Same shape as [`GalleryItem`], kept in its own collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TributeItem {
    pub id: String,
    pub image_data: String,
    #[serde(default)]
    pub caption: String,
    pub timestamp: String,
}

impl TributeItem {
    pub fn new(image_data: String, caption: String) -> Self {
        Self {
            id: new_id(),
            image_data,
            caption,
            timestamp: timestamp::now(),
        }
    }
}

impl Document for TributeItem {
    const COLLECTION: Collection = Collection::Tribute;

    fn id(&self) -> &str {
        &self.id
    }
}

impl ImageDocument for TributeItem {
    fn create(image_data: String, caption: String) -> Self {
        Self::new(image_data, caption)
    }
}

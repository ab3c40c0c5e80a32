use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{Category, FALLBACK_CATEGORY, Note, NoteDraft};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Rich-text markup of the note body
    pub content: String,
    /// Name of the category the note belongs to
    pub category: String,
    /// Tags in display order
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            category: note.category,
            tags: note.tags,
            is_favorite: note.is_favorite,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

fn fallback_category() -> String {
    FALLBACK_CATEGORY.to_string()
}

/// Body of note create and update requests.
///
/// `id` is ignored on create and must match the path on update. Timestamps
/// sent by clients are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "fallback_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl From<NoteRequest> for NoteDraft {
    fn from(request: NoteRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            category: request.category,
            tags: request.tags,
            is_favorite: request.is_favorite,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Substring to look for in titles, contents and tags
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Category ID
    pub id: i64,
    /// Unique category name
    pub name: String,
    /// Seeded categories cannot be renamed or deleted
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            is_default: category.is_default,
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    /// Category name, surrounding whitespace is trimmed
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub id: Option<i64>,
    /// New category name
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

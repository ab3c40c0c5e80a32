use chrono::{DateTime, Utc};

/// Category every orphaned note falls back to.
pub const FALLBACK_CATEGORY: &str = "General";

/// Seeded categories, in id order starting from 1.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["General", "Work", "Personal", "Ideas", "Tasks"];

pub const MAX_TITLE_LEN: usize = 500;
pub const MAX_CATEGORY_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Case-insensitive substring match over title, content and tags.
    ///
    /// `notes_client::Note::matches` applies the same rule to offline search.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// User-editable part of a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

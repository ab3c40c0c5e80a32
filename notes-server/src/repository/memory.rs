use async_trait::async_trait;
use chrono::Utc;

use std::collections::BTreeMap;

use super::{Repository, RepositoryError};
use crate::models::{Category, DEFAULT_CATEGORIES, Note, NoteDraft};

/// Process-local backend holding everything in ordered maps.
///
/// Starts out with the default categories seeded under ids 1 to 5.
pub struct MemoryRepository {
    notes: BTreeMap<i64, Note>,
    categories: BTreeMap<i64, Category>,
    last_note_id: i64,
    last_category_id: i64,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        let now = Utc::now();
        let categories: BTreeMap<i64, Category> = (1..)
            .zip(DEFAULT_CATEGORIES)
            .map(|(id, name)| {
                (
                    id,
                    Category {
                        id,
                        name: name.to_string(),
                        is_default: true,
                        created_at: now,
                    },
                )
            })
            .collect();
        let last_category_id = categories.keys().copied().max().unwrap_or(0);

        Self {
            notes: BTreeMap::new(),
            categories,
            last_note_id: 0,
            last_category_id,
        }
    }
}

fn sorted_notes<'a>(notes: impl Iterator<Item = &'a Note>) -> Vec<Note> {
    let mut vec: Vec<Note> = notes.cloned().collect();
    vec.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    vec
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_notes(&self) -> Result<Vec<Note>, RepositoryError> {
        Ok(sorted_notes(self.notes.values()))
    }

    async fn get_note(&self, id: i64) -> Result<Option<Note>, RepositoryError> {
        Ok(self.notes.get(&id).cloned())
    }

    async fn create_note(&mut self, draft: NoteDraft) -> Result<Note, RepositoryError> {
        self.last_note_id += 1;
        let now = Utc::now();
        let note = Note {
            id: self.last_note_id,
            title: draft.title,
            content: draft.content,
            category: draft.category,
            tags: draft.tags,
            is_favorite: draft.is_favorite,
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(
        &mut self,
        id: i64,
        draft: NoteDraft,
    ) -> Result<Option<Note>, RepositoryError> {
        let Some(note) = self.notes.get_mut(&id) else {
            return Ok(None);
        };

        note.title = draft.title;
        note.content = draft.content;
        note.category = draft.category;
        note.tags = draft.tags;
        note.is_favorite = draft.is_favorite;
        note.updated_at = Utc::now().max(note.updated_at);

        Ok(Some(note.clone()))
    }

    async fn delete_note(&mut self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.notes.remove(&id).is_some())
    }

    async fn search_notes(&self, term: &str) -> Result<Vec<Note>, RepositoryError> {
        Ok(sorted_notes(self.notes.values().filter(|note| note.matches(term))))
    }

    async fn notes_by_category(&self, category: &str) -> Result<Vec<Note>, RepositoryError> {
        Ok(sorted_notes(
            self.notes
                .values()
                .filter(|note| note.category == category),
        ))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut vec: Vec<Category> = self.categories.values().cloned().collect();
        vec.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vec)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, RepositoryError> {
        Ok(self.categories.get(&id).cloned())
    }

    async fn find_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        Ok(self
            .categories
            .values()
            .find(|category| category.name == name)
            .cloned())
    }

    async fn create_category(&mut self, name: String) -> Result<Category, RepositoryError> {
        if self.categories.values().any(|c| c.name == name) {
            return Err(RepositoryError::Duplicate(name));
        }

        self.last_category_id += 1;
        let category = Category {
            id: self.last_category_id,
            name,
            is_default: false,
            created_at: Utc::now(),
        };
        self.categories.insert(category.id, category.clone());

        Ok(category)
    }

    async fn rename_category(&mut self, id: i64, name: String) -> Result<bool, RepositoryError> {
        if self.categories.values().any(|c| c.id != id && c.name == name) {
            return Err(RepositoryError::Duplicate(name));
        }

        match self.categories.get_mut(&id) {
            Some(category) => {
                category.name = name;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_category(
        &mut self,
        category: &Category,
        fallback: &str,
    ) -> Result<u64, RepositoryError> {
        let mut moved = 0;
        for note in self
            .notes
            .values_mut()
            .filter(|note| note.category == category.name)
        {
            note.category = fallback.to_string();
            moved += 1;
        }
        self.categories.remove(&category.id);

        Ok(moved)
    }
}

mod embedded;
mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use async_trait::async_trait;

use std::sync::Arc;

use crate::{
    config::DatabaseConfig,
    models::{Category, Note, NoteDraft},
};

pub type SharedRepository = Arc<tokio::sync::Mutex<Box<dyn Repository>>>;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("unique constraint violated: {0}")]
    Duplicate(String),
}

/// Persistence of notes and categories.
///
/// Lists of notes are always ordered by `updated_at` descending, then by id
/// descending. Categories are ordered by name.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn list_notes(&self) -> Result<Vec<Note>, RepositoryError>;

    async fn get_note(&self, id: i64) -> Result<Option<Note>, RepositoryError>;

    async fn create_note(&mut self, draft: NoteDraft) -> Result<Note, RepositoryError>;

    /// Overwrites the editable fields and bumps `updated_at`, never moving it
    /// backwards. Returns `None` if no such note exists.
    async fn update_note(
        &mut self,
        id: i64,
        draft: NoteDraft,
    ) -> Result<Option<Note>, RepositoryError>;

    async fn delete_note(&mut self, id: i64) -> Result<bool, RepositoryError>;

    /// Case-insensitive substring search over title, content and tags.
    async fn search_notes(&self, term: &str) -> Result<Vec<Note>, RepositoryError>;

    async fn notes_by_category(&self, category: &str) -> Result<Vec<Note>, RepositoryError>;

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError>;

    async fn get_category(&self, id: i64) -> Result<Option<Category>, RepositoryError>;

    async fn find_category_by_name(&self, name: &str)
    -> Result<Option<Category>, RepositoryError>;

    async fn create_category(&mut self, name: String) -> Result<Category, RepositoryError>;

    async fn rename_category(&mut self, id: i64, name: String) -> Result<bool, RepositoryError>;

    /// Moves every note of the category to `fallback` and removes the
    /// category, atomically. Returns the number of reassigned notes.
    async fn delete_category(
        &mut self,
        category: &Category,
        fallback: &str,
    ) -> Result<u64, RepositoryError>;
}

pub fn shared<R: Repository + 'static>(repo: R) -> SharedRepository {
    Arc::new(tokio::sync::Mutex::new(Box::new(repo)))
}

/// Opens the configured backend, running migrations for PostgreSQL.
pub async fn open(config: &DatabaseConfig) -> Result<SharedRepository, RepositoryError> {
    match config {
        DatabaseConfig::Postgres { dsn } => {
            let mut repo = PgRepository::new(dsn).await?;
            repo.migrate().await?;
            Ok(shared(repo))
        }
        DatabaseConfig::Memory => {
            tracing::warn!("Using in-memory storage, data will be lost on shutdown");
            Ok(shared(MemoryRepository::new()))
        }
    }
}

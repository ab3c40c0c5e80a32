use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row, error::SqlState};

use super::{Repository, RepositoryError, embedded::migrations};
use crate::models::{Category, Note, NoteDraft};

const NOTE_COLUMNS: &str =
    "id, title, content, category, tags, is_favorite, created_at, updated_at";
const NOTE_ORDER: &str = "ORDER BY updated_at DESC, id DESC";
const CATEGORY_COLUMNS: &str = "id, name, is_default, created_at";

pub struct PgRepository {
    client: Client,
}

impl PgRepository {
    pub async fn new(database_dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), refinery::Error> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    async fn query_notes(
        &self,
        filter: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Note>, RepositoryError> {
        let rows = self
            .client
            .query(
                &format!("SELECT {NOTE_COLUMNS} FROM notes {filter} {NOTE_ORDER}"),
                params,
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        category: row.get("category"),
        tags: row.get("tags"),
        is_favorite: row.get("is_favorite"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn category_from_row(row: &Row) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        is_default: row.get("is_default"),
        created_at: row.get("created_at"),
    }
}

fn duplicate_or(e: tokio_postgres::Error, name: &str) -> RepositoryError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        RepositoryError::Duplicate(name.to_string())
    } else {
        RepositoryError::Postgres(e)
    }
}

/// Escapes LIKE wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl Repository for PgRepository {
    async fn list_notes(&self) -> Result<Vec<Note>, RepositoryError> {
        self.query_notes("", &[]).await
    }

    async fn get_note(&self, id: i64) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"),
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn create_note(&mut self, draft: NoteDraft) -> Result<Note, RepositoryError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO notes (title, content, category, tags, is_favorite, created_at, updated_at) \
                     VALUES ($1, $2, $3, $4, $5, now(), now()) RETURNING {NOTE_COLUMNS}"
                ),
                &[
                    &draft.title,
                    &draft.content,
                    &draft.category,
                    &draft.tags,
                    &draft.is_favorite,
                ],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn update_note(
        &mut self,
        id: i64,
        draft: NoteDraft,
    ) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE notes SET title = $1, content = $2, category = $3, tags = $4, \
                     is_favorite = $5, updated_at = GREATEST(now(), updated_at) \
                     WHERE id = $6 RETURNING {NOTE_COLUMNS}"
                ),
                &[
                    &draft.title,
                    &draft.content,
                    &draft.category,
                    &draft.tags,
                    &draft.is_favorite,
                    &id,
                ],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete_note(&mut self, id: i64) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        Ok(rows == 1)
    }

    async fn search_notes(&self, term: &str) -> Result<Vec<Note>, RepositoryError> {
        let pattern = like_pattern(term);
        self.query_notes(
            "WHERE title ILIKE $1 OR content ILIKE $1 \
             OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $1)",
            &[&pattern],
        )
        .await
    }

    async fn notes_by_category(&self, category: &str) -> Result<Vec<Note>, RepositoryError> {
        self.query_notes("WHERE category = $1", &[&category]).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = self
            .client
            .query(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name"),
                &[],
            )
            .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"),
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    async fn find_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = $1"),
                &[&name],
            )
            .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    async fn create_category(&mut self, name: String) -> Result<Category, RepositoryError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO categories (name, is_default, created_at) \
                     VALUES ($1, FALSE, now()) RETURNING {CATEGORY_COLUMNS}"
                ),
                &[&name],
            )
            .await
            .map_err(|e| duplicate_or(e, &name))?;

        Ok(category_from_row(&row))
    }

    async fn rename_category(&mut self, id: i64, name: String) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute(
                "UPDATE categories SET name = $1 WHERE id = $2",
                &[&name, &id],
            )
            .await
            .map_err(|e| duplicate_or(e, &name))?;

        Ok(rows == 1)
    }

    async fn delete_category(
        &mut self,
        category: &Category,
        fallback: &str,
    ) -> Result<u64, RepositoryError> {
        let tx = self.client.transaction().await?;

        let moved = tx
            .execute(
                "UPDATE notes SET category = $1 WHERE category = $2",
                &[&fallback, &category.name],
            )
            .await?;
        tx.execute("DELETE FROM categories WHERE id = $1", &[&category.id])
            .await?;

        tx.commit().await?;

        Ok(moved)
    }
}

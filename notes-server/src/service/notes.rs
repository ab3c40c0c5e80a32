use crate::{
    dto::{NoteRequest, NoteResponse},
    models::{MAX_CATEGORY_LEN, MAX_TITLE_LEN, NoteDraft},
    repository::SharedRepository,
};

use super::{ServiceError, check_length};

#[derive(Clone)]
pub struct NoteService {
    repo: SharedRepository,
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Note {id} not found"))
}

fn validate(request: NoteRequest) -> Result<NoteDraft, ServiceError> {
    check_length("Title", &request.title, MAX_TITLE_LEN)?;
    check_length("Category", &request.category, MAX_CATEGORY_LEN)?;
    Ok(request.into())
}

impl NoteService {
    pub const fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn create_note(&self, request: NoteRequest) -> Result<NoteResponse, ServiceError> {
        let draft = validate(request)?;
        let note = self.repo.lock().await.create_note(draft).await?;

        tracing::info!("Created note {}", note.id);

        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: NoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        if request.id != Some(id) {
            return Err(ServiceError::BadRequest(
                "Note id in body does not match the path".to_string(),
            ));
        }
        let draft = validate(request)?;

        self.repo
            .lock()
            .await
            .update_note(id, draft)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ServiceError> {
        if self.repo.lock().await.delete_note(id).await? {
            tracing::info!("Deleted note {}", id);
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    pub async fn get_one_note(&self, id: i64) -> Result<NoteResponse, ServiceError> {
        self.repo
            .lock()
            .await
            .get_note(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found(id))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ServiceError> {
        let notes = self.repo.lock().await.list_notes().await?;
        Ok(notes.into_iter().map(Into::into).collect())
    }

    /// Blank terms list every note.
    pub async fn search_notes(&self, term: &str) -> Result<Vec<NoteResponse>, ServiceError> {
        if term.trim().is_empty() {
            return self.get_all_notes().await;
        }

        let notes = self.repo.lock().await.search_notes(term).await?;
        Ok(notes.into_iter().map(Into::into).collect())
    }

    pub async fn get_notes_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<NoteResponse>, ServiceError> {
        let notes = self.repo.lock().await.notes_by_category(category).await?;
        Ok(notes.into_iter().map(Into::into).collect())
    }
}

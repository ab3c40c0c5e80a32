use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};

use std::{collections::HashSet, time::Duration};

use crate::{
    dto::{Category, CategoryName, ErrorBody, Note, NoteDraft},
    error::ClientError,
    notify::{Notification, NotificationLevel, Notifier},
    storage::{CATEGORIES_KEY, LocalStorage, NOTES_KEY},
};

/// Data access for the notes server.
///
/// Reads never fail: when the server cannot answer, the last successful
/// snapshot from local storage is served instead. Writes always go to the
/// server and report failures to the caller. Every outcome the user should
/// see is pushed to the notifier.
pub struct NoteClient<S, N> {
    http: reqwest::Client,
    base_url: Url,
    storage: S,
    notifier: N,
}

impl<S: LocalStorage, N: Notifier> NoteClient<S, N> {
    pub fn new(base_url: &str, storage: S, notifier: N) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ClientError::Transport)?;

        Self::with_http_client(http, base_url, storage, notifier)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        storage: S,
        notifier: N,
    ) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            http,
            base_url,
            storage,
            notifier,
        })
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.notifier.notify(Notification::new(level, message));
    }

    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };

        Err(ClientError::Api { status, message })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        self.execute(request)
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)
    }

    async fn load_snapshot<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.storage.get_item(key).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable snapshot '{}': {}", key, e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read snapshot '{}': {}", key, e);
                Vec::new()
            }
        }
    }

    async fn save_snapshot<T: Serialize>(&self, key: &str, items: &[T]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to encode snapshot '{}': {}", key, e);
                return;
            }
        };

        if let Err(e) = self.storage.set_item(key, json).await {
            tracing::warn!("Failed to store snapshot '{}': {}", key, e);
        }
    }

    fn report_read_failure(&self, what: &str, e: &ClientError) {
        tracing::debug!("Loading {} failed: {}", what, e);

        if e.is_transport() {
            self.notify(
                NotificationLevel::Warning,
                format!("Unable to load {what} - working offline"),
            );
        } else {
            self.notify(NotificationLevel::Error, format!("Failed to load {what}"));
        }
    }

    fn report_write<T>(
        &self,
        result: Result<T, ClientError>,
        action: &str,
        success: impl FnOnce() -> String,
    ) -> Result<T, ClientError> {
        match &result {
            Ok(_) => self.notify(NotificationLevel::Success, success()),
            Err(e) if e.is_transport() => self.notify(
                NotificationLevel::Error,
                format!("Unable to {action} - check your internet connection"),
            ),
            Err(ClientError::Api { message, .. }) => self.notify(
                NotificationLevel::Error,
                format!("Failed to {action}: {message}"),
            ),
            Err(e) => {
                tracing::error!("Failed to {}: {}", action, e);
                self.notify(NotificationLevel::Error, format!("Failed to {action}"));
            }
        }
        result
    }

    /// All notes, most recently updated first.
    pub async fn list_notes(&self) -> Vec<Note> {
        let request = self.http.get(self.endpoint(&["api", "notes"]));

        match self.fetch::<Vec<Note>>(request).await {
            Ok(notes) => {
                self.save_snapshot(NOTES_KEY, &notes).await;
                notes
            }
            Err(e) => {
                self.report_read_failure("notes", &e);
                self.load_snapshot(NOTES_KEY).await
            }
        }
    }

    /// `None` when the server reports the note missing, or when offline and
    /// the snapshot does not contain it.
    pub async fn get_note(&self, id: i64) -> Option<Note> {
        let request = self
            .http
            .get(self.endpoint(&["api", "notes", &id.to_string()]));

        match self.fetch::<Note>(request).await {
            Ok(note) => Some(note),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => None,
            Err(e) => {
                self.report_read_failure("note", &e);
                self.load_snapshot::<Note>(NOTES_KEY)
                    .await
                    .into_iter()
                    .find(|note| note.id == id)
            }
        }
    }

    pub async fn search_notes(&self, term: &str) -> Vec<Note> {
        if term.trim().is_empty() {
            return self.list_notes().await;
        }

        let request = self
            .http
            .get(self.endpoint(&["api", "notes", "search"]))
            .query(&[("query", term)]);

        match self.fetch::<Vec<Note>>(request).await {
            Ok(notes) => notes,
            Err(e) => {
                self.report_read_failure("search results", &e);
                self.load_snapshot::<Note>(NOTES_KEY)
                    .await
                    .into_iter()
                    .filter(|note| note.matches(term))
                    .collect()
            }
        }
    }

    pub async fn list_notes_by_category(&self, category: &str) -> Vec<Note> {
        let request = self
            .http
            .get(self.endpoint(&["api", "notes", "category", category]));

        match self.fetch::<Vec<Note>>(request).await {
            Ok(notes) => notes,
            Err(e) => {
                self.report_read_failure("notes", &e);
                self.load_snapshot::<Note>(NOTES_KEY)
                    .await
                    .into_iter()
                    .filter(|note| note.category == category)
                    .collect()
            }
        }
    }

    pub async fn list_categories(&self) -> Vec<Category> {
        let request = self.http.get(self.endpoint(&["api", "categories"]));

        match self.fetch::<Vec<Category>>(request).await {
            Ok(categories) => {
                self.save_snapshot(CATEGORIES_KEY, &categories).await;
                categories
            }
            Err(e) => {
                self.report_read_failure("categories", &e);
                self.load_snapshot(CATEGORIES_KEY).await
            }
        }
    }

    /// Distinct tags across all notes, in first-seen order.
    pub async fn list_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.list_notes()
            .await
            .into_iter()
            .flat_map(|note| note.tags)
            .filter(|tag| seen.insert(tag.clone()))
            .collect()
    }

    pub async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ClientError> {
        let request = self.http.post(self.endpoint(&["api", "notes"])).json(draft);
        let result = self.fetch::<Note>(request).await;

        self.report_write(result, "create note", || {
            "Note created successfully!".to_string()
        })
    }

    pub async fn update_note(&self, id: i64, draft: &NoteDraft) -> Result<(), ClientError> {
        let body = NoteDraft {
            id: Some(id),
            ..draft.clone()
        };
        let request = self
            .http
            .put(self.endpoint(&["api", "notes", &id.to_string()]))
            .json(&body);
        let result = self.execute(request).await.map(drop);

        self.report_write(result, "save changes", || {
            "Note updated successfully!".to_string()
        })
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ClientError> {
        let request = self
            .http
            .delete(self.endpoint(&["api", "notes", &id.to_string()]));
        let result = self.execute(request).await.map(drop);

        self.report_write(result, "delete note", || {
            "Note deleted successfully!".to_string()
        })
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, ClientError> {
        let name = name.trim();
        let request = self
            .http
            .post(self.endpoint(&["api", "categories"]))
            .json(&CategoryName { id: None, name });
        let result = self.fetch::<Category>(request).await;

        self.report_write(result, "add category", || {
            format!("Category '{name}' added successfully!")
        })
    }

    pub async fn update_category(&self, id: i64, name: &str) -> Result<(), ClientError> {
        let name = name.trim();
        let request = self
            .http
            .put(self.endpoint(&["api", "categories", &id.to_string()]))
            .json(&CategoryName { id: Some(id), name });
        let result = self.execute(request).await.map(drop);

        self.report_write(result, "rename category", || {
            format!("Category renamed to '{name}'")
        })
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ClientError> {
        let request = self
            .http
            .delete(self.endpoint(&["api", "categories", &id.to_string()]));
        let result = self.execute(request).await.map(drop);

        self.report_write(result, "delete category", || {
            "Category deleted successfully!".to_string()
        })
    }
}

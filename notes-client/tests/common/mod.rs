#![allow(dead_code)]

use chrono::Utc;
use tokio::{net::TcpListener, sync::mpsc::UnboundedReceiver};

use notes_client::{LocalStorage, MemoryStorage, NOTES_KEY, Note, Notification};
use notes_server::{
    AppState, app,
    repository::{MemoryRepository, shared},
};

/// Serves a fresh in-memory notes server on an ephemeral port.
pub async fn spawn_server() -> String {
    let repo = shared(MemoryRepository::new());
    let router = app(AppState::new(&repo), &[]);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

/// Address nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{addr}")
}

pub fn note(id: i64, title: &str, content: &str, category: &str, tags: &[&str]) -> Note {
    let now = Utc::now();
    Note {
        id,
        title: title.to_string(),
        content: content.to_string(),
        category: category.to_string(),
        tags: tags.iter().map(ToString::to_string).collect(),
        is_favorite: false,
        created_at: now,
        updated_at: now,
    }
}

pub async fn storage_with_notes(notes: &[Note]) -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage
        .set_item(NOTES_KEY, serde_json::to_string(notes).unwrap())
        .await
        .unwrap();
    storage
}

pub fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut received = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        received.push(notification);
    }
    received
}

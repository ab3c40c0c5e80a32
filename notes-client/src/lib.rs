//! Client-side data access for the notes server.
//!
//! [`NoteClient`] talks to the REST API and mirrors the last successful
//! notes and categories listings into a [`LocalStorage`]. When the server is
//! unreachable, reads are answered from that snapshot; writes are never
//! queued and fail immediately. Outcomes are reported through a
//! [`Notifier`].

mod client;
mod dto;
mod error;
mod notify;
mod storage;

pub use client::NoteClient;
pub use dto::{Category, Note, NoteDraft};
pub use error::{ClientError, StorageError};
pub use notify::{ChannelNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use storage::{CATEGORIES_KEY, FileStorage, LocalStorage, MemoryStorage, NOTES_KEY};

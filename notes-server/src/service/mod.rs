mod categories;
mod notes;

pub use categories::CategoryService;
pub use notes::NoteService;

use crate::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Duplicate(name) => {
                Self::Conflict(format!("Category '{name}' already exists"))
            }
            other => Self::Repository(other),
        }
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::BadRequest(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(ServiceError::BadRequest(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

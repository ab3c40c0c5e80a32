use crate::{
    dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest},
    models::{FALLBACK_CATEGORY, MAX_CATEGORY_LEN},
    repository::SharedRepository,
};

use super::{ServiceError, check_length};

#[derive(Clone)]
pub struct CategoryService {
    repo: SharedRepository,
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Category {id} not found"))
}

fn conflict(name: &str) -> ServiceError {
    ServiceError::Conflict(format!("Category '{name}' already exists"))
}

impl CategoryService {
    pub const fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn get_all_categories(&self) -> Result<Vec<CategoryResponse>, ServiceError> {
        let categories = self.repo.lock().await.list_categories().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    pub async fn get_one_category(&self, id: i64) -> Result<CategoryResponse, ServiceError> {
        self.repo
            .lock()
            .await
            .get_category(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found(id))
    }

    /// Names are compared case-sensitively, so "work" may coexist with "Work".
    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<CategoryResponse, ServiceError> {
        let name = request.name.trim();
        check_length("Name", name, MAX_CATEGORY_LEN)?;

        let mut repo = self.repo.lock().await;
        if repo.find_category_by_name(name).await?.is_some() {
            return Err(conflict(name));
        }
        let category = repo.create_category(name.to_string()).await?;

        tracing::info!("Created category {} '{}'", category.id, category.name);

        Ok(category.into())
    }

    pub async fn update_category(
        &self,
        id: i64,
        request: UpdateCategoryRequest,
    ) -> Result<(), ServiceError> {
        if request.id.is_some_and(|body_id| body_id != id) {
            return Err(ServiceError::BadRequest(
                "Category id in body does not match the path".to_string(),
            ));
        }
        let name = request.name.trim();
        check_length("Name", name, MAX_CATEGORY_LEN)?;

        let mut repo = self.repo.lock().await;
        let existing = repo.get_category(id).await?.ok_or_else(|| not_found(id))?;

        if existing.name == name {
            return Ok(());
        }
        if existing.is_default {
            return Err(ServiceError::BadRequest(
                "Cannot rename default categories".to_string(),
            ));
        }
        if repo.find_category_by_name(name).await?.is_some() {
            return Err(conflict(name));
        }

        if repo.rename_category(id, name.to_string()).await? {
            tracing::info!("Renamed category {} from '{}' to '{}'", id, existing.name, name);
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Notes of the removed category are moved to the fallback category.
    pub async fn delete_category(&self, id: i64) -> Result<(), ServiceError> {
        let mut repo = self.repo.lock().await;
        let category = repo.get_category(id).await?.ok_or_else(|| not_found(id))?;

        if category.is_default {
            return Err(ServiceError::BadRequest(
                "Cannot delete default categories".to_string(),
            ));
        }

        let moved = repo.delete_category(&category, FALLBACK_CATEGORY).await?;

        tracing::info!(
            "Deleted category {} '{}', moved {} notes to '{}'",
            category.id,
            category.name,
            moved,
            FALLBACK_CATEGORY
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::NoteRequest,
        repository::{MemoryRepository, shared},
        service::NoteService,
    };

    fn services() -> (CategoryService, NoteService) {
        let repo = shared(MemoryRepository::new());
        (CategoryService::new(repo.clone()), NoteService::new(repo))
    }

    fn create(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
        }
    }

    fn rename(id: Option<i64>, name: &str) -> UpdateCategoryRequest {
        UpdateCategoryRequest {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn categories_are_listed_by_name() {
        let (categories, _) = services();
        categories.create_category(create("Archive")).await.unwrap();

        let names: Vec<String> = categories
            .get_all_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            ["Archive", "General", "Ideas", "Personal", "Tasks", "Work"]
        );
    }

    #[tokio::test]
    async fn create_trims_and_marks_custom() {
        let (categories, _) = services();

        let created = categories
            .create_category(create("  Recipes  "))
            .await
            .unwrap();

        assert_eq!(created.name, "Recipes");
        assert!(!created.is_default);
        assert!(created.id > 5);
    }

    #[tokio::test]
    async fn duplicate_names_conflict_only_with_same_case() {
        let (categories, _) = services();

        let err = categories.create_category(create("Work")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        assert!(categories.create_category(create("work")).await.is_ok());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (categories, _) = services();

        let err = categories.create_category(create("   ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn default_categories_are_protected() {
        let (categories, _) = services();

        for id in 1..=5 {
            let err = categories
                .update_category(id, rename(Some(id), "Renamed"))
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::BadRequest(_)));

            let err = categories.delete_category(id).await.unwrap_err();
            assert!(matches!(err, ServiceError::BadRequest(_)));
        }
    }

    #[tokio::test]
    async fn rename_checks_existence_and_uniqueness() {
        let (categories, _) = services();
        let recipes = categories.create_category(create("Recipes")).await.unwrap();

        let err = categories
            .update_category(99, rename(None, "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = categories
            .update_category(recipes.id, rename(Some(recipes.id), "Ideas"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = categories
            .update_category(recipes.id, rename(Some(1), "Cooking"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        categories
            .update_category(recipes.id, rename(Some(recipes.id), "Cooking"))
            .await
            .unwrap();
        let renamed = categories.get_one_category(recipes.id).await.unwrap();
        assert_eq!(renamed.name, "Cooking");
    }

    #[tokio::test]
    async fn delete_reassigns_notes_to_general() {
        let (categories, notes) = services();
        let projects = categories.create_category(create("Projects")).await.unwrap();
        for title in ["plan", "budget"] {
            notes
                .create_note(NoteRequest {
                    id: None,
                    title: title.to_string(),
                    content: String::new(),
                    category: "Projects".to_string(),
                    tags: Vec::new(),
                    is_favorite: false,
                })
                .await
                .unwrap();
        }

        categories.delete_category(projects.id).await.unwrap();

        let general = notes.get_notes_by_category("General").await.unwrap();
        assert_eq!(general.len(), 2);
        assert!(notes.get_notes_by_category("Projects").await.unwrap().is_empty());

        let err = categories.get_one_category(projects.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}

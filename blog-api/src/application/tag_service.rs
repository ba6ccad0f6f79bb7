use std::sync::Arc;

use tracing::info;

use crate::data::tag_repository::TagRepository;
use crate::domain::error::DomainError;
use crate::domain::tag::{CreateTagRequest, Tag, TagFilter};

pub(crate) struct TagService {
    repo: Arc<dyn TagRepository>,
}

impl TagService {
    pub(crate) fn new(repo: Arc<dyn TagRepository>) -> Self {
        Self { repo }
    }

    pub(crate) async fn list_tags(&self, name: Option<String>) -> Result<Vec<Tag>, DomainError> {
        self.repo.list_tags(&TagFilter::from_query(name)).await
    }

    /// Names are not unique; creating the same name twice yields two tags.
    pub(crate) async fn create_tag(&self, req: CreateTagRequest) -> Result<Tag, DomainError> {
        let name = req.validate()?;
        let tag = self.repo.create_tag(name).await?;
        info!(tag_id = %tag.id, name = %tag.name, "tag created");
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::TagService;
    use crate::data::tag_repository::TagRepository;
    use crate::domain::error::DomainError;
    use crate::domain::tag::{CreateTagRequest, Tag, TagFilter};

    #[derive(Clone, Default)]
    struct FakeTagRepo {
        created_name: Arc<Mutex<Option<String>>>,
        list_filter: Arc<Mutex<Option<TagFilter>>>,
    }

    #[async_trait]
    impl TagRepository for FakeTagRepo {
        async fn create_tag(&self, name: String) -> Result<Tag, DomainError> {
            *self
                .created_name
                .lock()
                .expect("created_name mutex poisoned") = Some(name.clone());
            Ok(Tag {
                id: Uuid::new_v4(),
                name,
            })
        }

        async fn list_tags(&self, filter: &TagFilter) -> Result<Vec<Tag>, DomainError> {
            *self.list_filter.lock().expect("list_filter mutex poisoned") = Some(filter.clone());
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn create_tag_stores_trimmed_name() {
        let repo = FakeTagRepo::default();
        let service = TagService::new(Arc::new(repo.clone()));

        let tag = service
            .create_tag(CreateTagRequest {
                name: Some(" rust ".to_string()),
            })
            .await
            .expect("create_tag must succeed");

        assert_eq!(tag.name, "rust");
        assert_eq!(
            repo.created_name
                .lock()
                .expect("created_name mutex poisoned")
                .as_deref(),
            Some("rust")
        );
    }

    #[tokio::test]
    async fn create_tag_rejects_blank_name_without_repo_call() {
        let repo = FakeTagRepo::default();
        let service = TagService::new(Arc::new(repo.clone()));

        let err = service
            .create_tag(CreateTagRequest {
                name: Some("   ".to_string()),
            })
            .await
            .expect_err("blank name must fail");

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(
            repo.created_name
                .lock()
                .expect("created_name mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn list_tags_drops_blank_name_filter() {
        let repo = FakeTagRepo::default();
        let service = TagService::new(Arc::new(repo.clone()));

        service
            .list_tags(Some(String::new()))
            .await
            .expect("list must succeed");

        let filter = repo
            .list_filter
            .lock()
            .expect("list_filter mutex poisoned")
            .clone()
            .expect("filter must be captured");
        assert_eq!(filter, TagFilter::default());
    }
}

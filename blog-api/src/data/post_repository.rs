use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostChanges, PostFields, PostFilter};

/// Post storage. Each write runs atomically together with the post's tag links.
#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: PostFields) -> Result<Post, DomainError>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Applies `changes` and refreshes `updated_at`. `None` when the post does not exist.
    async fn update_post(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError>;
    /// Newest first.
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError>;
}

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::tag::{Tag, TagFilter};

#[async_trait]
pub(crate) trait TagRepository: Send + Sync {
    async fn create_tag(&self, name: String) -> Result<Tag, DomainError>;
    async fn list_tags(&self, filter: &TagFilter) -> Result<Vec<Tag>, DomainError>;
}

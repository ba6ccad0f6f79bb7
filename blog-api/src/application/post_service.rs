use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostChanges, PostQuery, PostRequest};

pub(crate) struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub(crate) fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub(crate) async fn list_posts(&self, query: PostQuery) -> Result<Vec<Post>, DomainError> {
        let filter = query.into_filter()?;
        self.repo.list_posts(&filter).await
    }

    pub(crate) async fn create_post(&self, req: PostRequest) -> Result<Post, DomainError> {
        let fields = req.validate()?;
        let post = self.repo.create_post(fields).await?;
        info!(post_id = %post.id, author_id = post.author_id, "post created");
        Ok(post)
    }

    /// Full replacement. An unknown id wins over payload errors.
    pub(crate) async fn replace_post(
        &self,
        post_id: Uuid,
        req: PostRequest,
    ) -> Result<Post, DomainError> {
        self.get_post(post_id).await?;
        let changes = PostChanges::from(req.validate()?);
        self.apply(post_id, changes).await
    }

    /// Partial update: only supplied fields are validated and written.
    pub(crate) async fn patch_post(
        &self,
        post_id: Uuid,
        req: PostRequest,
    ) -> Result<Post, DomainError> {
        self.get_post(post_id).await?;
        let changes = req.validate_partial()?;
        self.apply(post_id, changes).await
    }

    pub(crate) async fn delete_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        let deleted = self.repo.delete_post(post_id).await?;
        if !deleted {
            return Err(not_found(post_id));
        }
        info!(post_id = %post_id, "post deleted");
        Ok(())
    }

    pub(crate) async fn get_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .get_post(post_id)
            .await?
            .ok_or_else(|| not_found(post_id))
    }

    async fn apply(&self, post_id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        let post = self
            .repo
            .update_post(post_id, changes)
            .await?
            .ok_or_else(|| not_found(post_id))?;
        info!(post_id = %post.id, "post updated");
        Ok(post)
    }
}

fn not_found(post_id: Uuid) -> DomainError {
    DomainError::NotFound(format!("post id: {post_id}"))
}

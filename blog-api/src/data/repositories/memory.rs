//! In-process store backing service and router tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::data::tag_repository::TagRepository;
use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::{DomainError, FieldErrors};
use crate::domain::post::{Post, PostChanges, PostFields, PostFilter, missing_object};
use crate::domain::tag::{Tag, TagFilter};
use crate::domain::user::{EMAIL_TAKEN, USERNAME_TAKEN, User};

#[derive(Default)]
struct State {
    users: Vec<User>,
    tags: Vec<Tag>,
    posts: Vec<Post>,
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub(crate) fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store mutex poisoned")
    }
}

impl State {
    fn check_references(
        &self,
        author_id: Option<i64>,
        tag_ids: Option<&[Uuid]>,
    ) -> Result<(), DomainError> {
        let mut errors = FieldErrors::new();
        if let Some(author_id) = author_id
            && !self.users.iter().any(|user| user.id == author_id)
        {
            errors.add("author", missing_object(author_id));
        }
        for tag_id in tag_ids.unwrap_or_default() {
            if !self.tags.iter().any(|tag| tag.id == *tag_id) {
                errors.add("tag", missing_object(tag_id));
            }
        }
        errors.finish(())
    }

    fn username_of(&self, author_id: i64) -> &str {
        self.users
            .iter()
            .find(|user| user.id == author_id)
            .map(|user| user.username.as_str())
            .unwrap_or_default()
    }

    fn matches(&self, post: &Post, filter: &PostFilter) -> bool {
        if filter.title.as_ref().is_some_and(|title| *title != post.title) {
            return false;
        }
        if filter.author_id.is_some_and(|id| id != post.author_id) {
            return false;
        }
        if filter.tag_id.is_some_and(|id| !post.tag_ids.contains(&id)) {
            return false;
        }
        let haystacks = [
            post.title.to_lowercase(),
            post.content.to_lowercase(),
            self.username_of(post.author_id).to_lowercase(),
        ];
        filter
            .search_terms
            .iter()
            .all(|term| haystacks.iter().any(|field| field.contains(term.as_str())))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state.users.iter().any(|user| user.username == input.username) {
            return Err(DomainError::AlreadyExists {
                field: "username",
                message: USERNAME_TAKEN,
            });
        }
        if state.users.iter().any(|user| user.email == input.email) {
            return Err(DomainError::AlreadyExists {
                field: "email",
                message: EMAIL_TAKEN,
            });
        }
        let user = User {
            id: state.users.len() as i64 + 1,
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn create_tag(&self, name: String) -> Result<Tag, DomainError> {
        let tag = Tag {
            id: Uuid::new_v4(),
            name,
        };
        self.lock().tags.push(tag.clone());
        Ok(tag)
    }

    async fn list_tags(&self, filter: &TagFilter) -> Result<Vec<Tag>, DomainError> {
        let mut tags: Vec<Tag> = self
            .lock()
            .tags
            .iter()
            .filter(|tag| filter.name.as_ref().is_none_or(|name| *name == tag.name))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(tags)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, input: PostFields) -> Result<Post, DomainError> {
        let mut state = self.lock();
        state.check_references(Some(input.author_id), Some(&input.tag_ids))?;

        // keep creation times strictly increasing so ordering is deterministic
        let now = state
            .posts
            .iter()
            .map(|post| post.created_at + Duration::microseconds(1))
            .chain(std::iter::once(Utc::now()))
            .max()
            .unwrap_or_else(Utc::now);
        let post = Post {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            author_id: input.author_id,
            tag_ids: input.tag_ids,
            created_at: now,
            updated_at: now,
        };
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.lock().posts.iter().find(|post| post.id == id).cloned())
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        state.check_references(changes.author_id, changes.tag_ids.as_deref())?;

        let Some(post) = state.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(author_id) = changes.author_id {
            post.author_id = author_id;
        }
        if let Some(tag_ids) = changes.tag_ids {
            post.tag_ids = tag_ids;
        }
        post.updated_at = Utc::now().max(post.updated_at + Duration::microseconds(1));
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.posts.len();
        state.posts.retain(|post| post.id != id);
        Ok(state.posts.len() < before)
    }

    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError> {
        let state = self.lock();
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|post| state.matches(post, filter))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }
}

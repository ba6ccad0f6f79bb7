use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{DomainError, FieldErrors, REQUIRED};
use super::fields::{optional_text, required_text};
use super::read_time::read_time;

pub(crate) const MAX_TITLE_CHARS: u64 = 200;
const EMPTY_LIST: &str = "This list may not be empty.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: i64,
    pub(crate) tag_ids: Vec<Uuid>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Post {
    pub(crate) fn read_time(&self) -> String {
        read_time(&self.content)
    }
}

/// Post payload as received: every field may be missing.
#[derive(Debug, Clone, Default)]
pub(crate) struct PostRequest {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) author: Option<i64>,
    pub(crate) tags: Option<Vec<Uuid>>,
}

/// A fully validated post; used for create and full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostFields {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: i64,
    pub(crate) tag_ids: Vec<Uuid>,
}

/// Validated partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PostChanges {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) author_id: Option<i64>,
    pub(crate) tag_ids: Option<Vec<Uuid>>,
}

impl PostRequest {
    pub(crate) fn validate(self) -> Result<PostFields, DomainError> {
        let mut errors = FieldErrors::new();

        let title = required_text(&mut errors, "title", self.title, Some(MAX_TITLE_CHARS));
        let content = required_text(&mut errors, "content", self.content, None);
        let author_id = match self.author {
            Some(author) => validated_author(&mut errors, author),
            None => {
                errors.add("author", REQUIRED);
                None
            }
        };
        let tag_ids = match self.tags {
            Some(tags) => validated_tags(&mut errors, tags),
            None => {
                errors.add("tag", REQUIRED);
                None
            }
        };

        match (title, content, author_id, tag_ids) {
            (Some(title), Some(content), Some(author_id), Some(tag_ids)) if errors.is_empty() => {
                Ok(PostFields {
                    title,
                    content,
                    author_id,
                    tag_ids,
                })
            }
            _ => Err(DomainError::Validation(errors)),
        }
    }

    pub(crate) fn validate_partial(self) -> Result<PostChanges, DomainError> {
        let mut errors = FieldErrors::new();

        let changes = PostChanges {
            title: optional_text(&mut errors, "title", self.title, Some(MAX_TITLE_CHARS)),
            content: optional_text(&mut errors, "content", self.content, None),
            author_id: self
                .author
                .and_then(|author| validated_author(&mut errors, author)),
            tag_ids: self
                .tags
                .and_then(|tags| validated_tags(&mut errors, tags)),
        };

        errors.finish(changes)
    }
}

impl From<PostFields> for PostChanges {
    fn from(fields: PostFields) -> Self {
        Self {
            title: Some(fields.title),
            content: Some(fields.content),
            author_id: Some(fields.author_id),
            tag_ids: Some(fields.tag_ids),
        }
    }
}

fn validated_author(errors: &mut FieldErrors, author: i64) -> Option<i64> {
    if author <= 0 {
        errors.add("author", missing_object(author));
        return None;
    }
    Some(author)
}

pub(crate) fn missing_object(id: impl std::fmt::Display) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

/// At least one tag; duplicates collapse in order.
fn validated_tags(errors: &mut FieldErrors, tags: Vec<Uuid>) -> Option<Vec<Uuid>> {
    if tags.is_empty() {
        errors.add("tag", EMPTY_LIST);
        return None;
    }
    Some(dedup_tags(tags))
}

fn dedup_tags(tags: Vec<Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

/// Raw list query parameters.
#[derive(Debug, Clone, Default)]
pub(crate) struct PostQuery {
    pub(crate) title: Option<String>,
    pub(crate) author: Option<String>,
    pub(crate) tag: Option<String>,
    pub(crate) search: Option<String>,
}

/// Parsed list filter. All present conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PostFilter {
    pub(crate) title: Option<String>,
    pub(crate) author_id: Option<i64>,
    pub(crate) tag_id: Option<Uuid>,
    /// Lowercased; each must be contained in the title, the content or the author's username.
    pub(crate) search_terms: Vec<String>,
}

impl PostQuery {
    pub(crate) fn into_filter(self) -> Result<PostFilter, DomainError> {
        let mut errors = FieldErrors::new();

        let author_id = non_blank(self.author).and_then(|raw| match raw.trim().parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add("author", "Enter a number.");
                None
            }
        });
        let tag_id = non_blank(self.tag).and_then(|raw| match Uuid::parse_str(raw.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add("tag", "Enter a valid UUID.");
                None
            }
        });
        let search_terms = self
            .search
            .map(|search| search_terms(&search))
            .unwrap_or_default();

        errors.finish(PostFilter {
            title: non_blank(self.title),
            author_id,
            tag_id,
            search_terms,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Splits on whitespace and commas; NUL characters are dropped.
fn search_terms(search: &str) -> Vec<String> {
    search
        .replace('\0', "")
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

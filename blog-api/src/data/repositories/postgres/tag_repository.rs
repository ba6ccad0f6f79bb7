use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::data::tag_repository::TagRepository;
use crate::domain::error::DomainError;
use crate::domain::tag::{Tag, TagFilter};

#[derive(Debug, Clone)]
pub(crate) struct PostgresTagRepository {
    pool: PgPool,
}

impl PostgresTagRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id: Uuid,
    name: String,
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn create_tag(&self, name: String) -> Result<Tag, DomainError> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO tags (id, name)
            VALUES ($1, $2)
            RETURNING id, name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_tag_db_error)?;

        Ok(row.into())
    }

    async fn list_tags(&self, filter: &TagFilter) -> Result<Vec<Tag>, DomainError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, name
            FROM tags
            WHERE ($1::text IS NULL OR name = $1)
            ORDER BY name, id
            "#,
        )
        .bind(filter.name.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(map_tag_db_error)?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

fn map_tag_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Unexpected(err.to_string())
}

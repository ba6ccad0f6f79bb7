use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::domain::error::{DomainError, FieldErrors};
use crate::domain::post::{Post, PostChanges, PostFields, PostFilter, missing_object};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    author_id: i64,
    tag_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const SELECT_POSTS: &str = r#"
    SELECT
        p.id,
        p.title,
        p.content,
        p.author_id,
        COALESCE(
            ARRAY_AGG(pt.tag_id ORDER BY pt.tag_id) FILTER (WHERE pt.tag_id IS NOT NULL),
            '{}'
        ) AS tag_ids,
        p.created_at,
        p.updated_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN post_tags pt ON pt.post_id = p.id
"#;

/// Unset filters bind NULL. Each search pattern must match the title,
/// the content or the author's username.
const LIST_FILTERS: &str = r#"
    WHERE ($1::text IS NULL OR p.title = $1)
      AND ($2::bigint IS NULL OR p.author_id = $2)
      AND ($3::uuid IS NULL OR EXISTS (
          SELECT 1 FROM post_tags f WHERE f.post_id = p.id AND f.tag_id = $3
      ))
      AND NOT EXISTS (
          SELECT 1
          FROM UNNEST($4::text[]) AS term(pattern)
          WHERE NOT (
              p.title ILIKE term.pattern
              OR p.content ILIKE term.pattern
              OR u.username ILIKE term.pattern
          )
      )
    GROUP BY p.id
    ORDER BY p.created_at DESC, p.id DESC
"#;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: PostFields) -> Result<Post, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_post_db_error)?;

        check_references(&mut tx, Some(input.author_id), Some(&input.tag_ids)).await?;

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, title, content)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(input.author_id)
        .bind(&input.title)
        .bind(&input.content)
        .execute(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        link_tags(&mut tx, id, &input.tag_ids).await?;

        let row = fetch_post(&mut tx, id)
            .await?
            .ok_or_else(|| DomainError::Unexpected(format!("post {id} vanished after insert")))?;
        tx.commit().await.map_err(map_post_db_error)?;

        Ok(row.into())
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(map_post_db_error)?;
        Ok(fetch_post(&mut conn, id).await?.map(Post::from))
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_post_db_error)?;

        check_references(&mut tx, changes.author_id, changes.tag_ids.as_deref()).await?;

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                author_id = COALESCE($4, author_id),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.author_id)
        .execute(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(tag_ids) = changes.tag_ids {
            sqlx::query(
                r#"
                DELETE FROM post_tags
                WHERE post_id = $1
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_post_db_error)?;

            link_tags(&mut tx, id, &tag_ids).await?;
        }

        let row = fetch_post(&mut tx, id).await?;
        tx.commit().await.map_err(map_post_db_error)?;

        Ok(row.map(Post::from))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError> {
        let sql = format!("{SELECT_POSTS}{LIST_FILTERS}");
        let patterns: Vec<String> = filter
            .search_terms
            .iter()
            .map(|term| like_pattern(term))
            .collect();

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(filter.title.as_deref())
            .bind(filter.author_id)
            .bind(filter.tag_id)
            .bind(patterns)
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author_id: row.author_id,
            tag_ids: row.tag_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

async fn fetch_post(conn: &mut PgConnection, id: Uuid) -> Result<Option<PostRow>, DomainError> {
    let sql = format!("{SELECT_POSTS} WHERE p.id = $1 GROUP BY p.id");
    sqlx::query_as::<_, PostRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(map_post_db_error)
}

/// Reports every unknown author or tag id as a field error.
async fn check_references(
    conn: &mut PgConnection,
    author_id: Option<i64>,
    tag_ids: Option<&[Uuid]>,
) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();

    if let Some(author_id) = author_id {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(author_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(map_post_db_error)?;
        if !exists {
            errors.add("author", missing_object(author_id));
        }
    }

    if let Some(tag_ids) = tag_ids.filter(|ids| !ids.is_empty()) {
        let found: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(tag_ids)
            .fetch_all(&mut *conn)
            .await
            .map_err(map_post_db_error)?;
        for tag_id in tag_ids.iter().filter(|id| !found.contains(id)) {
            errors.add("tag", missing_object(tag_id));
        }
    }

    errors.finish(())
}

async fn link_tags(
    conn: &mut PgConnection,
    post_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), DomainError> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        r#"
        INSERT INTO post_tags (post_id, tag_id)
        SELECT $1, UNNEST($2::uuid[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(tag_ids)
    .execute(conn)
    .await
    .map_err(map_post_db_error)?;
    Ok(())
}

fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let field = match db_err.constraint() {
            Some("post_tags_tag_id_fkey") => "tag",
            _ => "author",
        };
        return DomainError::Validation(FieldErrors::single(field, "Object does not exist."));
    }
    DomainError::Unexpected(err.to_string())
}

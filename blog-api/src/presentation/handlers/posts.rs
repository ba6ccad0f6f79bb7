use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::post::{Post, PostQuery, PostRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::{AppError, AppResult, ErrorBody};

/// Body of POST, PUT and PATCH. `null` reads the same as an absent field.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct PostPayloadDto {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    /// Author user id.
    pub(crate) author: Option<i64>,
    /// Tag ids, at least one; required except on PATCH. `tags` is accepted too.
    #[serde(alias = "tags")]
    pub(crate) tag: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct PostListQuery {
    pub(crate) title: Option<String>,
    pub(crate) author: Option<String>,
    pub(crate) tag: Option<String>,
    pub(crate) search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author: i64,
    pub(crate) tag: Vec<Uuid>,
    #[schema(example = "1 min read")]
    pub(crate) readtime: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) update_at: DateTime<Utc>,
}

impl From<PostPayloadDto> for PostRequest {
    fn from(dto: PostPayloadDto) -> Self {
        Self {
            title: dto.title,
            content: dto.content,
            author: dto.author,
            tags: dto.tag,
        }
    }
}

impl From<PostListQuery> for PostQuery {
    fn from(query: PostListQuery) -> Self {
        Self {
            title: query.title,
            author: query.author,
            tag: query.tag,
            search: query.search,
        }
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            readtime: post.read_time(),
            id: post.id,
            title: post.title,
            content: post.content,
            author: post.author_id,
            tag: post.tag_ids,
            created_at: post.created_at,
            update_at: post.updated_at,
        }
    }
}

/// Non-UUID ids are reported like an unmatched route.
fn post_id(path: Result<Path<Uuid>, PathRejection>) -> AppResult<Uuid> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

/// An unknown id takes precedence over an unreadable body.
async fn payload_for(
    state: &AppState,
    id: Uuid,
    payload: Result<Json<PostPayloadDto>, JsonRejection>,
) -> AppResult<PostRequest> {
    match payload {
        Ok(Json(dto)) => Ok(dto.into()),
        Err(rejection) => {
            state.post_service.get_post(id).await?;
            Err(rejection.into())
        }
    }
}

#[utoipa::path(
    get,
    path = "/post",
    tag = "posts",
    params(
        ("title" = Option<String>, Query, description = "Exact title"),
        ("author" = Option<i64>, Query, description = "Author user id"),
        ("tag" = Option<Uuid>, Query, description = "Tag id"),
        ("search" = Option<String>, Query, description = "Terms separated by spaces or commas; all must match title, content or author username")
    ),
    responses(
        (status = 200, description = "Posts listed, newest first", body = [PostDto]),
        (status = 400, description = "Malformed author or tag", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<PostListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<PostDto>>> {
    let Query(query) = query?;
    let posts = state.post_service.list_posts(query.into()).await?;

    Ok(Json(posts.into_iter().map(PostDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/post",
    tag = "posts",
    request_body = PostPayloadDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<PostPayloadDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let Json(dto) = payload?;
    let post = state.post_service.create_post(dto.into()).await?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

#[utoipa::path(
    put,
    path = "/post/{id}",
    tag = "posts",
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    request_body = PostPayloadDto,
    responses(
        (status = 200, description = "Post replaced", body = PostDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn replace_post(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<PostPayloadDto>, JsonRejection>,
) -> AppResult<Json<PostDto>> {
    let id = post_id(path)?;
    let req = payload_for(&state, id, payload).await?;
    let post = state.post_service.replace_post(id, req).await?;

    Ok(Json(post.into()))
}

#[utoipa::path(
    patch,
    path = "/post/{id}",
    tag = "posts",
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    request_body = PostPayloadDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn patch_post(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<PostPayloadDto>, JsonRejection>,
) -> AppResult<Json<PostDto>> {
    let id = post_id(path)?;
    let req = payload_for(&state, id, payload).await?;
    let post = state.post_service.patch_post(id, req).await?;

    Ok(Json(post.into()))
}

#[utoipa::path(
    delete,
    path = "/post/{id}",
    tag = "posts",
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = post_id(path)?;
    state.post_service.delete_post(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

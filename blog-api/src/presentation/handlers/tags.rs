use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::tag::{CreateTagRequest, Tag};
use crate::presentation::AppState;
use crate::presentation::app_error::{AppResult, ErrorBody};

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateTagDto {
    pub(crate) name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct TagListQuery {
    pub(crate) name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TagDto {
    pub(crate) id: Uuid,
    pub(crate) name: String,
}

impl From<Tag> for TagDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

#[utoipa::path(
    get,
    path = "/tag",
    tag = "tags",
    params(
        ("name" = Option<String>, Query, description = "Exact tag name")
    ),
    responses(
        (status = 200, description = "Tags listed", body = [TagDto]),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn list_tags(
    State(state): State<AppState>,
    query: Result<Query<TagListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<TagDto>>> {
    let Query(query) = query?;
    let tags = state.tag_service.list_tags(query.name).await?;

    Ok(Json(tags.into_iter().map(TagDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/tag",
    tag = "tags",
    request_body = CreateTagDto,
    responses(
        (status = 201, description = "Tag created", body = TagDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn create_tag(
    State(state): State<AppState>,
    payload: Result<Json<CreateTagDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<TagDto>)> {
    let Json(dto) = payload?;
    let tag = state
        .tag_service
        .create_tag(CreateTagRequest { name: dto.name })
        .await?;

    Ok((StatusCode::CREATED, Json(tag.into())))
}

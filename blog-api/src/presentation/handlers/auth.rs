use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::auth_service::SignupResult;
use crate::domain::user::{SignupRequest, User};
use crate::presentation::AppState;
use crate::presentation::app_error::{AppResult, ErrorBody};

pub(crate) const SIGNUP_MESSAGE: &str = "User created successfully";

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct SignupDto {
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TokensDto {
    pub(crate) refresh: String,
    pub(crate) access: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct SignupResponseDto {
    pub(crate) user: UserDto,
    pub(crate) tokens: TokensDto,
    pub(crate) message: String,
}

impl From<SignupDto> for SignupRequest {
    fn from(dto: SignupDto) -> Self {
        Self {
            username: dto.username,
            password: dto.password,
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

impl From<SignupResult> for SignupResponseDto {
    fn from(result: SignupResult) -> Self {
        Self {
            user: result.user.into(),
            tokens: TokensDto {
                refresh: result.tokens.refresh,
                access: result.tokens.access,
            },
            message: SIGNUP_MESSAGE.to_string(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/signup",
    tag = "auth",
    request_body = SignupDto,
    responses(
        (status = 201, description = "User created", body = SignupResponseDto),
        (status = 400, description = "Validation error, weak password or taken username/email", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SignupResponseDto>)> {
    let Json(dto) = payload?;
    let result = state.auth_service.signup(dto.into()).await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

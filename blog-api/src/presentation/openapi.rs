use utoipa::OpenApi;

use crate::presentation::app_error::ErrorBody;
use crate::presentation::handlers::auth::{SignupDto, SignupResponseDto, TokensDto, UserDto};
use crate::presentation::handlers::posts::{PostDto, PostListQuery, PostPayloadDto};
use crate::presentation::handlers::tags::{CreateTagDto, TagDto, TagListQuery};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::signup,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::replace_post,
        crate::presentation::handlers::posts::patch_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::tags::list_tags,
        crate::presentation::handlers::tags::create_tag
    ),
    components(
        schemas(
            SignupDto,
            SignupResponseDto,
            UserDto,
            TokensDto,
            PostPayloadDto,
            PostListQuery,
            PostDto,
            CreateTagDto,
            TagListQuery,
            TagDto,
            ErrorBody
        )
    ),
    tags(
        (name = "auth", description = "Signup endpoint"),
        (name = "posts", description = "Post endpoints"),
        (name = "tags", description = "Tag endpoints")
    )
)]
pub(crate) struct ApiDoc;

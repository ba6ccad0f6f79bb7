use axum::Router;
use axum::routing::{get, put};

use crate::presentation::AppState;
use crate::presentation::handlers::posts::{
    create_post, delete_post, list_posts, patch_post, replace_post,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/post", get(list_posts).post(create_post))
        .route(
            "/post/{id}",
            put(replace_post).patch(patch_post).delete(delete_post),
        )
}

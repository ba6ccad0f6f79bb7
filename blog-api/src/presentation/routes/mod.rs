use axum::Router;

use super::AppState;

pub(crate) mod auth;
pub(crate) mod posts;
pub(crate) mod tags;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(posts::router())
        .merge(tags::router())
}

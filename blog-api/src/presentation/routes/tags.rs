use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::handlers::tags::{create_tag, list_tags};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/tag", get(list_tags).post(create_tag))
}

use axum::{Router, routing::post};

use crate::presentation::AppState;
use crate::presentation::handlers::auth::signup;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}

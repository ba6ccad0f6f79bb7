use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::post_service::PostService;
use crate::application::tag_service::TagService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService>,
    pub(crate) post_service: Arc<PostService>,
    pub(crate) tag_service: Arc<TagService>,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<AuthService>,
        post_service: Arc<PostService>,
        tag_service: Arc<TagService>,
    ) -> Self {
        Self {
            auth_service,
            post_service,
            tag_service,
        }
    }
}

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::post_service::PostService;
use application::tag_service::TagService;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::tag_repository::PostgresTagRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let jwt = JwtService::new(
        &settings.jwt_secret,
        settings.jwt_access_ttl_seconds,
        settings.jwt_refresh_ttl_seconds,
    );

    let auth_service = Arc::new(AuthService::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        jwt,
        settings.password_policy.clone(),
    ));
    let post_service = Arc::new(PostService::new(Arc::new(PostgresPostRepository::new(
        pool.clone(),
    ))));
    let tag_service = Arc::new(TagService::new(Arc::new(PostgresTagRepository::new(pool))));

    let state = AppState::new(auth_service, post_service, tag_service);

    info!("starting blog-api");
    server::run_http(&settings, state).await
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::account_service::AccountService;
use application::comment_service::CommentService;
use application::disaster_service::DisasterService;
use data::repositories::postgres::comment_repository::PostgresCommentRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use data::sources::reliefweb::ReliefWebSource;
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

    let pool = create_pool(&settings.database_url).await?;
    run_migrations(&pool).await?;

    let jwt = Arc::new(JwtService::new(
        &settings.jwt_secret,
        settings.jwt_ttl_seconds,
    ));

    let account_service = AccountService::new(
        PostgresUserRepository::new(pool.clone()),
        PostgresCommentRepository::new(pool.clone()),
        jwt.clone(),
    );
    let comment_service = CommentService::new(PostgresCommentRepository::new(pool.clone()));

    let source = ReliefWebSource::new(
        settings.reliefweb_base_url.clone(),
        settings.reliefweb_appname.clone(),
        Duration::from_secs(settings.reliefweb_timeout_secs),
    )
    .context("failed to build ReliefWeb client")?;
    let disaster_service = DisasterService::new(source, settings.stats_window_size);

    let state = AppState::new(
        pool,
        Arc::new(account_service),
        Arc::new(comment_service),
        Arc::new(disaster_service),
        jwt,
    );

    info!(
        reliefweb = %settings.reliefweb_base_url,
        window = settings.stats_window_size,
        "services initialized"
    );

    server::run_http(&settings, state).await
}

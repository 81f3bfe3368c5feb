use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::services::token_cache::TokenCache;
use crate::infra::channel_manager::{guesty_client::GuestyClient, oauth_token_client::OAuthTokenClient};
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_task_repo::PostgresTaskRepo,
    postgres_template_repo::PostgresTemplateRepo, postgres_rule_repo::PostgresRuleRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_task_repo::SqliteTaskRepo,
    sqlite_template_repo::SqliteTemplateRepo, sqlite_rule_repo::SqliteRuleRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let token_source = Arc::new(OAuthTokenClient::new(&config.channel_manager));
    let token_cache = Arc::new(
        TokenCache::new(token_source)
            .with_safety_margin(chrono::Duration::seconds(config.channel_manager.token_safety_margin_secs))
    );
    let channel_manager = Arc::new(GuestyClient::new(config.channel_manager.api_url.clone(), token_cache.clone()));

    if !config.channel_manager.is_configured() {
        info!("Channel manager credentials not set; booking sync is disabled");
    }

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            task_repo: Arc::new(PostgresTaskRepo::new(pool.clone())),
            template_repo: Arc::new(PostgresTemplateRepo::new(pool.clone())),
            rule_repo: Arc::new(PostgresRuleRepo::new(pool.clone())),
            token_cache,
            channel_manager,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            task_repo: Arc::new(SqliteTaskRepo::new(pool.clone())),
            template_repo: Arc::new(SqliteTemplateRepo::new(pool.clone())),
            rule_repo: Arc::new(SqliteRuleRepo::new(pool.clone())),
            token_cache,
            channel_manager,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

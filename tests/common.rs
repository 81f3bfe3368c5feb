use villa_ops::{
    api::router::create_router,
    state::AppState,
    config::{Config, ChannelManagerConfig},
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_task_repo::SqliteTaskRepo,
        sqlite_template_repo::SqliteTemplateRepo,
        sqlite_rule_repo::SqliteRuleRepo,
    },
    domain::models::booking::{Booking, NewBookingParams},
    domain::models::token::IssuedToken,
    domain::ports::{ChannelManager, TokenSource},
    domain::services::token_cache::TokenCache,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub struct StaticTokenSource;

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn fetch_token(&self) -> Result<IssuedToken, AppError> {
        Ok(IssuedToken { access_token: "static-token".to_string(), expires_in: 86400 })
    }
}

/// Channel manager returning a fixed reservation list, or failing when `fail` is set.
#[derive(Default)]
pub struct MockChannelManager {
    pub reservations: Mutex<Vec<Booking>>,
    pub fail: bool,
}

#[async_trait]
impl ChannelManager for MockChannelManager {
    async fn fetch_reservations(&self, checkout_from: NaiveDate, checkout_to: NaiveDate) -> Result<Vec<Booking>, AppError> {
        if self.fail {
            return Err(AppError::Upstream("503 Service Unavailable".to_string()));
        }
        Ok(self.reservations.lock().unwrap().iter()
            .filter(|b| b.check_out >= checkout_from && b.check_out <= checkout_to)
            .cloned()
            .collect())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub channel_manager: Arc<MockChannelManager>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::build(MockChannelManager::default(), false).await
    }

    /// App whose channel manager counts as configured and serves `channel_manager`.
    pub async fn with_channel_manager(channel_manager: MockChannelManager) -> Self {
        Self::build(channel_manager, true).await
    }

    async fn build(channel_manager: MockChannelManager, configured: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            admin_api_token: ADMIN_TOKEN.to_string(),
            property_timezone: chrono_tz::UTC,
            task_generation_interval_secs: 900,
            task_generation_batch_size: 50,
            booking_sync_horizon_days: 60,
            log_dir: "./logs".to_string(),
            channel_manager: ChannelManagerConfig {
                token_url: "http://localhost/oauth2/token".to_string(),
                api_url: "http://localhost/v1".to_string(),
                client_id: configured.then(|| "test-client".to_string()),
                client_secret: configured.then(|| "test-secret".to_string()),
                username: None,
                password: None,
                scope: "open-api".to_string(),
                token_safety_margin_secs: 60,
            },
        };

        let channel_manager = Arc::new(channel_manager);
        let state = Arc::new(AppState {
            config,
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            task_repo: Arc::new(SqliteTaskRepo::new(pool.clone())),
            template_repo: Arc::new(SqliteTemplateRepo::new(pool.clone())),
            rule_repo: Arc::new(SqliteRuleRepo::new(pool.clone())),
            token_cache: Arc::new(TokenCache::new(Arc::new(StaticTokenSource))),
            channel_manager: channel_manager.clone(),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            channel_manager,
        }
    }

    /// Sends an admin-authenticated request with an optional JSON body.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN));

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn seed_booking(&self, id: &str, listing_id: &str, check_in: NaiveDate, check_out: NaiveDate, status: &str) -> Booking {
        let booking = Booking::new(NewBookingParams {
            id: id.to_string(),
            listing_id: listing_id.to_string(),
            guest_name: Some("Test Guest".to_string()),
            check_in,
            check_out,
            status: status.to_string(),
            source: "test".to_string(),
        });
        self.state.booking_repo.upsert(&booking).await.expect("Failed to seed booking")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[allow(dead_code)]
pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

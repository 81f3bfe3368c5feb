use std::collections::HashMap;
use std::env;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

#[derive(Clone)]
pub struct ChannelManagerConfig {
    pub token_url: String,
    pub api_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub scope: String,
    pub token_safety_margin_secs: i64,
}

impl ChannelManagerConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && (self.client_secret.is_some() || self.password.is_some())
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub admin_api_token: String,
    pub property_timezone: Tz,
    pub task_generation_interval_secs: u64,
    pub task_generation_batch_size: i64,
    pub booking_sync_horizon_days: i64,
    /// Directory for the daily rolling JSON log file.
    pub log_dir: String,
    pub channel_manager: ChannelManagerConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(&env::vars().collect())
    }

    /// Builds the config from a variable map. Panics on missing or malformed
    /// required values, so a misconfigured process dies at startup.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let var = |key: &str| vars.get(key).cloned();
        let optional = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        Self {
            database_url: var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: var("PORT").unwrap_or_else(|| "3000".to_string()).parse().expect("PORT must be a number"),
            admin_api_token: var("ADMIN_API_TOKEN").expect("ADMIN_API_TOKEN must be set"),
            property_timezone: var("PROPERTY_TIMEZONE")
                .unwrap_or_else(|| "UTC".to_string())
                .parse()
                .expect("PROPERTY_TIMEZONE must be an IANA time zone name"),
            task_generation_interval_secs: var("TASK_GENERATION_INTERVAL_SECS")
                .unwrap_or_else(|| "900".to_string())
                .parse()
                .expect("TASK_GENERATION_INTERVAL_SECS must be a number"),
            task_generation_batch_size: var("TASK_GENERATION_BATCH_SIZE")
                .unwrap_or_else(|| "50".to_string())
                .parse()
                .expect("TASK_GENERATION_BATCH_SIZE must be a number"),
            booking_sync_horizon_days: var("BOOKING_SYNC_HORIZON_DAYS")
                .unwrap_or_else(|| "60".to_string())
                .parse()
                .expect("BOOKING_SYNC_HORIZON_DAYS must be a number"),
            log_dir: var("LOG_DIR").unwrap_or_else(|| "./logs".to_string()),
            channel_manager: ChannelManagerConfig {
                token_url: var("GUESTY_TOKEN_URL").unwrap_or_else(|| "https://open-api.guesty.com/oauth2/token".to_string()),
                api_url: var("GUESTY_API_URL").unwrap_or_else(|| "https://open-api.guesty.com/v1".to_string()),
                client_id: optional("GUESTY_CLIENT_ID"),
                client_secret: optional("GUESTY_CLIENT_SECRET"),
                username: optional("GUESTY_USERNAME"),
                password: optional("GUESTY_PASSWORD"),
                scope: var("GUESTY_SCOPE").unwrap_or_else(|| "open-api".to_string()),
                token_safety_margin_secs: var("TOKEN_SAFETY_MARGIN_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse()
                    .expect("TOKEN_SAFETY_MARGIN_SECS must be a number"),
            },
        }
    }

    /// Calendar date at the properties, which is what checkout dates are expressed in.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.property_timezone).date_naive()
    }
}

use std::sync::Arc;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use crate::domain::{models::token::Token, ports::TokenSource};
use crate::error::AppError;

pub const DEFAULT_SAFETY_MARGIN_SECS: i64 = 60;

/// In-memory bearer token cache in front of a [`TokenSource`].
///
/// The exchange runs outside the lock, so two callers that both see an
/// expired token may both refresh. Last write wins; both tokens are valid.
pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    safety_margin: Duration,
    current: RwLock<Option<Token>>,
}

impl TokenCache {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            safety_margin: Duration::seconds(DEFAULT_SAFETY_MARGIN_SECS),
            current: RwLock::new(None),
        }
    }

    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }

    /// Returns the cached token while it is valid, otherwise refreshes.
    pub async fn get_token(&self) -> Result<String, AppError> {
        let now = Utc::now();
        if let Some(token) = self.current.read().await.as_ref()
            && token.is_valid_at(now)
        {
            debug!("Token cache hit, expires at {}", token.expires_at);
            return Ok(token.value.clone());
        }

        let token = self.refresh().await?;
        Ok(token.value)
    }

    /// Exchanges credentials now and replaces the cached token.
    pub async fn refresh(&self) -> Result<Token, AppError> {
        let issued = self.source.fetch_token().await.map_err(|e| {
            warn!("Token refresh failed: {}", e);
            e
        })?;

        if issued.access_token.trim().is_empty() {
            return Err(AppError::Authentication("token endpoint returned an empty access_token".to_string()));
        }

        let expires_at = Duration::try_seconds(issued.expires_in)
            .filter(|ttl| *ttl >= Duration::zero())
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .and_then(|at| at.checked_sub_signed(self.safety_margin))
            .ok_or_else(|| AppError::Authentication(format!("token endpoint returned malformed expires_in {}", issued.expires_in)))?;

        let token = Token { value: issued.access_token, expires_at };

        info!("Obtained new channel manager token, valid until {}", token.expires_at);
        *self.current.write().await = Some(token.clone());
        Ok(token)
    }

    pub async fn invalidate(&self) {
        *self.current.write().await = None;
    }

    pub async fn current(&self) -> Option<Token> {
        self.current.read().await.clone()
    }

    /// Seeds the cache with a known token.
    pub async fn store(&self, token: Token) {
        *self.current.write().await = Some(token);
    }
}

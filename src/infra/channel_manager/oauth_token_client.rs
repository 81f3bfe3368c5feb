use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info, instrument};
use crate::config::ChannelManagerConfig;
use crate::domain::models::token::IssuedToken;
use crate::domain::ports::TokenSource;
use crate::error::AppError;

/// Credential exchange against an OAuth2 token endpoint.
pub struct OAuthTokenClient {
    client: Client,
    token_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    username: Option<String>,
    password: Option<String>,
    scope: String,
}

impl OAuthTokenClient {
    pub fn new(config: &ChannelManagerConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            scope: config.scope.clone(),
        }
    }

    /// Password grant when a username and password are configured, client credentials otherwise.
    fn grant_form(&self) -> Result<Vec<(&'static str, String)>, AppError> {
        let client_id = self.client_id.clone()
            .ok_or(AppError::Configuration("GUESTY_CLIENT_ID is not set".into()))?;

        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            let mut form = vec![
                ("grant_type", "password".to_string()),
                ("client_id", client_id),
                ("username", username.clone()),
                ("password", password.clone()),
                ("scope", self.scope.clone()),
            ];
            if let Some(secret) = &self.client_secret {
                form.push(("client_secret", secret.clone()));
            }
            return Ok(form);
        }

        let client_secret = self.client_secret.clone()
            .ok_or(AppError::Configuration("GUESTY_CLIENT_SECRET is not set".into()))?;

        Ok(vec![
            ("grant_type", "client_credentials".to_string()),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", self.scope.clone()),
        ])
    }
}

#[async_trait]
impl TokenSource for OAuthTokenClient {
    #[instrument(skip(self), fields(token_url = %self.token_url))]
    async fn fetch_token(&self) -> Result<IssuedToken, AppError> {
        let form = self.grant_form()?;

        let res = self.client.post(&self.token_url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("token endpoint unreachable: {}", e);
                error!("{}", msg);
                AppError::Authentication(msg)
            })?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();

        if !status.is_success() {
            let msg = format!("token endpoint returned {}: {}", status, body);
            error!("{}", msg);
            return Err(AppError::Authentication(msg));
        }

        let issued: IssuedToken = serde_json::from_str(&body).map_err(|e| {
            let msg = format!("malformed token response: {}", e);
            error!("{}", msg);
            AppError::Authentication(msg)
        })?;

        info!("Token exchange succeeded, expires in {}s", issued.expires_in);
        Ok(issued)
    }
}

pub mod guesty_client;
pub mod oauth_token_client;

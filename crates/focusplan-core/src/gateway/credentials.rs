//! Credential capability for calendar gateways.
//!
//! The scheduler never reaches into ambient storage; whoever invokes it
//! supplies a provider that can hand out a bearer token and, when a
//! refresh token is available, exchange it for a fresh one.

use std::sync::Mutex;

use reqwest::Client;

use crate::error::GatewayError;

/// Google OAuth2 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Supplier of bearer credentials for gateway calls.
pub trait CredentialProvider: Send + Sync {
    /// Current access token, assumed valid until the provider hears otherwise.
    fn access_token(&self) -> Result<String, GatewayError>;

    /// Exchange the refresh token for a new access token. Fails when no
    /// refresh token was supplied or the grant is rejected.
    fn refresh_access_token(&self) -> Result<String, GatewayError>;
}

/// Tokens handed in by the caller for a single scheduling run.
///
/// A successful refresh is cached for the rest of the run so every
/// subsequent gateway call picks up the new token.
pub struct StaticCredentials {
    access_token: String,
    refresh_token: Option<String>,
    client_id: String,
    client_secret: String,
    token_url: String,
    refreshed: Mutex<Option<String>>,
}

impl StaticCredentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            client_id: String::new(),
            client_secret: String::new(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            refreshed: Mutex::new(None),
        }
    }

    /// Enable refresh-on-expiry with the given refresh token and OAuth client.
    pub fn with_refresh(
        mut self,
        refresh_token: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self
    }

    /// Override the token endpoint (tests).
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }
}

impl CredentialProvider for StaticCredentials {
    fn access_token(&self) -> Result<String, GatewayError> {
        if let Ok(guard) = self.refreshed.lock() {
            if let Some(token) = guard.as_ref() {
                return Ok(token.clone());
            }
        }
        Ok(self.access_token.clone())
    }

    fn refresh_access_token(&self) -> Result<String, GatewayError> {
        let refresh = self.refresh_token.as_deref().ok_or_else(|| {
            GatewayError::TokenRefresh("no refresh token available".to_string())
        })?;

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh),
            ("grant_type", "refresh_token"),
        ];

        let body: serde_json::Value = tokio::runtime::Handle::current()
            .block_on(async {
                Client::new()
                    .post(&self.token_url)
                    .form(&params)
                    .send()
                    .await?
                    .json()
                    .await
            })
            .map_err(|e: reqwest::Error| GatewayError::TokenRefresh(e.to_string()))?;

        if let Some(error) = body.get("error") {
            return Err(GatewayError::TokenRefresh(error.to_string()));
        }

        let token = body["access_token"]
            .as_str()
            .ok_or_else(|| {
                GatewayError::TokenRefresh("missing access_token in response".to_string())
            })?
            .to_string();

        if let Ok(mut guard) = self.refreshed.lock() {
            *guard = Some(token.clone());
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_returns_initial_token() {
        let creds = StaticCredentials::new("tok-1");
        assert_eq!(creds.access_token().unwrap(), "tok-1");
    }

    #[test]
    fn test_refresh_without_refresh_token_fails() {
        let creds = StaticCredentials::new("tok-1");
        assert!(matches!(
            creds.refresh_access_token(),
            Err(GatewayError::TokenRefresh(_))
        ));
    }

    #[test]
    fn test_refresh_grant_and_caching() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "tok-2", "expires_in": 3599}"#)
            .expect(1)
            .create();

        let creds = StaticCredentials::new("tok-1")
            .with_refresh("refresh-1", "client", "secret")
            .with_token_url(format!("{}/token", server.url()));

        assert_eq!(creds.refresh_access_token().unwrap(), "tok-2");
        // Cached for the rest of the run.
        assert_eq!(creds.access_token().unwrap(), "tok-2");
        mock.assert();
    }

    #[test]
    fn test_refresh_error_response() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let mut server = mockito::Server::new();
        server
            .mock("POST", "/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create();

        let creds = StaticCredentials::new("tok-1")
            .with_refresh("refresh-1", "client", "secret")
            .with_token_url(format!("{}/token", server.url()));

        assert!(matches!(
            creds.refresh_access_token(),
            Err(GatewayError::TokenRefresh(_))
        ));
    }
}

//! OAuth2 client-credentials authentication against the ORCID registry.
//!
//! The [`Authenticator`] owns the token lifecycle: it performs the exchange
//! lazily on first use, caches the resulting [`AuthToken`] for the lifetime
//! of the client, and exposes the validity check. There is no automatic
//! mid-session refresh; long-running applications decide for themselves when
//! to rebuild the client.

use std::time::{Duration, Instant};

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tokio::sync::OnceCell;
use url::Url;

use crate::config::{EndpointConfig, api};
use crate::error::{Error, Result};

/// Wire shape of the token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    scope: Option<String>,
}

/// A bearer token obtained from the ORCID OAuth endpoint.
///
/// Read-only after acquisition; expiry is fixed at issuance as
/// issuance time + `expires_in` seconds.
#[derive(Clone)]
pub struct AuthToken {
    access_token: String,
    token_type: String,
    refresh_token: Option<String>,
    scope: Option<String>,
    issued_at: Instant,
    expires_in: Duration,
}

impl AuthToken {
    /// Wrap a token obtained out of band, valid for `expires_in` from now.
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            refresh_token: None,
            scope: Some(api::READ_PUBLIC_SCOPE.to_string()),
            issued_at: Instant::now(),
            expires_in,
        }
    }

    /// A missing `expires_in` leaves the token immediately stale.
    fn from_response(response: TokenResponse, issued_at: Instant) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response.refresh_token,
            scope: response.scope,
            issued_at,
            expires_in: Duration::from_secs(response.expires_in.unwrap_or(0)),
        }
    }

    /// The opaque credential attached to Authorization headers.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Token type reported by the endpoint, normally `bearer`.
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Refresh token, when the endpoint issued one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Granted scope, when the endpoint reported one.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Check validity against an arbitrary clock reading.
    #[must_use]
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.issued_at) < self.expires_in
    }

    /// Check if the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self.is_valid_at(Instant::now())
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Performs the OAuth2 client-credentials exchange and caches the result.
pub struct Authenticator {
    http: ClientWithMiddleware,
    token_url: Url,
    client_id: String,
    client_secret: String,
    token: OnceCell<AuthToken>,
}

impl Authenticator {
    /// Create an authenticator that will exchange the configured credentials
    /// on first use.
    #[must_use]
    pub fn new(config: &EndpointConfig, http: ClientWithMiddleware) -> Self {
        Self {
            http,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: OnceCell::new(),
        }
    }

    /// Create an authenticator preloaded with a token obtained out of band.
    /// No network exchange will be performed.
    #[must_use]
    pub fn with_token(config: &EndpointConfig, http: ClientWithMiddleware, token: AuthToken) -> Self {
        Self {
            http,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: OnceCell::new_with(Some(token)),
        }
    }

    /// Exchange client credentials for a bearer token.
    ///
    /// Posts the form-encoded grant to the token endpoint, requesting the
    /// narrowest read-only scope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] when the endpoint is
    /// unreachable, returns a non-2xx status, or responds with a body that
    /// is not a valid token document.
    pub async fn authenticate(&self) -> Result<AuthToken> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", api::READ_PUBLIC_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::authentication_with("token endpoint unreachable", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::authentication(format!("token endpoint returned status {status}")));
        }

        let issued_at = Instant::now();
        let body = response
            .text()
            .await
            .map_err(|e| Error::authentication_with("failed to read token response", e))?;
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::authentication_with("malformed token response", e))?;

        tracing::debug!(
            token_type = %parsed.token_type,
            expires_in = ?parsed.expires_in,
            "obtained access token"
        );

        Ok(AuthToken::from_response(parsed, issued_at))
    }

    /// The cached token, performing the exchange on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] if the first-use exchange
    /// fails; subsequent calls retry the exchange until one succeeds.
    pub async fn token(&self) -> Result<&AuthToken> {
        self.token.get_or_try_init(|| self.authenticate()).await
    }

    /// Whether a token has been acquired and has not yet expired.
    #[must_use]
    pub fn has_valid_token(&self) -> bool {
        self.token.get().is_some_and(|token| !token.is_expired())
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("has_valid_token", &self.has_valid_token())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_response(expires_in: Option<u64>) -> TokenResponse {
        TokenResponse {
            access_token: "89f0181c-168b-4d7d-831c-1fdda2d7bbbb".to_string(),
            token_type: "bearer".to_string(),
            refresh_token: None,
            expires_in,
            scope: Some("/read-public".to_string()),
        }
    }

    #[test]
    fn test_token_valid_within_expiry_window() {
        let issued_at = Instant::now();
        let token = AuthToken::from_response(token_response(Some(3599)), issued_at);

        assert!(token.is_valid_at(issued_at));
        assert!(token.is_valid_at(issued_at + Duration::from_secs(3598)));
        assert!(!token.is_valid_at(issued_at + Duration::from_secs(3599)));
        assert!(!token.is_valid_at(issued_at + Duration::from_secs(7200)));
    }

    #[test]
    fn test_missing_expires_in_is_immediately_stale() {
        let issued_at = Instant::now();
        let token = AuthToken::from_response(token_response(None), issued_at);

        assert!(!token.is_valid_at(issued_at));
        assert!(token.is_expired());
    }

    #[test]
    fn test_token_response_optional_fields() {
        let json = r#"{"access_token": "abc", "token_type": "bearer"}"#;
        let parsed: TokenResponse = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.access_token, "abc");
        assert!(parsed.refresh_token.is_none());
        assert!(parsed.expires_in.is_none());
        assert!(parsed.scope.is_none());
    }

    #[test]
    fn test_token_response_missing_access_token_fails() {
        let json = r#"{"token_type": "bearer", "expires_in": 3599}"#;
        assert!(serde_json::from_str::<TokenResponse>(json).is_err());
    }

    #[test]
    fn test_debug_hides_access_token() {
        let token = AuthToken::new("super-secret-token", Duration::from_secs(60));
        let debug = format!("{token:?}");

        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("token_type"));
    }
}

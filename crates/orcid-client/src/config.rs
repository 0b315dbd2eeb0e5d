//! Configuration for the ORCID API client.

use std::time::Duration;

use url::Url;

use crate::error::Result;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the production ORCID registry.
    pub const PRODUCTION_URL: &str = "https://orcid.org/";

    /// Base URL for the ORCID sandbox registry.
    pub const SANDBOX_URL: &str = "https://sandbox.orcid.org/";

    /// Public API version used when none is given.
    pub const DEFAULT_API_VERSION: &str = "v3.0";

    /// ORCID's custom JSON media type, sent as the Accept header.
    pub const JSON_MEDIA_TYPE: &str = "application/vnd.orcid+json";

    /// ORCID's custom XML media type. The registry serves it, but this
    /// client only decodes the JSON representation.
    pub const XML_MEDIA_TYPE: &str = "application/vnd.orcid+xml";

    /// OAuth scope granting read access to public profile data.
    pub const READ_PUBLIC_SCOPE: &str = "/read-public";

    /// Token endpoint path, relative to the registry base URL.
    pub const TOKEN_PATH: &str = "oauth/token";

    /// Searching by name returns matching iDs only, not profile data, so
    /// every hit costs one extra round trip for the detail fetch. This cap
    /// bounds that cost.
    pub const MAX_RECOMMENDED_RESULTS: usize = 15;

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Resolved endpoint configuration.
///
/// Immutable after construction; one instance configures one
/// [`OrcidClient`](crate::OrcidClient) for its lifetime.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Public API base URL, e.g. `https://pub.sandbox.orcid.org/v3.0/`.
    /// Derived from the registry base URL; API paths are joined onto it.
    pub public_api_url: Url,

    /// OAuth token endpoint, e.g. `https://sandbox.orcid.org/oauth/token`.
    pub token_url: Url,

    /// OAuth client id.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: String,

    /// Upper bound on detail fetches per name search.
    pub max_results: usize,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl EndpointConfig {
    /// Create a configuration for a registry base URL with the default API
    /// version and result cap.
    ///
    /// The public API URL is derived by prefixing the host with `pub.` and
    /// appending the version segment. No network calls are made.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if the base
    /// URL is malformed.
    pub fn new(
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Self::with_version(
            base_url,
            client_id,
            client_secret,
            api::DEFAULT_API_VERSION,
            api::MAX_RECOMMENDED_RESULTS,
        )
    }

    /// Create a configuration with an explicit API version and result cap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if the base
    /// URL is malformed.
    pub fn with_version(
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_version: &str,
        max_results: usize,
    ) -> Result<Self> {
        let base = Url::parse(base_url)?;
        let public_api_url = derive_public_api_url(&base, api_version)?;
        let token_url = base.join(api::TOKEN_PATH)?;

        Ok(Self {
            public_api_url,
            token_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            max_results,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
        })
    }

    /// Configuration for the production registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if URL
    /// derivation fails.
    pub fn production(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Self::new(api::PRODUCTION_URL, client_id, client_secret)
    }

    /// Configuration for the sandbox registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if URL
    /// derivation fails.
    pub fn sandbox(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Self::new(api::SANDBOX_URL, client_id, client_secret)
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `ORCID_CLIENT_ID` and `ORCID_CLIENT_SECRET`, plus an optional
    /// `ORCID_BASE_URL` defaulting to the sandbox registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is unset or the base URL is
    /// malformed.
    pub fn from_env() -> anyhow::Result<Self> {
        use anyhow::Context as _;

        let client_id = std::env::var("ORCID_CLIENT_ID").context("ORCID_CLIENT_ID is not set")?;
        let client_secret =
            std::env::var("ORCID_CLIENT_SECRET").context("ORCID_CLIENT_SECRET is not set")?;
        let base_url =
            std::env::var("ORCID_BASE_URL").unwrap_or_else(|_| api::SANDBOX_URL.to_string());

        Ok(Self::new(&base_url, client_id, client_secret)?)
    }

    /// Create a test configuration pointed at a mock server.
    ///
    /// Both the API and token URLs target the given base verbatim (no `pub.`
    /// host prefixing), with short timeouts.
    ///
    /// # Panics
    ///
    /// Panics if `base_url` is not a valid URL.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        let base = Url::parse(base_url).expect("valid mock server URL");
        let public_api_url = base
            .join(&format!("{}/", api::DEFAULT_API_VERSION))
            .expect("valid mock API URL");
        let token_url = base.join(api::TOKEN_PATH).expect("valid mock token URL");

        Self {
            public_api_url,
            token_url,
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            max_results: api::MAX_RECOMMENDED_RESULTS,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Override the result cap, keeping everything else.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Derive the public API base URL: same scheme, `pub.`-prefixed host, version
/// segment appended to the path.
fn derive_public_api_url(base: &Url, api_version: &str) -> Result<Url> {
    let mut public = base.clone();
    if let Some(host) = base.host_str() {
        if !host.starts_with("pub.") {
            public.set_host(Some(&format!("pub.{host}")))?;
        }
    }
    Ok(public.join(&format!("{api_version}/"))?)
}

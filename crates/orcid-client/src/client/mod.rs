//! ORCID public API client.
//!
//! Provides an async HTTP client with:
//! - Connection pooling via reqwest
//! - Transport-level retry middleware with exponential backoff
//! - Lazy OAuth2 client-credentials authentication
//!
//! Every request follows the same pipeline: build request, attach bearer and
//! accept headers, send, check status, read body, decode, attach the iD when
//! the payload does not echo it. The first failing stage short-circuits the
//! rest; a single-record fetch never returns a partial result.

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;

use crate::auth::{AuthToken, Authenticator};
use crate::config::{EndpointConfig, api};
use crate::error::{Error, Result};
use crate::models::{ExpandedSearchHit, Person, SearchHit};

/// Person lookup operations offered by the client.
///
/// A seam for substituting the real client in embedding applications and
/// tests.
#[async_trait::async_trait]
pub trait PersonRetrieval: Send + Sync {
    /// Fetch a single person by ORCID iD.
    async fn find_person_by_orcid(&self, orcid: &str) -> Result<Person>;

    /// Search by name and fetch full profiles for the capped hit list.
    async fn find_people_by_name(
        &self,
        name: &str,
        preferred_count: usize,
    ) -> Result<Vec<Person>>;

    /// Search by name via the expanded endpoint, one call regardless of hit
    /// count.
    async fn find_people_by_name_fast(&self, name: &str) -> Result<Vec<Person>>;
}

/// Client for the ORCID public API.
pub struct OrcidClient {
    /// HTTP client with middleware.
    http: ClientWithMiddleware,

    /// Token lifecycle owner.
    auth: Authenticator,

    /// Resolved endpoint configuration.
    config: EndpointConfig,
}

impl OrcidClient {
    /// Create a new client with the given configuration.
    ///
    /// The OAuth exchange happens lazily on the first request, not here.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: EndpointConfig) -> anyhow::Result<Self> {
        let http = build_http_client(&config)?;
        let auth = Authenticator::new(&config, http.clone());
        Ok(Self { http, auth, config })
    }

    /// Create a client around a token obtained out of band; no credential
    /// exchange will be performed.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn with_token(config: EndpointConfig, token: AuthToken) -> anyhow::Result<Self> {
        let http = build_http_client(&config)?;
        let auth = Authenticator::with_token(&config, http.clone(), token);
        Ok(Self { http, auth, config })
    }

    /// The authenticator owning this client's token lifecycle. Callers with
    /// long-running sessions can check token validity here; the client does
    /// not refresh mid-session.
    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Fetch a single person by ORCID iD.
    ///
    /// The detail payload does not echo the iD back, so it is stamped onto
    /// the decoded record from the request argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetrievalFailed`] on non-2xx status or transport
    /// failure, [`Error::DeserializationFailed`] on an undecodable payload.
    pub async fn find_person_by_orcid(&self, orcid: &str) -> Result<Person> {
        let body = self.get_body(&format!("{orcid}/person"), &[]).await?;
        Person::from_profile_document(&body, orcid)
    }

    /// Search for people by name, then fetch the full profile for each hit.
    ///
    /// Two phases: the `search` endpoint returns identifier-only hits, then
    /// details are fetched sequentially, in result order, for the first
    /// `min(hits, preferred_count, max_results)` of them. A failure on any
    /// detail fetch aborts the whole operation; detail fetches are expensive
    /// and the cap exists to bound that cost, so there is no per-item
    /// retry/skip logic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetrievalFailed`] or
    /// [`Error::DeserializationFailed`] from either phase.
    pub async fn find_people_by_name(
        &self,
        name: &str,
        preferred_count: usize,
    ) -> Result<Vec<Person>> {
        let hits: Vec<SearchHit> =
            self.search_request_and_parse("search", &[("q", name)], "result").await?;

        let fetch_count = hits.len().min(preferred_count).min(self.config.max_results);
        tracing::debug!(hits = hits.len(), fetch_count, "fetching details for search hits");

        let mut people = Vec::with_capacity(fetch_count);
        for hit in hits.iter().take(fetch_count) {
            people.push(self.find_person_by_orcid(&hit.orcid_identifier.path).await?);
        }
        Ok(people)
    }

    /// Search for people by name using the expanded search, which avoids the
    /// per-hit detail fetch but has API version restrictions.
    ///
    /// WARNING: the `expanded-search` endpoint is only available on ORCID
    /// API v3.0, and this restriction is not enforced here. Against an
    /// incompatible endpoint configuration the provider's non-conforming
    /// response surfaces as an ordinary retrieval or deserialization
    /// failure. Use [`find_people_by_name`](Self::find_people_by_name) for a
    /// version-portable search.
    ///
    /// Results carry no biography and are not capped; the endpoint costs one
    /// call regardless of hit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetrievalFailed`] on non-2xx status or transport
    /// failure, [`Error::DeserializationFailed`] on an undecodable payload.
    pub async fn find_people_by_name_fast(&self, name: &str) -> Result<Vec<Person>> {
        let hits: Vec<ExpandedSearchHit> = self
            .search_request_and_parse("expanded-search", &[("q", name)], "expanded-result")
            .await?;
        Ok(hits.into_iter().map(ExpandedSearchHit::into_person).collect())
    }

    /// GET a relative path and decode a named top-level array field.
    ///
    /// The shared primitive under both search strategies. An explicit JSON
    /// null or an entirely absent field decodes as an empty list. Elements
    /// that fail to decode into `T` are skipped rather than aborting the
    /// batch; this permissive policy applies only here, the single-object
    /// decode path stays strict.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetrievalFailed`] on non-2xx status or transport
    /// failure, [`Error::DeserializationFailed`] when the document is
    /// unparsable or the field holds something other than a list.
    pub async fn search_request_and_parse<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        list_field: &str,
    ) -> Result<Vec<T>> {
        let body = self.get_body(path, query).await?;
        let doc: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| Error::deserialization_with("search response is not valid JSON", e))?;

        let items = match doc.get(list_field) {
            None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
            Some(serde_json::Value::Array(items)) => items,
            Some(_) => {
                return Err(Error::deserialization(format!(
                    "search response field `{list_field}` is not a list"
                )));
            }
        };

        let mut results = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value(item.clone()) {
                Ok(parsed) => results.push(parsed),
                Err(err) => {
                    tracing::debug!(%err, "skipping search result that failed to decode");
                }
            }
        }
        Ok(results)
    }

    /// GET a path relative to the public API base URL with bearer auth,
    /// returning the raw response body.
    async fn get_body(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let token = self.auth.token().await?;
        let url = self.config.public_api_url.join(path)?;
        tracing::debug!(url = %url, "dispatching ORCID API request");

        let mut request = self.http.get(url).bearer_auth(token.access_token());
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::retrieval_with("request to the ORCID API failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::retrieval(format!("ORCID API returned status {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| Error::retrieval_with("failed to read response body", e))
    }
}

#[async_trait::async_trait]
impl PersonRetrieval for OrcidClient {
    async fn find_person_by_orcid(&self, orcid: &str) -> Result<Person> {
        Self::find_person_by_orcid(self, orcid).await
    }

    async fn find_people_by_name(
        &self,
        name: &str,
        preferred_count: usize,
    ) -> Result<Vec<Person>> {
        Self::find_people_by_name(self, name, preferred_count).await
    }

    async fn find_people_by_name_fast(&self, name: &str) -> Result<Vec<Person>> {
        Self::find_people_by_name_fast(self, name).await
    }
}

impl std::fmt::Debug for OrcidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrcidClient")
            .field("public_api_url", &self.config.public_api_url.as_str())
            .field("max_results", &self.config.max_results)
            .finish()
    }
}

/// Build the shared HTTP collaborator: pooled reqwest client with the ORCID
/// accept header installed and transient-failure retries at the transport
/// level.
fn build_http_client(config: &EndpointConfig) -> anyhow::Result<ClientWithMiddleware> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(reqwest::header::ACCEPT, api::JSON_MEDIA_TYPE.parse()?);

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(500), Duration::from_secs(8))
        .build_with_max_retries(2);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

//! Error types for the ORCID client.
//!
//! Uses `thiserror` for structured error handling. Every public operation
//! maps underlying transport and parse failures into one of the kinds below
//! at the point of first detection; nothing is retried at this layer.

/// Boxed cause attached to an error kind.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the ORCID client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Token endpoint unreachable, non-2xx, or unparsable token response.
    #[error("failed to authenticate with the ORCID API: {message}")]
    AuthenticationFailed {
        /// What went wrong during the credential exchange.
        message: String,
        /// Underlying transport or parse failure, when one exists.
        #[source]
        source: Option<BoxError>,
    },

    /// An API call returned a non-2xx status, or the transport layer failed.
    #[error("failed to retrieve person: {message}")]
    RetrievalFailed {
        /// What went wrong during the request.
        message: String,
        /// Underlying transport failure, when one exists.
        #[source]
        source: Option<BoxError>,
    },

    /// Response body is not valid JSON, or a required field is missing.
    #[error("failed to deserialize person: {message}")]
    DeserializationFailed {
        /// What part of the payload could not be decoded.
        message: String,
        /// Underlying parse failure, when one exists.
        #[source]
        source: Option<BoxError>,
    },

    /// Malformed base URL supplied at configuration time.
    #[error("invalid ORCID URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Create an authentication failure.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed { message: message.into(), source: None }
    }

    /// Create an authentication failure wrapping its cause.
    #[must_use]
    pub fn authentication_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::AuthenticationFailed { message: message.into(), source: Some(source.into()) }
    }

    /// Create a retrieval failure.
    #[must_use]
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::RetrievalFailed { message: message.into(), source: None }
    }

    /// Create a retrieval failure wrapping its cause.
    #[must_use]
    pub fn retrieval_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::RetrievalFailed { message: message.into(), source: Some(source.into()) }
    }

    /// Create a deserialization failure.
    #[must_use]
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::DeserializationFailed { message: message.into(), source: None }
    }

    /// Create a deserialization failure wrapping its cause.
    #[must_use]
    pub fn deserialization_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::DeserializationFailed { message: message.into(), source: Some(source.into()) }
    }

    /// Returns true for transport/status failures, the transient kind a
    /// calling application may choose to retry.
    #[must_use]
    pub const fn is_retrieval(&self) -> bool {
        matches!(self, Self::RetrievalFailed { .. })
    }

    /// Returns true for permanent data-shape failures.
    #[must_use]
    pub const fn is_deserialization(&self) -> bool {
        matches!(self, Self::DeserializationFailed { .. })
    }

    /// Returns true for credential-exchange failures.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_predicates() {
        assert!(Error::retrieval("status 500").is_retrieval());
        assert!(Error::deserialization("bad payload").is_deserialization());
        assert!(Error::authentication("status 401").is_authentication());

        assert!(!Error::retrieval("status 500").is_deserialization());
        assert!(!Error::deserialization("bad payload").is_authentication());
    }

    #[test]
    fn test_error_carries_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = Error::deserialization_with("person payload is not valid JSON", cause);

        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("failed to deserialize person"));
    }

    #[test]
    fn test_invalid_url_from_parse_error() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}

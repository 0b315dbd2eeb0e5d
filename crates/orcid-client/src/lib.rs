//! ORCID public API client.
//!
//! Looks up researcher profiles on the [ORCID](https://orcid.org) registry:
//! authenticate once with OAuth2 client credentials, then fetch a profile by
//! iD or search by name.
//!
//! # Features
//!
//! - **Async-first**: built on Tokio; every request is a single suspend point
//! - **Two search strategies**: identifier search with a capped detail
//!   fan-out, or the one-call expanded search (v3.0 only)
//! - **Explicit error taxonomy**: authentication, retrieval and
//!   deserialization failures stay distinguishable
//!
//! # Example
//!
//! ```no_run
//! use orcid_client::{EndpointConfig, OrcidClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EndpointConfig::sandbox("client-id", "client-secret")?;
//!     let client = OrcidClient::new(config)?;
//!
//!     let person = client.find_person_by_orcid("0000-0002-7614-2895").await?;
//!     println!("{person}");
//!
//!     for person in client.find_people_by_name("carberry", 5).await? {
//!         println!("{}", person.display_name());
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use auth::{AuthToken, Authenticator};
pub use client::{OrcidClient, PersonRetrieval};
pub use config::EndpointConfig;
pub use error::{Error, Result};
pub use models::Person;

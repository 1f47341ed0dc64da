#![deny(missing_docs)]
//! Minimal async client for the PasswordState passwords API.
//!
//! Looks up password records by ID with `GET {api_url}/{id}`, authenticating
//! with the `APIKey` header. Passwords come back as
//! [`SecretValue`](passwordstate_secret::SecretValue)s.
//!
//! The client adds nothing on top of the HTTP call: no retry, no pagination,
//! no rate-limit handling.

mod client;
mod error;
mod types;

pub use client::{Client, ClientBuilder, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use types::PasswordRecord;

use async_trait::async_trait;

/// Look up password records by password ID.
///
/// [`Client`] is the real implementation; the seam exists so callers can be
/// exercised against canned records.
#[async_trait]
pub trait PasswordLookup: Send + Sync {
    /// Fetch every record matching `password_id`.
    async fn get_password(&self, password_id: i64) -> Result<Vec<PasswordRecord>, ClientError>;
}

#[async_trait]
impl PasswordLookup for Client {
    async fn get_password(&self, password_id: i64) -> Result<Vec<PasswordRecord>, ClientError> {
        Client::get_password(self, password_id).await
    }
}

//! PasswordState API client struct and builder.

use std::time::Duration;

use passwordstate_secret::SecretValue;
use reqwest::header::{ACCEPT, HeaderValue};

use crate::error::{ClientError, map_http_status, map_reqwest_error};
use crate::types::{PasswordBody, PasswordRecord};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the API key on every request.
const API_KEY_HEADER: &str = "APIKey";

/// Client for the PasswordState passwords API.
///
/// Cheap to share: reads only borrow it, so one instance serves every
/// concurrent lookup of a session.
///
/// # Example
///
/// ```no_run
/// use passwordstate_client::Client;
///
/// # async fn run() -> Result<(), passwordstate_client::ClientError> {
/// let client = Client::new("https://passwordstate.local/api/passwords", "a0000aaa000aa000")?;
/// let records = client.get_password(42).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    /// Passwords endpoint, without a trailing slash.
    pub(crate) api_url: String,
    pub(crate) api_key: SecretValue,
    pub(crate) timeout: Duration,
    pub(crate) http: reqwest::Client,
}

/// Builder for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    api_url: String,
    api_key: SecretValue,
    timeout: Duration,
}

impl ClientBuilder {
    /// Override the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the URL and key and build the client.
    pub fn build(self) -> Result<Client, ClientError> {
        let api_url = normalize_url(&self.api_url)?;

        if self.api_key.is_empty() {
            return Err(ClientError::InvalidApiKey("API key is empty".into()));
        }
        self.api_key.with_str(|key| {
            HeaderValue::from_str(key)
                .map(|_| ())
                .map_err(|_| invalid_key_characters())
        })?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::Transport(Box::new(e)))?;

        Ok(Client {
            api_url,
            api_key: self.api_key,
            timeout: self.timeout,
            http,
        })
    }
}

impl Client {
    /// Create a client with the default timeout.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<SecretValue>,
    ) -> Result<Self, ClientError> {
        Self::builder(api_url, api_key).build()
    }

    /// Start building a client.
    pub fn builder(api_url: impl Into<String>, api_key: impl Into<SecretValue>) -> ClientBuilder {
        ClientBuilder {
            api_url: api_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The passwords endpoint this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Build the lookup URL for one password ID.
    pub(crate) fn password_url(&self, password_id: i64) -> String {
        format!("{}/{}", self.api_url, password_id)
    }

    /// Fetch every record matching `password_id`.
    ///
    /// PasswordState answers with an array; it usually holds one record but
    /// may be empty. No retry is attempted.
    pub async fn get_password(
        &self,
        password_id: i64,
    ) -> Result<Vec<PasswordRecord>, ClientError> {
        let url = self.password_url(password_id);

        let mut key = self
            .api_key
            .with_str(|key| HeaderValue::from_str(key).map_err(|_| invalid_key_characters()))?;
        key.set_sensitive(true);

        tracing::debug!(url = %url, "sending password request to PasswordState");

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        if !status.is_success() {
            return Err(map_http_status(status, &body));
        }

        let records = serde_json::from_str::<PasswordBody>(&body)
            .map_err(|e| ClientError::Decode(e.to_string()))?
            .into_records();

        tracing::debug!(url = %url, count = records.len(), "received password records");

        Ok(records)
    }
}

fn invalid_key_characters() -> ClientError {
    ClientError::InvalidApiKey("API key contains invalid characters".into())
}

fn normalize_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme `{other}`"))),
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".into()));
    }
    Ok(trimmed.to_string())
}

//! The per-session client slot shared between the provider and its data sources.

use std::fmt;
use std::sync::{Arc, OnceLock};

use passwordstate_client::PasswordLookup;

/// Set-once holder for the session client.
///
/// The provider fills it in `configure`; every data source holds a clone and
/// reads it. After the first `set` the client never changes.
#[derive(Clone, Default)]
pub struct SessionClient {
    inner: Arc<OnceLock<Arc<dyn PasswordLookup>>>,
}

/// Returned by [`SessionClient::set`] when the session already has a client.
#[derive(Debug, thiserror::Error)]
#[error("the PasswordState client is already configured for this session")]
pub struct AlreadyConfigured;

impl SessionClient {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the session client.
    pub fn set(&self, client: Arc<dyn PasswordLookup>) -> Result<(), AlreadyConfigured> {
        self.inner.set(client).map_err(|_| AlreadyConfigured)
    }

    /// The session client, once configured.
    pub fn get(&self) -> Option<Arc<dyn PasswordLookup>> {
        self.inner.get().cloned()
    }

    /// Whether `configure` has run.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("configured", &self.is_configured())
            .finish()
    }
}

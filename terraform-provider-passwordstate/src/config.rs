//! Provider configuration: declared values, environment fallback, client construction.
//!
//! Resolution runs in three passes and each pass reports every failing
//! attribute before stopping:
//!
//! 1. unknown declared values are rejected (no fallback is attempted);
//! 2. null declared values fall back to `PASSWORDSTATE_APIURL` /
//!    `PASSWORDSTATE_APIKEY`, and values still empty are rejected;
//! 3. the client is built.

use std::fmt;

use passwordstate_client::{Client, ClientError};
use passwordstate_secret::{REDACTED, SecretValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tf_provider::value::{Value, ValueString};

/// Environment variable backing `api_url`.
pub const API_URL_ENV: &str = "PASSWORDSTATE_APIURL";

/// Environment variable backing `api_key`.
pub const API_KEY_ENV: &str = "PASSWORDSTATE_APIKEY";

/// The provider block as declared in Terraform.
#[derive(Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    /// PasswordState passwords endpoint.
    pub api_url: ValueString<'a>,
    /// PasswordState API key.
    pub api_key: ValueString<'a>,
}

impl fmt::Debug for ProviderConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = match &self.api_key {
            Value::Value(_) => REDACTED,
            Value::Null => "null",
            Value::Unknown => "unknown",
        };
        f.debug_struct("ProviderConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &api_key)
            .finish()
    }
}

/// A provider attribute that takes part in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    /// `api_url`
    ApiUrl,
    /// `api_key`
    ApiKey,
}

impl ConfigField {
    /// Attribute name in the provider block.
    pub fn attribute(self) -> &'static str {
        match self {
            ConfigField::ApiUrl => "api_url",
            ConfigField::ApiKey => "api_key",
        }
    }

    /// Environment variable consulted when the attribute is null.
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigField::ApiUrl => API_URL_ENV,
            ConfigField::ApiKey => API_KEY_ENV,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConfigField::ApiUrl => "API URL",
            ConfigField::ApiKey => "API Key",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A configuration failure. `Display` is the diagnostic summary.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The declared value depends on something not yet applied.
    #[error("Unknown PasswordState {0}")]
    Unknown(ConfigField),

    /// Neither the attribute nor its environment variable holds a value.
    #[error("Missing PasswordState {0}")]
    Missing(ConfigField),

    /// The client rejected the resolved settings.
    #[error("Unable to Create PasswordState API Client")]
    Client(#[source] ClientError),
}

impl ConfigError {
    /// The attribute this error is attached to, if any.
    pub fn field(&self) -> Option<ConfigField> {
        match self {
            ConfigError::Unknown(field) | ConfigError::Missing(field) => Some(*field),
            ConfigError::Client(_) => None,
        }
    }

    /// Long-form diagnostic detail.
    pub fn detail(&self) -> String {
        match self {
            ConfigError::Unknown(field) => format!(
                "The provider cannot create the PasswordState API client as there is an unknown \
                 configuration value for the PasswordState {field}. Either target apply the source \
                 of the value first, set the value statically in the configuration, or use the {} \
                 environment variable.",
                field.env_var()
            ),
            ConfigError::Missing(field) => format!(
                "The provider cannot create the PasswordState API client as there is a missing or \
                 empty value for the PasswordState {field}. Set the {} value in the configuration \
                 or use the {} environment variable. If either is already set, ensure the value \
                 is not empty.",
                field.attribute(),
                field.env_var()
            ),
            ConfigError::Client(err) => format!(
                "An unexpected error occurred when creating the PasswordState API client. If the \
                 error is not clear, please contact the provider developers.\n\n\
                 PasswordState Client Error: {err}"
            ),
        }
    }
}

/// Settings after environment fallback. The key stays redacted.
#[derive(Debug)]
pub struct Settings {
    /// Passwords endpoint.
    pub api_url: String,
    /// API key.
    pub api_key: SecretValue,
}

/// Read a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolve declared values against the environment.
///
/// `env` looks up an environment variable by name; pass [`process_env`]
/// outside of tests.
pub fn resolve_settings<F>(
    config: &ProviderConfig<'_>,
    env: F,
) -> Result<Settings, Vec<ConfigError>>
where
    F: Fn(&str) -> Option<String>,
{
    let declared = [
        (ConfigField::ApiUrl, &config.api_url),
        (ConfigField::ApiKey, &config.api_key),
    ];

    let unknown: Vec<ConfigError> = declared
        .iter()
        .filter(|(_, value)| matches!(value, Value::Unknown))
        .map(|(field, _)| ConfigError::Unknown(*field))
        .collect();
    if !unknown.is_empty() {
        return Err(unknown);
    }

    let [api_url, api_key] = declared.map(|(field, value)| {
        let resolved = match value {
            Value::Value(v) => v.to_string(),
            _ => env(field.env_var()).unwrap_or_default(),
        };
        (field, resolved)
    });

    let missing: Vec<ConfigError> = [&api_url, &api_key]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| ConfigError::Missing(*field))
        .collect();
    if !missing.is_empty() {
        return Err(missing);
    }

    Ok(Settings {
        api_url: api_url.1,
        api_key: SecretValue::new(api_key.1),
    })
}

/// Build the session client from resolved settings.
pub fn build_client(settings: Settings) -> Result<Client, ConfigError> {
    tracing::info!(
        passwordstate_api_url = %settings.api_url,
        passwordstate_api_key = ?settings.api_key,
        "Starting: Configure PasswordState client"
    );

    let client = Client::new(settings.api_url, settings.api_key).map_err(ConfigError::Client)?;

    tracing::info!(
        passwordstate_api_url = %client.api_url(),
        success = true,
        "Completed: Configure PasswordState client"
    );
    Ok(client)
}

/// Resolve the configuration and build the client in one go.
pub fn resolve<F>(config: &ProviderConfig<'_>, env: F) -> Result<Client, Vec<ConfigError>>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = resolve_settings(config, env)?;
    build_client(settings).map_err(|err| vec![err])
}

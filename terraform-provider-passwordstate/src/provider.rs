use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::ValueEmpty;
use tf_provider::{AttributePath, Diagnostics, DynamicDataSource, DynamicResource, Provider, map};

use crate::config::{self, ConfigError, ProviderConfig};
use crate::data_source::PasswordDataSource;
use crate::session::SessionClient;

/// Name under which the provider is served; data sources are prefixed with it.
pub const PROVIDER_NAME: &str = "passwordstate";

/// The PasswordState provider.
///
/// Owns the session client slot filled by `configure` and handed to every
/// data source it creates.
#[derive(Debug, Default, Clone)]
pub struct PasswordStateProvider {
    client: SessionClient,
}

impl PasswordStateProvider {
    /// Create an unconfigured provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// The session client slot.
    pub fn session(&self) -> &SessionClient {
        &self.client
    }
}

fn report(diags: &mut Diagnostics, err: &ConfigError) {
    if let Some(field) = err.field() {
        diags.error(
            err.to_string(),
            err.detail(),
            AttributePath::new(field.attribute()),
        );
    } else {
        diags.root_error(err.to_string(), err.detail());
    }
}

#[async_trait]
impl Provider for PasswordStateProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain("Read passwords from PasswordState."),
                attributes: map! {
                    "api_url" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "The PasswordState API URL; for example: \
                             https://passwordstate.domain.com/api/passwords",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "api_key" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "The PasswordState API Key; for example: \
                             a0000aaa000aa000a0000a0a0a0a0a0a",
                        ),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(
        &self,
        _diags: &mut Diagnostics,
        _config: Self::Config<'a>,
    ) -> Option<()> {
        Some(())
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        tracing::debug!(
            terraform_version = %terraform_version,
            config = ?config,
            "configuring provider"
        );

        let client = match config::resolve(&config, config::process_env) {
            Ok(client) => client,
            Err(errors) => {
                for err in &errors {
                    tracing::error!(error = %err, "provider configuration failed");
                    report(diags, err);
                }
                return None;
            }
        };

        if let Err(err) = self.client.set(Arc::new(client)) {
            diags.root_error(
                "PasswordState Client Already Configured",
                format!("{err}. Please report this issue to the provider developers."),
            );
            return None;
        }
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        Some(map! {})
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(map! {
            "password" => PasswordDataSource::new(self.client.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use tf_provider::value::{Value, ValueString};

    use super::*;

    fn declared(url: &str, key: &str) -> ProviderConfig<'static> {
        let set = |v: &str| -> ValueString<'static> { Value::Value(v.to_string().into()) };
        ProviderConfig {
            api_url: set(url),
            api_key: set(key),
        }
    }

    fn summaries(diags: &Diagnostics) -> Vec<&str> {
        diags.errors.iter().map(|d| d.summary.as_ref()).collect()
    }

    #[test]
    fn schema_marks_api_key_sensitive() {
        let provider = PasswordStateProvider::new();
        let mut diags = Diagnostics::default();
        let schema = provider.schema(&mut diags).unwrap();
        let attributes = &schema.block.attributes;

        assert!(matches!(
            attributes["api_url"].constraint,
            AttributeConstraint::Optional
        ));
        assert!(!attributes["api_url"].sensitive);
        assert!(matches!(
            attributes["api_key"].constraint,
            AttributeConstraint::Optional
        ));
        assert!(attributes["api_key"].sensitive);
    }

    #[test]
    fn registers_password_data_source_only() {
        let provider = PasswordStateProvider::new();
        let mut diags = Diagnostics::default();
        let data_sources = provider.get_data_sources(&mut diags).unwrap();
        assert_eq!(data_sources.len(), 1);
        assert!(data_sources.contains_key("password"));
        assert!(provider.get_resources(&mut diags).unwrap().is_empty());
    }

    #[test]
    fn data_sources_share_the_provider_session() {
        let provider = PasswordStateProvider::new();
        let copy = provider.clone();
        assert!(!copy.session().is_configured());
        let client = passwordstate_client::Client::new("https://ps.local/api/passwords", "key")
            .unwrap();
        provider.session().set(Arc::new(client)).unwrap();
        assert!(copy.session().is_configured());
    }

    #[tokio::test]
    async fn configure_reports_both_missing_fields() {
        let provider = PasswordStateProvider::new();
        let mut diags = Diagnostics::default();
        let outcome =
            Provider::configure(&provider, &mut diags, "1.9.0".into(), declared("", "")).await;

        assert!(outcome.is_none());
        assert_eq!(
            summaries(&diags),
            ["Missing PasswordState API URL", "Missing PasswordState API Key"]
        );
        assert_eq!(diags.errors[0].attribute, AttributePath::new("api_url"));
        assert_eq!(diags.errors[1].attribute, AttributePath::new("api_key"));
        assert!(!provider.session().is_configured());
    }

    #[tokio::test]
    async fn configure_rejects_unknown_key() {
        let provider = PasswordStateProvider::new();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            api_key: Value::Unknown,
            ..declared("https://ps.local/api/passwords", "")
        };
        let outcome = Provider::configure(&provider, &mut diags, "1.9.0".into(), config).await;

        assert!(outcome.is_none());
        assert_eq!(summaries(&diags), ["Unknown PasswordState API Key"]);
        assert_eq!(diags.errors[0].attribute, AttributePath::new("api_key"));
    }

    #[tokio::test]
    async fn second_configure_is_rejected() {
        let provider = PasswordStateProvider::new();
        let config = declared("https://ps.local/api/passwords", "k3y");

        let mut diags = Diagnostics::default();
        let first =
            Provider::configure(&provider, &mut diags, "1.9.0".into(), config.clone()).await;
        assert!(first.is_some());
        assert!(diags.errors.is_empty());
        assert!(provider.session().is_configured());

        let mut diags = Diagnostics::default();
        let second = Provider::configure(&provider, &mut diags, "1.9.0".into(), config).await;
        assert!(second.is_none());
        assert_eq!(summaries(&diags), ["PasswordState Client Already Configured"]);
        assert_eq!(diags.errors[0].attribute, AttributePath::root());
        assert!(diags.errors[0].detail.contains("already configured"));
    }
}

//! The `passwordstate_password` data source.

use std::fmt;

use async_trait::async_trait;
use passwordstate_client::{ClientError, PasswordLookup, PasswordRecord};
use passwordstate_secret::REDACTED;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueEmpty, ValueNumber, ValueString};
use tf_provider::{AttributePath, DataSource, Diagnostics, map};
use tracing::Instrument;

use crate::session::SessionClient;

/// State of one `passwordstate_password` block.
#[derive(Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordModel<'a> {
    /// Password ID (PID) to look up.
    pub passwordid: ValueNumber,
    /// User name of the account.
    pub username: ValueString<'a>,
    /// Password of the account. Sensitive.
    pub password: ValueString<'a>,
}

impl fmt::Debug for PasswordModel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = match &self.password {
            Value::Value(_) => REDACTED,
            Value::Null => "null",
            Value::Unknown => "unknown",
        };
        f.debug_struct("PasswordModel")
            .field("passwordid", &self.passwordid)
            .field("username", &self.username)
            .field("password", &password)
            .finish()
    }
}

impl PasswordModel<'static> {
    /// Copy a fetched record into data source state.
    pub fn from_record(record: &PasswordRecord) -> Self {
        Self {
            passwordid: Value::Value(record.password_id),
            username: Value::Value(record.user_name.clone().into()),
            password: record
                .password
                .with_str(|password| Value::Value(password.to_owned().into())),
        }
    }
}

/// A failed read. `Display` is the diagnostic summary.
#[derive(Debug, Error)]
pub enum ReadError {
    /// `passwordid` was null or unknown when the read ran.
    #[error("Missing PasswordState Password ID")]
    MissingPasswordId,

    /// `passwordid` is not a valid PasswordState ID.
    #[error("Invalid PasswordState Password ID")]
    InvalidPasswordId(i64),

    /// The provider has not run `configure`.
    #[error("Unconfigured PasswordState Client")]
    Unconfigured,

    /// The API call failed.
    #[error("Unable to Read PasswordState Password")]
    Upstream(#[source] ClientError),

    /// The API returned no record for the ID.
    #[error("PasswordState Password Not Found")]
    NotFound(i64),
}

impl ReadError {
    /// Long-form diagnostic detail.
    pub fn detail(&self) -> String {
        match self {
            ReadError::MissingPasswordId => {
                "The passwordid attribute must be known before the password can be read.".into()
            }
            ReadError::InvalidPasswordId(id) => {
                format!("Password IDs are positive integers, got {id}.")
            }
            ReadError::Unconfigured => "The provider was not configured before the data source \
                                        was read. Please report this issue to the provider \
                                        developers."
                .into(),
            ReadError::Upstream(err) => err.to_string(),
            ReadError::NotFound(id) => {
                format!("PasswordState returned no password record for password ID {id}.")
            }
        }
    }

    /// Whether the error belongs to the `passwordid` attribute.
    pub fn is_password_id_error(&self) -> bool {
        matches!(
            self,
            ReadError::MissingPasswordId | ReadError::InvalidPasswordId(_)
        )
    }
}

/// Validate a declared `passwordid`. Unknown values pass; they are checked at read time.
pub fn validate_password_id(password_id: &ValueNumber) -> Result<(), ReadError> {
    match password_id {
        Value::Value(id) if *id <= 0 => Err(ReadError::InvalidPasswordId(*id)),
        _ => Ok(()),
    }
}

/// The concrete password ID of a read.
pub fn password_id(password_id: &ValueNumber) -> Result<i64, ReadError> {
    match password_id {
        Value::Value(id) if *id <= 0 => Err(ReadError::InvalidPasswordId(*id)),
        Value::Value(id) => Ok(*id),
        Value::Null | Value::Unknown => Err(ReadError::MissingPasswordId),
    }
}

/// Fetch `password_id` and map the result onto data source state.
///
/// When the API returns several records the last one wins.
pub async fn read_password(
    lookup: &dyn PasswordLookup,
    password_id: i64,
) -> Result<PasswordModel<'static>, ReadError> {
    let span = tracing::info_span!("read_password", passwordstate_pid = password_id);
    async move {
        tracing::info!("Starting: Data request to the PasswordState client");

        let records = lookup
            .get_password(password_id)
            .await
            .map_err(ReadError::Upstream)?;

        if records.len() > 1 {
            tracing::warn!(
                count = records.len(),
                "PasswordState returned several records, using the last one"
            );
        }

        let state = records
            .last()
            .map(PasswordModel::from_record)
            .ok_or(ReadError::NotFound(password_id))?;

        tracing::info!(
            success = true,
            "Completed: Data request to the PasswordState client"
        );
        Ok(state)
    }
    .instrument(span)
    .await
}

fn report(diags: &mut Diagnostics, err: &ReadError) {
    if err.is_password_id_error() {
        diags.error(err.to_string(), err.detail(), AttributePath::new("passwordid"));
    } else {
        diags.root_error(err.to_string(), err.detail());
    }
}

/// Reads a username and password from PasswordState by password ID.
#[derive(Debug, Clone)]
pub struct PasswordDataSource {
    client: SessionClient,
}

impl PasswordDataSource {
    /// Create a data source reading through the session client.
    pub fn new(client: SessionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for PasswordDataSource {
    type State<'a> = PasswordModel<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain(
                    "Retrieve a password and username from PasswordState.",
                ),
                attributes: map! {
                    "passwordid" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("The Password ID (PID) of the object."),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "username" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("The username of the account."),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "password" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("The password of the account."),
                        constraint: AttributeConstraint::Computed,
                        sensitive: true,
                        ..Default::default()
                    },
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Err(err) = validate_password_id(&config.passwordid) {
            report(diags, &err);
            return None;
        }
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let result = match (password_id(&config.passwordid), self.client.get()) {
            (Err(err), _) => Err(err),
            (Ok(_), None) => Err(ReadError::Unconfigured),
            (Ok(id), Some(client)) => read_password(client.as_ref(), id).await,
        };

        match result {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::error!(error = %err, detail = %err.detail(), "password read failed");
                report(diags, &err);
                None
            }
        }
    }
}

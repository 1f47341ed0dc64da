#![deny(missing_docs)]
//! Terraform provider for PasswordState.
//!
//! Exposes one read-only data source, `passwordstate_password`, which looks
//! up a username and password by password ID.
//!
//! ```hcl
//! provider "passwordstate" {
//!   api_url = "https://passwordstate.domain.com/api/passwords"
//!   # api_key falls back to PASSWORDSTATE_APIKEY
//! }
//!
//! data "passwordstate_password" "db" {
//!   passwordid = 42
//! }
//! ```

pub mod config;
pub mod data_source;
pub mod logging;
mod provider;
pub mod session;

pub use config::{ConfigError, ConfigField, ProviderConfig, Settings};
pub use data_source::{PasswordDataSource, PasswordModel, ReadError, read_password};
pub use provider::{PROVIDER_NAME, PasswordStateProvider};
pub use session::SessionClient;

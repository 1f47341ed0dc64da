#![deny(missing_docs)]
//! Redacted secret values.
//!
//! [`SecretValue`] holds the PasswordState API key and every password fetched
//! from the API. It has no `Display`, no `Serialize` and no `Clone`, its
//! `Debug` output is `[REDACTED]`, and its memory is zeroed on drop.
//!
//! The only ways to read the value are the scoped accessors
//! [`SecretValue::with_bytes`] and [`SecretValue::with_str`].

use serde::de::{self, Deserialize, Deserializer, Visitor};
use std::fmt;
use zeroize::Zeroizing;

/// Placeholder printed instead of a secret.
pub const REDACTED: &str = "[REDACTED]";

/// An opaque secret value. Cannot be logged, serialized, or cloned.
/// Memory is zeroed on drop via [`Zeroizing`].
pub struct SecretValue {
    inner: Zeroizing<String>,
}

impl SecretValue {
    /// Create a new secret value. The input string is moved, not copied.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(value.into()),
        }
    }

    /// Scoped exposure of the raw bytes.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(self.inner.as_bytes())
    }

    /// Scoped exposure as a string slice.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(&self.inner)
    }

    /// Returns the length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Default for SecretValue {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// Intentionally: no Display, no Clone, no Serialize, no PartialEq.

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SecretVisitor;

        impl Visitor<'_> for SecretVisitor {
            type Value = SecretValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a secret string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SecretValue, E> {
                Ok(SecretValue::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<SecretValue, E> {
                Ok(SecretValue::new(v))
            }

            // PasswordState sends `null` for an empty password field.
            fn visit_unit<E: de::Error>(self) -> Result<SecretValue, E> {
                Ok(SecretValue::new(String::new()))
            }

            fn visit_none<E: de::Error>(self) -> Result<SecretValue, E> {
                Ok(SecretValue::new(String::new()))
            }
        }

        deserializer.deserialize_any(SecretVisitor)
    }
}

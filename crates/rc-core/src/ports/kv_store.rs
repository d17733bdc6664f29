//! Remote key-value store port
//!
//! The store is addressed by string keys holding serialized text values.
//! Reads ask for several keys at once; writes set one key at a time with no
//! transactional guarantee across keys.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::StoreError;

/// Key holding the serialized supply record.
pub const STATE_KEY: &str = "state";
/// Key holding the serialized onboarding status.
pub const VIEW_STATUS_KEY: &str = "viewStatus";

/// One `{key, value}` pair returned by a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl StoredEntry {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Stored text, or `None` when the key has no (or an empty) value.
    pub fn text(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Read `keys`. Keys with nothing stored come back with an empty value.
    async fn get(&self, keys: &[&str]) -> Result<Vec<StoredEntry>, StoreError>;

    /// Overwrite `key` with `value`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

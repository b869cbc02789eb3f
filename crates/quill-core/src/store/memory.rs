//! In-memory credential store.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::{CredentialKey, CredentialStore};
use crate::{AccessToken, RefreshToken, Result};

/// A credential store that lives only as long as the process.
///
/// Used by tests and by callers that manage persistence themselves.
#[derive(Default)]
pub struct MemoryCredentialStore {
    values: RwLock<BTreeMap<CredentialKey, String>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given tokens.
    pub fn with_tokens(access: Option<AccessToken>, refresh: Option<RefreshToken>) -> Self {
        let mut values = BTreeMap::new();
        if let Some(access) = access {
            values.insert(CredentialKey::Access, access.as_str().to_string());
        }
        if let Some(refresh) = refresh {
            values.insert(CredentialKey::Refresh, refresh.as_str().to_string());
        }
        Self {
            values: RwLock::new(values),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: CredentialKey) -> Option<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(&key).cloned()
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key, value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.clear();
        Ok(())
    }
}

impl std::fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let keys: Vec<&CredentialKey> = values.keys().collect();
        f.debug_struct("MemoryCredentialStore")
            .field("keys", &keys)
            .finish()
    }
}

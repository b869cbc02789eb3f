//! Credential storage abstraction.
//!
//! The client never reads tokens from a global; it is handed a
//! [`CredentialStore`] at construction and reads the current tokens from it
//! on every attempt.
//!
//! # Known race
//!
//! A refresh reads the refresh token, awaits the server, then writes the new
//! access token. Those steps are not atomic with respect to [`CredentialStore::clear`]:
//! a logout that lands while a refresh is in flight can be followed by the
//! refreshed access token being written back into the cleared store.

mod memory;

pub use memory::MemoryCredentialStore;

use std::fmt;

use crate::{AccessToken, RefreshToken, Result};

/// The keys a credential store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialKey {
    /// The access token.
    Access,
    /// The refresh token.
    Refresh,
    /// The display identity (username) of the logged-in user.
    Username,
}

impl CredentialKey {
    /// Every key, in storage order.
    pub const ALL: [CredentialKey; 3] = [
        CredentialKey::Access,
        CredentialKey::Refresh,
        CredentialKey::Username,
    ];

    /// The key's persisted name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::Access => "access",
            CredentialKey::Refresh => "refresh",
            CredentialKey::Username => "username",
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key-value store for the credential pair and display identity.
///
/// Implementations must be safe to share across tasks. Empty values are
/// treated the same as missing ones by the typed accessors.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Read a value.
    fn get(&self, key: CredentialKey) -> Option<String>;

    /// Write a value.
    fn set(&self, key: CredentialKey, value: &str) -> Result<()>;

    /// Remove every value.
    fn clear(&self) -> Result<()>;

    /// The current access token, if one is stored and non-empty.
    fn access_token(&self) -> Option<AccessToken> {
        non_empty(self.get(CredentialKey::Access)).map(AccessToken::new)
    }

    /// The current refresh token, if one is stored and non-empty.
    fn refresh_token(&self) -> Option<RefreshToken> {
        non_empty(self.get(CredentialKey::Refresh)).map(RefreshToken::new)
    }

    /// The logged-in username, if any.
    fn username(&self) -> Option<String> {
        non_empty(self.get(CredentialKey::Username))
    }

    /// Replace the access token.
    fn store_access_token(&self, token: &AccessToken) -> Result<()> {
        self.set(CredentialKey::Access, token.as_str())
    }

    /// Store the result of a successful login.
    fn store_login(
        &self,
        access: &AccessToken,
        refresh: &RefreshToken,
        username: &str,
    ) -> Result<()> {
        self.set(CredentialKey::Access, access.as_str())?;
        self.set(CredentialKey::Refresh, refresh.as_str())?;
        self.set(CredentialKey::Username, username)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

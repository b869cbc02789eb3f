//! Where the CLI keeps credentials and which backend it talks to.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use quill_core::ApiBase;
use quill_file::FileCredentialStore;
use quill_http::{BlogApi, ClientConfig};

const STORE_FILE: &str = "credentials.json";

/// Global connection settings shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    api_base: String,
    store: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl Session {
    pub fn new(api_base: String, store: Option<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            api_base,
            store,
            timeout,
        }
    }

    /// Path of the credential file.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store {
            return Ok(path.clone());
        }
        let dirs =
            ProjectDirs::from("", "", "quill").context("Could not determine data directory")?;
        let data_dir = dirs.data_dir();
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        Ok(data_dir.join(STORE_FILE))
    }

    /// Build an API handle backed by the credential file.
    pub fn api(&self) -> Result<BlogApi> {
        let base = ApiBase::new(&self.api_base).context("Invalid API base URL")?;
        let path = self.store_path()?;
        let store = FileCredentialStore::open(&path)
            .with_context(|| format!("Failed to open credential store {}", path.display()))?;

        let mut config = ClientConfig::new(base);
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        tracing::debug!(base = %config.base, store = %path.display(), "opening API");
        BlogApi::connect(config, Arc::new(store))
            .context("Failed to create HTTP client")
    }
}

//! Credential store persisted as a JSON file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use quill_core::error::StorageError;
use quill_core::{CredentialKey, CredentialStore, Result};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk layout of the credential file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

impl StoredCredentials {
    fn slot(&mut self, key: CredentialKey) -> &mut Option<String> {
        match key {
            CredentialKey::Access => &mut self.access,
            CredentialKey::Refresh => &mut self.refresh,
            CredentialKey::Username => &mut self.username,
        }
    }

    fn get(&self, key: CredentialKey) -> Option<&String> {
        match key {
            CredentialKey::Access => self.access.as_ref(),
            CredentialKey::Refresh => self.refresh.as_ref(),
            CredentialKey::Username => self.username.as_ref(),
        }
    }
}

/// A credential store backed by a JSON file.
///
/// Values are cached in memory and written through on every change. Writes
/// take an exclusive `fs2` lock on the file so two processes sharing it do
/// not interleave. On Unix the file is created with mode `0600`.
pub struct FileCredentialStore {
    path: PathBuf,
    cache: RwLock<StoredCredentials>,
}

impl FileCredentialStore {
    /// Open the store at `path`, loading any credentials already there.
    ///
    /// A missing or empty file is an empty store. The parent directory is
    /// created on first write, not here.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cached = load(&path)?;
        debug!(
            has_access = cached.access.is_some(),
            has_refresh = cached.refresh.is_some(),
            "credential file loaded"
        );
        Ok(Self {
            path,
            cache: RwLock::new(cached),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, stored: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let json = serde_json::to_vec_pretty(stored).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut file = open_for_write(&self.path).map_err(|e| io_error(&self.path, e))?;
        file.lock_exclusive().map_err(|e| io_error(&self.path, e))?;

        let written = write_locked(&mut file, &json);
        let unlocked = FileExt::unlock(&file);
        written.map_err(|e| io_error(&self.path, e))?;
        unlocked.map_err(|e| io_error(&self.path, e))?;

        debug!("credential file written");
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: CredentialKey) -> Option<String> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.get(key).cloned()
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = cache.clone();
        *updated.slot(key) = Some(value.to_string());
        self.persist(&updated)?;
        *cache = updated;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("credential file removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(&self.path, e)),
        }
        *cache = StoredCredentials::default();
        Ok(())
    }
}

impl std::fmt::Debug for FileCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let keys: Vec<CredentialKey> = CredentialKey::ALL
            .into_iter()
            .filter(|key| cache.get(*key).is_some())
            .collect();
        f.debug_struct("FileCredentialStore")
            .field("path", &self.path)
            .field("keys", &keys)
            .finish()
    }
}

fn load(path: &Path) -> Result<StoredCredentials> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoredCredentials::default()),
        Err(e) => return Err(io_error(path, e)),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(StoredCredentials::default());
    }
    serde_json::from_slice(&bytes).map_err(|e| {
        StorageError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn open_for_write(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;

    // A file created by something else may be wider than 0600.
    #[cfg(unix)]
    {
        let mut perms = file.metadata()?.permissions();
        if perms.mode() & 0o777 != 0o600 {
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }
    }
    Ok(file)
}

fn write_locked(file: &mut File, json: &[u8]) -> io::Result<()> {
    file.set_len(0)?;
    file.write_all(json)?;
    file.write_all(b"\n")?;
    file.sync_data()
}

fn io_error(path: &Path, err: io::Error) -> quill_core::Error {
    StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
    .into()
}

//! On-disk cache of the signed-in user
//!
//! Lets a restarted session pick up where it left off without prompting for
//! credentials again. Only the public user record is stored; passwords never
//! touch the disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::models::User;
use crate::constants::session;
use crate::errors::{CacheError, CacheResult};

/// JSON file holding the last signed-in user
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's config directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(session::CONFIG_DIR_NAME)
            .join(session::CACHE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached user, returning `None` if nothing is cached
    pub async fn load(&self) -> CacheResult<Option<User>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let user = serde_json::from_str(&contents).map_err(|source| CacheError::Corrupted {
            path: self.path.clone(),
            source,
        })?;
        debug!("Loaded cached session from {}", self.path.display());
        Ok(Some(user))
    }

    /// Persist the user, creating parent directories if needed
    pub async fn save(&self, user: &User) -> CacheResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let serialized =
            serde_json::to_string_pretty(user).map_err(|source| CacheError::Corrupted {
                path: self.path.clone(),
                source,
            })?;
        tokio::fs::write(&self.path, serialized)
            .await
            .map_err(|source| self.io_error(source))?;
        info!("Cached session for {} at {}", user.id, self.path.display());
        Ok(())
    }

    /// Remove the cached user; succeeds if nothing was cached
    pub async fn clear(&self) -> CacheResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Removed cached session {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

//! Preference sources: a hot-reloadable YAML file and a fixed snapshot.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::application::ports::PreferenceSource;
use crate::domain::ClusterPreferences;

/// Preferences read from a YAML file such as:
///
/// ```yaml
/// cluster.spot: true
/// ```
///
/// Readers clone the current `Arc`; a reload swaps it under a short write
/// lock. A missing file means defaults.
pub struct FilePreferenceStore {
    path: PathBuf,
    current: RwLock<Arc<ClusterPreferences>>,
    modified: Mutex<Option<SystemTime>>,
}

impl FilePreferenceStore {
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let modified = modified_at(&path);
        let preferences = read_preferences(&path)?;
        Ok(Self {
            path,
            current: RwLock::new(Arc::new(preferences)),
            modified: Mutex::new(modified),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and swap the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed; the previous
    /// snapshot stays in place.
    pub fn reload(&self) -> Result<()> {
        let modified = modified_at(&self.path);
        let preferences = read_preferences(&self.path)?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(preferences);
        *self.modified.lock().unwrap_or_else(PoisonError::into_inner) = modified;
        tracing::debug!(path = %self.path.display(), "preferences reloaded");
        Ok(())
    }

    /// Reload if the file's modification time changed since the last read.
    /// Returns `true` when a new snapshot was installed.
    pub fn refresh_if_modified(&self) -> bool {
        let now = modified_at(&self.path);
        {
            let mut seen = self.modified.lock().unwrap_or_else(PoisonError::into_inner);
            if now == *seen {
                return false;
            }
            // A broken file is reported once, not on every poll.
            *seen = now;
        }
        match self.reload() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "keeping previous preferences: {e:#}"
                );
                false
            }
        }
    }

    /// Poll the file every `interval` until the store is dropped.
    pub fn spawn_watcher(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.refresh_if_modified();
            }
        })
    }
}

impl PreferenceSource for FilePreferenceStore {
    fn snapshot(&self) -> Arc<ClusterPreferences> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }
}

/// A fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticPreferences(Arc<ClusterPreferences>);

impl StaticPreferences {
    #[must_use]
    pub fn new(preferences: ClusterPreferences) -> Self {
        Self(Arc::new(preferences))
    }
}

impl PreferenceSource for StaticPreferences {
    fn snapshot(&self) -> Arc<ClusterPreferences> {
        Arc::clone(&self.0)
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn read_preferences(path: &Path) -> Result<ClusterPreferences> {
    if !path.exists() {
        return Ok(ClusterPreferences::default());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(ClusterPreferences::default());
    }
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

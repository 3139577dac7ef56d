//! Configuration service implementation.
//!
//! Loads the client configuration from the configuration file
//! (~/.config/postlab/config.toml).

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use postlab_core::config::AppConfig;
use postlab_core::error::{PostlabError, Result};

/// Loads and caches the application configuration.
///
/// The file is read once on first access and cached to avoid repeated
/// file I/O operations.
#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the configuration, loading it from file on first access.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = Self::load_from(&Self::config_path()?)?;

        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    /// Loads the configuration from an explicit path.
    ///
    /// A missing file yields defaults so first runs need no setup; a file
    /// that exists but does not parse is an error the caller must see.
    pub fn load_from(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PostlabError::config(format!("failed to read {}: {e}", path.display())))?;
        Ok(toml::from_str(&raw)?)
    }

    fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| PostlabError::config("no user configuration directory available"))?;
        Ok(base.join("postlab").join("config.toml"))
    }
}

use super::paths::{DEFAULT_MODULES_FILE_NAME, DEFAULT_STORE_FILE_NAME};
use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST_MODULE_ID: &str = "main";

/// Host-side settings read before the configurator starts. Every field is
/// optional; relative paths resolve against the state root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostSettings {
    #[serde(default)]
    pub data_root: Option<PathBuf>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub modules_path: Option<PathBuf>,
    #[serde(default)]
    pub host_module_id: Option<String>,
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

impl HostSettings {
    /// A missing file yields default settings.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn resolve_store_path(&self, state_root: &Path) -> PathBuf {
        resolve(
            state_root,
            self.store_path.as_deref(),
            DEFAULT_STORE_FILE_NAME,
        )
    }

    pub fn resolve_modules_path(&self, state_root: &Path) -> PathBuf {
        resolve(
            state_root,
            self.modules_path.as_deref(),
            DEFAULT_MODULES_FILE_NAME,
        )
    }

    pub fn host_module_id(&self) -> &str {
        self.host_module_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_HOST_MODULE_ID)
    }
}

fn resolve(state_root: &Path, configured: Option<&Path>, default_name: &str) -> PathBuf {
    match configured {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => state_root.join(path),
        None => state_root.join(default_name),
    }
}

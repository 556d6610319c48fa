use super::{ModuleRegistry, StaticModule};
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// YAML list of modules a host exposes to the configurator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleManifest {
    #[serde(default)]
    pub modules: Vec<StaticModule>,
}

impl ModuleManifest {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = BTreeSet::new();
        for module in &self.modules {
            let name = module.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Manifest(
                    "module name must be non-empty".to_string(),
                ));
            }
            if !names.insert(name) {
                return Err(ConfigError::Manifest(format!(
                    "duplicate module name `{name}`"
                )));
            }
            if module
                .storage_id
                .as_deref()
                .is_some_and(|id| id.trim().is_empty())
            {
                return Err(ConfigError::Manifest(format!(
                    "module `{name}` has a blank storage_id"
                )));
            }
            let mut keys = BTreeSet::new();
            for entry in module.config.iter().flat_map(|schema| schema.entries()) {
                if entry.key.trim().is_empty() {
                    return Err(ConfigError::Manifest(format!(
                        "module `{name}` declares a blank config key"
                    )));
                }
                if !keys.insert(entry.key.as_str()) {
                    return Err(ConfigError::Manifest(format!(
                        "module `{name}` declares config key `{}` twice",
                        entry.key
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn into_registry(self) -> ModuleRegistry {
        self.modules
            .into_iter()
            .fold(ModuleRegistry::new(), |registry, module| {
                registry.with_module(module)
            })
    }
}

pub fn parse_manifest(raw: &str, origin: &str) -> Result<ModuleRegistry, ConfigError> {
    let manifest: ModuleManifest =
        serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
    manifest.validate()?;
    Ok(manifest.into_registry())
}

/// A missing manifest yields an empty registry.
pub fn load_manifest(path: &Path) -> Result<ModuleRegistry, ConfigError> {
    if !path.exists() {
        return Ok(ModuleRegistry::new());
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(ModuleRegistry::new());
    }
    parse_manifest(&raw, &path.display().to_string())
}

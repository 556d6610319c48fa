//! Read-only view over the host's modules and their configuration schemas.

mod doc;
mod manifest;

pub use doc::clean_doc;
pub use manifest::{load_manifest, parse_manifest, ModuleManifest};

use serde::{Deserialize, Serialize};

pub const UNDOCUMENTED_KEY: &str = "Undocumented key";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaKey {
    pub key: String,
    #[serde(default)]
    pub doc: Option<String>,
}

/// Ordered key names a module accepts, each with optional documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSchema {
    keys: Vec<SchemaKey>,
}

impl ConfigSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: impl Into<String>, doc: Option<&str>) -> Self {
        self.keys.push(SchemaKey {
            key: key.into(),
            doc: doc.map(str::to_string),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn entries(&self) -> &[SchemaKey] {
        &self.keys
    }
}

/// Capability of a module that declares configuration keys.
pub trait HasConfigSchema {
    fn config_keys(&self) -> Vec<String>;

    /// Documentation for `key`, when the schema carries any.
    fn getdoc(&self, _key: &str) -> Option<String> {
        None
    }
}

impl HasConfigSchema for ConfigSchema {
    fn config_keys(&self) -> Vec<String> {
        self.keys.iter().map(|entry| entry.key.clone()).collect()
    }

    fn getdoc(&self, key: &str) -> Option<String> {
        self.keys
            .iter()
            .find(|entry| entry.key == key)
            .and_then(|entry| entry.doc.clone())
    }
}

pub trait Module {
    /// Display name shown in menus.
    fn name(&self) -> &str;

    fn doc(&self) -> Option<&str> {
        None
    }

    /// Identifier the store is keyed by. Distinct from the display name.
    fn storage_id(&self) -> &str;

    fn config_schema(&self) -> Option<&dyn HasConfigSchema> {
        None
    }

    fn has_config(&self) -> bool {
        self.config_schema()
            .is_some_and(|schema| !schema.config_keys().is_empty())
    }
}

/// Plain data module, as declared in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticModule {
    pub name: String,
    #[serde(default)]
    pub storage_id: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub config: Option<ConfigSchema>,
}

impl StaticModule {
    pub fn new(name: impl Into<String>, storage_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage_id: Some(storage_id.into()),
            doc: None,
            config: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_config(mut self, config: ConfigSchema) -> Self {
        self.config = Some(config);
        self
    }
}

impl Module for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    fn storage_id(&self) -> &str {
        self.storage_id.as_deref().unwrap_or(&self.name)
    }

    fn config_schema(&self) -> Option<&dyn HasConfigSchema> {
        self.config
            .as_ref()
            .map(|schema| schema as &dyn HasConfigSchema)
    }
}

#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: impl Module + 'static) {
        self.modules.push(Box::new(module));
    }

    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        self.register(module);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> impl Iterator<Item = &dyn Module> {
        self.modules.iter().map(|module| module.as_ref())
    }

    /// Modules exposing at least one configuration key, in registration order.
    pub fn configurable(&self) -> impl Iterator<Item = &dyn Module> {
        self.modules().filter(|module| module.has_config())
    }

    pub fn find(&self, name: &str) -> Option<&dyn Module> {
        self.modules().find(|module| module.name() == name)
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.modules().map(|module| module.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl Module for Bare {
        fn name(&self) -> &str {
            "Bare"
        }

        fn storage_id(&self) -> &str {
            "bare"
        }
    }

    #[test]
    fn configurable_skips_modules_without_keys() {
        let registry = ModuleRegistry::new()
            .with_module(Bare)
            .with_module(StaticModule::new("Empty", "empty").with_config(ConfigSchema::new()))
            .with_module(
                StaticModule::new("Weather", "weather")
                    .with_config(ConfigSchema::new().with_key("city", Some("City name"))),
            );

        let names: Vec<&str> = registry.configurable().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Weather"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.find("Bare").is_some());
        assert!(registry.find("bare").is_none());
    }

    #[test]
    fn schema_docs_are_optional() {
        let schema = ConfigSchema::new()
            .with_key("city", Some("City name"))
            .with_key("units", None);
        assert_eq!(schema.config_keys(), vec!["city", "units"]);
        assert_eq!(schema.getdoc("city").as_deref(), Some("City name"));
        assert_eq!(schema.getdoc("units"), None);
        assert_eq!(schema.getdoc("missing"), None);
    }

    #[test]
    fn storage_id_defaults_to_name() {
        let module = StaticModule {
            name: "Notes".to_string(),
            storage_id: None,
            doc: None,
            config: None,
        };
        assert_eq!(module.storage_id(), "Notes");
        assert!(!module.has_config());
    }
}

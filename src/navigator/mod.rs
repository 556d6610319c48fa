//! Menu-driven configuration navigator.
//!
//! The navigator walks an explicit set of [`Screen`]s. Every transition goes
//! through one prompt, and the loop ends when a step returns
//! [`Screen::Exit`]. The store is owned by the session for the duration of
//! [`run`] and handed back to the host afterwards.

pub mod credentials;

use crate::coerce::coerce_value;
use crate::config::DEFAULT_HOST_MODULE_ID;
use crate::prompt::{MenuChoice, PromptBackend, PromptOutcome};
use crate::registry::{clean_doc, Module, ModuleRegistry, UNDOCUMENTED_KEY};
use crate::shared::logging::EventLog;
use crate::store::ConfigStore;
use credentials::{resolve_token_path, validate_api_hash, validate_api_id, write_api_token};
use std::path::{Path, PathBuf};

pub const MAIN_MENU_TITLE: &str = "Main Menu";
pub const MODULES_MENU_TITLE: &str = "Modules";
pub const LOG_LEVEL_MENU_TITLE: &str = "Log Level";

pub const API_CHOICE: &str = "API Token and ID";
pub const MODULES_CHOICE: &str = "Modules";
pub const LOGGING_CHOICE: &str = "Logging";
pub const FACTORY_RESET_CHOICE: &str = "Factory reset";

pub const API_HASH_QUERY: &str = "Enter your API Hash";
pub const API_ID_QUERY: &str = "Enter your API ID";
pub const API_SAVED_MESSAGE: &str = "API Token and ID set.";
pub const VALUE_SAVED_MESSAGE: &str = "Config value set successfully";
pub const FACTORY_RESET_QUESTION: &str = "Do you really want to erase all data this account stores remotely?\nLocal state is not affected.";

const MAIN_MENU_ITEMS: [(&str, &str); 4] = [
    (API_CHOICE, "Set the API token and ID"),
    (MODULES_CHOICE, "Configure modules"),
    (LOGGING_CHOICE, "Choose how much the host logs"),
    (FACTORY_RESET_CHOICE, "Erase all data stored remotely"),
];

pub const LOG_LEVELS: [(i64, &str); 6] = [
    (50, "CRITICAL"),
    (40, "ERROR"),
    (30, "WARNING"),
    (20, "INFO"),
    (10, "DEBUG"),
    (0, "ALL"),
];

pub fn session_title(phone: &str) -> String {
    format!("Configuration for {phone}")
}

pub fn module_menu_title(module_name: &str) -> String {
    format!("Module configuration for {module_name}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    ApiCredentials,
    ModuleList,
    ModuleKeys { module: String },
    KeyValue { module: String, key: String },
    Logging,
    FactoryReset,
    Exit,
}

/// Everything a session needs besides the store, registry and backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub phone: String,
    pub init: bool,
    pub data_root: Option<PathBuf>,
    pub base_dir: PathBuf,
    pub host_module_id: String,
    pub log: EventLog,
}

impl SessionOptions {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            init: false,
            data_root: None,
            base_dir: default_base_dir(),
            host_module_id: DEFAULT_HOST_MODULE_ID.to_string(),
            log: EventLog::disabled(),
        }
    }

    pub fn with_init(mut self, init: bool) -> Self {
        self.init = init;
        self
    }

    pub fn with_data_root(mut self, data_root: impl Into<PathBuf>) -> Self {
        self.data_root = Some(data_root.into());
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_host_module_id(mut self, host_module_id: impl Into<String>) -> Self {
        self.host_module_id = host_module_id.into();
        self
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn token_path(&self) -> PathBuf {
        resolve_token_path(self.data_root.as_deref(), &self.base_dir)
    }
}

/// Directory of the running executable, falling back to the working directory.
pub fn default_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Host entry point. Runs the menus until the operator leaves and returns the
/// store, which is `null` after a confirmed factory reset.
///
/// Events are not logged from here; hosts that want the `navigator.*`,
/// `api_token.*` and `module.*` event log call [`run_session`] with
/// [`SessionOptions::with_log`].
pub fn run(
    backend: &mut dyn PromptBackend,
    store: ConfigStore,
    data_root: Option<&Path>,
    phone: &str,
    init: bool,
    registry: &ModuleRegistry,
) -> ConfigStore {
    let mut options = SessionOptions::new(phone).with_init(init);
    if let Some(data_root) = data_root {
        options = options.with_data_root(data_root);
    }
    run_session(backend, store, registry, options)
}

pub fn run_session(
    backend: &mut dyn PromptBackend,
    store: ConfigStore,
    registry: &ModuleRegistry,
    options: SessionOptions,
) -> ConfigStore {
    let mut session = Session {
        backend,
        store,
        registry,
        options,
    };
    session.run();
    session.store
}

struct Session<'a> {
    backend: &'a mut dyn PromptBackend,
    store: ConfigStore,
    registry: &'a ModuleRegistry,
    options: SessionOptions,
}

impl<'a> Session<'a> {
    fn run(&mut self) {
        let title = session_title(&self.options.phone);
        self.backend.set_background_title(&title);
        self.options.log.info("navigator.start", &title);

        let mut screen = if self.options.init {
            Screen::ApiCredentials
        } else {
            Screen::MainMenu
        };
        while screen != Screen::Exit {
            screen = self.step(screen);
        }
        self.options.log.info(
            "navigator.exit",
            if self.store.is_reset() {
                "store reset"
            } else {
                "store kept"
            },
        );
    }

    fn step(&mut self, screen: Screen) -> Screen {
        match screen {
            Screen::MainMenu => self.main_menu(),
            Screen::ApiCredentials => {
                self.edit_api_credentials();
                if self.options.init {
                    Screen::Exit
                } else {
                    Screen::MainMenu
                }
            }
            Screen::ModuleList => self.module_list(),
            Screen::ModuleKeys { module } => self.module_keys(&module),
            Screen::KeyValue { module, key } => {
                self.edit_key_value(&module, &key);
                Screen::ModuleList
            }
            Screen::Logging => {
                self.edit_log_level();
                Screen::MainMenu
            }
            Screen::FactoryReset => {
                self.confirm_factory_reset();
                Screen::Exit
            }
            Screen::Exit => Screen::Exit,
        }
    }

    fn main_menu(&mut self) -> Screen {
        let choices: Vec<MenuChoice> = MAIN_MENU_ITEMS
            .iter()
            .map(|(tag, description)| MenuChoice::new(*tag, *description))
            .collect();
        let PromptOutcome::Ok(tag) = self.backend.menu(MAIN_MENU_TITLE, &choices) else {
            return Screen::Exit;
        };
        match tag.as_str() {
            API_CHOICE => Screen::ApiCredentials,
            MODULES_CHOICE => Screen::ModuleList,
            LOGGING_CHOICE => Screen::Logging,
            FACTORY_RESET_CHOICE => Screen::FactoryReset,
            _ => Screen::Exit,
        }
    }

    fn edit_api_credentials(&mut self) {
        let PromptOutcome::Ok(raw_hash) = self.backend.inputbox(API_HASH_QUERY) else {
            return;
        };
        let hash = match validate_api_hash(&raw_hash) {
            Ok(hash) => hash,
            Err(err) => {
                self.options
                    .log
                    .warn("api_token.rejected", "hash failed validation");
                self.backend.msgbox(&err.to_string());
                return;
            }
        };
        let PromptOutcome::Ok(raw_id) = self.backend.inputbox(API_ID_QUERY) else {
            return;
        };
        let id = match validate_api_id(&raw_id) {
            Ok(id) => id,
            Err(err) => {
                self.options
                    .log
                    .warn("api_token.rejected", "id failed validation");
                self.backend.msgbox(&err.to_string());
                return;
            }
        };

        let path = self.options.token_path();
        match write_api_token(&path, id, hash) {
            Ok(()) => {
                self.options
                    .log
                    .info("api_token.written", &path.display().to_string());
                self.backend.msgbox(API_SAVED_MESSAGE);
            }
            Err(err) => {
                let message = format!("Failed to write {}: {err}", path.display());
                self.options.log.error("api_token.write_failed", &message);
                self.backend.msgbox(&message);
            }
        }
    }

    fn module_list(&mut self) -> Screen {
        let choices: Vec<MenuChoice> = self
            .registry
            .configurable()
            .map(|module| MenuChoice::new(module.name(), clean_doc(module.doc().unwrap_or(""))))
            .collect();
        match self.backend.menu(MODULES_MENU_TITLE, &choices) {
            PromptOutcome::Ok(module) if self.configurable_module(&module).is_some() => {
                Screen::ModuleKeys { module }
            }
            PromptOutcome::Ok(_) => Screen::ModuleList,
            PromptOutcome::Cancelled => Screen::MainMenu,
        }
    }

    fn module_keys(&mut self, module_name: &str) -> Screen {
        let Some(module) = self.configurable_module(module_name) else {
            return Screen::ModuleList;
        };
        let Some(schema) = module.config_schema() else {
            return Screen::ModuleList;
        };
        let keys = schema.config_keys();
        let choices: Vec<MenuChoice> = keys
            .iter()
            .map(|key| {
                let doc = schema
                    .getdoc(key)
                    .unwrap_or_else(|| UNDOCUMENTED_KEY.to_string());
                MenuChoice::new(key.as_str(), doc)
            })
            .collect();
        let title = module_menu_title(module.name());
        match self.backend.menu(&title, &choices) {
            PromptOutcome::Ok(key) if keys.contains(&key) => Screen::KeyValue {
                module: module_name.to_string(),
                key,
            },
            PromptOutcome::Ok(_) | PromptOutcome::Cancelled => Screen::ModuleList,
        }
    }

    fn edit_key_value(&mut self, module_name: &str, key: &str) {
        let Some(storage_id) = self
            .configurable_module(module_name)
            .map(|module| module.storage_id().to_string())
        else {
            return;
        };
        let PromptOutcome::Ok(raw) = self.backend.inputbox(key) else {
            return;
        };
        let value = coerce_value(&raw);
        self.options.log.info(
            "module.value_set",
            &format!("{storage_id}.{key} = {value}"),
        );
        self.store.set_module_value(&storage_id, key, value);
        self.backend.msgbox(VALUE_SAVED_MESSAGE);
    }

    fn edit_log_level(&mut self) {
        let choices: Vec<MenuChoice> = LOG_LEVELS
            .iter()
            .map(|(level, name)| MenuChoice::new(level.to_string(), *name))
            .collect();
        let PromptOutcome::Ok(tag) = self.backend.menu(LOG_LEVEL_MENU_TITLE, &choices) else {
            return;
        };
        let Some(level) = tag
            .parse::<i64>()
            .ok()
            .filter(|level| LOG_LEVELS.iter().any(|(known, _)| known == level))
        else {
            return;
        };
        self.store
            .set_log_level(&self.options.host_module_id, level);
        self.options.log.info(
            "loglevel.set",
            &format!("{} = {level}", self.options.host_module_id),
        );
    }

    fn confirm_factory_reset(&mut self) {
        if self.backend.yesno(FACTORY_RESET_QUESTION).is_ok() {
            self.store.reset();
            self.options
                .log
                .warn("store.factory_reset", "configuration store cleared");
        }
    }

    fn configurable_module(&self, name: &str) -> Option<&'a dyn Module> {
        let registry: &'a ModuleRegistry = self.registry;
        registry.find(name).filter(|module| module.has_config())
    }
}

mod error;
mod paths;
mod settings;

pub use error::ConfigError;
pub use paths::{
    default_state_root, DEFAULT_MODULES_FILE_NAME, DEFAULT_STORE_FILE_NAME,
    GLOBAL_SETTINGS_FILE_NAME, GLOBAL_STATE_DIR,
};
pub use settings::{HostSettings, DEFAULT_HOST_MODULE_ID};

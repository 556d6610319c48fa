pub mod cli;

use crate::config::{default_state_root, HostSettings, GLOBAL_SETTINGS_FILE_NAME};
use crate::navigator::{default_base_dir, run_session, SessionOptions};
use crate::prompt::{parse_script, select_backend, PromptBackend, ScriptedBackend};
use crate::registry::load_manifest;
use crate::shared::logging::{configurator_log_path, EventLog};
use crate::store::{load_store, save_store};
use cli::{cli_help_lines, parse_cli_args, CliOptions};
use std::path::PathBuf;

pub const SCRIPTED_ANSWERS_ENV: &str = "MODCONF_SCRIPTED_ANSWERS";
pub const DEFAULT_PHONE: &str = "local";

/// Directory of `--config` when given, else `~/.modconf`.
fn state_root(options: &CliOptions) -> Result<PathBuf, String> {
    if let Some(parent) = options
        .config_path
        .as_deref()
        .and_then(|path| path.parent())
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        return Ok(parent.to_path_buf());
    }
    default_state_root().map_err(|e| e.to_string())
}

fn backend_for_session(log: &EventLog) -> Result<Box<dyn PromptBackend>, String> {
    match std::env::var(SCRIPTED_ANSWERS_ENV) {
        Ok(raw) => {
            let answers = parse_script(&raw)?;
            log.info("prompt.backend_selected", "scripted");
            Ok(Box::new(ScriptedBackend::new(answers)))
        }
        Err(_) => Ok(select_backend(log)),
    }
}

/// Loads host settings, the module manifest and the store, runs one
/// configurator session and saves the resulting store.
pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    let options = parse_cli_args(&args)?;
    if options.help {
        return Ok(cli_help_lines().join("\n"));
    }

    let root = state_root(&options)?;
    let settings_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| root.join(GLOBAL_SETTINGS_FILE_NAME));
    let settings = HostSettings::from_path(&settings_path).map_err(|e| e.to_string())?;
    let log = EventLog::new(configurator_log_path(&root));

    let store_path = options
        .store_path
        .clone()
        .unwrap_or_else(|| settings.resolve_store_path(&root));
    let modules_path = options
        .modules_path
        .clone()
        .unwrap_or_else(|| settings.resolve_modules_path(&root));
    let registry = load_manifest(&modules_path).map_err(|e| e.to_string())?;
    let store = load_store(&store_path).map_err(|e| e.to_string())?;

    let phone = options
        .phone
        .clone()
        .or_else(|| settings.phone.clone())
        .unwrap_or_else(|| DEFAULT_PHONE.to_string());
    let mut session = SessionOptions::new(phone)
        .with_init(options.init)
        .with_host_module_id(settings.host_module_id())
        .with_base_dir(settings.base_dir.clone().unwrap_or_else(default_base_dir))
        .with_log(log.clone());
    if let Some(data_root) = options.data_root.clone().or_else(|| settings.data_root.clone()) {
        session = session.with_data_root(data_root);
    }

    let mut backend = backend_for_session(&log)?;
    let store = run_session(backend.as_mut(), store, &registry, session);
    // Leave the dialog screen before printing the summary.
    drop(backend);

    save_store(&store_path, &store).map_err(|e| e.to_string())?;
    log.info("store.saved", &store_path.display().to_string());
    Ok(format!(
        "configuration saved\nstore={}\nmodules={}\nreset={}",
        store_path.display(),
        registry.len(),
        store.is_reset()
    ))
}

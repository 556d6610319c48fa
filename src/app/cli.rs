use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub init: bool,
    pub help: bool,
    pub data_root: Option<PathBuf>,
    pub phone: Option<String>,
    pub config_path: Option<PathBuf>,
    pub modules_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .filter(|value| !value.starts_with("--"))
                .cloned()
                .ok_or_else(|| format!("missing value for `{flag}`"))
        };
        match arg.as_str() {
            "--init" => options.init = true,
            "--help" | "-h" => options.help = true,
            "--data-root" => options.data_root = Some(PathBuf::from(value_for("--data-root")?)),
            "--phone" => options.phone = Some(value_for("--phone")?),
            "--config" => options.config_path = Some(PathBuf::from(value_for("--config")?)),
            "--modules" => options.modules_path = Some(PathBuf::from(value_for("--modules")?)),
            "--store" => options.store_path = Some(PathBuf::from(value_for("--store")?)),
            other => {
                return Err(format!(
                    "unknown argument `{other}`\n{}",
                    cli_help_lines().join("\n")
                ))
            }
        }
    }
    Ok(options)
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Usage: modconf [options]".to_string(),
        "Options:".to_string(),
        "  --init                 Only ask for the API token and ID, then exit".to_string(),
        "  --data-root <dir>      Directory that receives api_token.txt".to_string(),
        "  --phone <id>           Account identifier shown in the title".to_string(),
        "  --config <file>        Host settings file (default ~/.modconf/config.yaml)"
            .to_string(),
        "  --modules <file>       Module manifest (default <state root>/modules.yaml)"
            .to_string(),
        "  --store <file>         Configuration store (default <state root>/store.json)"
            .to_string(),
        "  -h, --help             Show this help".to_string(),
        "Environment:".to_string(),
        "  MODCONF_SCRIPTED_ANSWERS  `;`-separated answers replayed instead of prompting"
            .to_string(),
    ]
}

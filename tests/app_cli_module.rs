use modconf::app::cli::{cli_help_lines, parse_cli_args, CliOptions};
use modconf::app::{run_cli, SCRIPTED_ANSWERS_ENV};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|arg| arg.to_string()).collect()
}

#[test]
fn app_cli_module_parses_flags() {
    let options = parse_cli_args(&args(&[
        "--init",
        "--data-root",
        "/srv/bot",
        "--phone",
        "+998",
        "--store",
        "db.json",
    ]))
    .expect("parse args");

    assert_eq!(
        options,
        CliOptions {
            init: true,
            data_root: Some(PathBuf::from("/srv/bot")),
            phone: Some("+998".to_string()),
            store_path: Some(PathBuf::from("db.json")),
            ..CliOptions::default()
        }
    );
}

#[test]
fn app_cli_module_rejects_missing_values_and_unknown_flags() {
    let err = parse_cli_args(&args(&["--phone", "--init"])).expect_err("missing value");
    assert_eq!(err, "missing value for `--phone`");

    let err = parse_cli_args(&args(&["--store"])).expect_err("missing value");
    assert_eq!(err, "missing value for `--store`");

    let err = parse_cli_args(&args(&["--verbose"])).expect_err("unknown flag");
    assert!(err.starts_with("unknown argument `--verbose`"));
    assert!(err.contains("Usage: modconf"));
}

#[test]
fn app_cli_module_help_mentions_scripted_answers() {
    let help = run_cli(args(&["--help"])).expect("help");
    assert_eq!(help, cli_help_lines().join("\n"));
    assert!(help.contains(SCRIPTED_ANSWERS_ENV));
}

#[test]
fn app_cli_module_runs_scripted_sessions_against_state_root() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = temp.path().join("config.yaml");
    fs::write(&config, "phone: \"+998\"\nstore_path: data/store.json\n").expect("write settings");
    fs::write(
        temp.path().join("modules.yaml"),
        "modules:\n  - name: Weather\n    storage_id: weather\n    config:\n      - key: city\n",
    )
    .expect("write manifest");
    let config_arg = config.display().to_string();

    std::env::set_var(
        SCRIPTED_ANSWERS_ENV,
        "choose:Modules;choose:Weather;choose:city;text:Tashkent",
    );
    let output = run_cli(args(&["--config", &config_arg])).expect("run session");
    let store_path = temp.path().join("data/store.json");
    assert_eq!(
        output,
        format!(
            "configuration saved\nstore={}\nmodules=1\nreset=false",
            store_path.display()
        )
    );
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&store_path).expect("read store"))
            .expect("parse store");
    assert_eq!(saved, json!({"weather": {"__config__": {"city": "Tashkent"}}}));

    let data_root = temp.path().join("bot");
    fs::create_dir_all(&data_root).expect("mkdir");
    let data_root_arg = data_root.display().to_string();
    std::env::set_var(
        SCRIPTED_ANSWERS_ENV,
        "text:0123456789abcdef0123456789abcdef;text:42",
    );
    run_cli(args(&[
        "--config",
        &config_arg,
        "--init",
        "--data-root",
        &data_root_arg,
    ]))
    .expect("run init");
    std::env::remove_var(SCRIPTED_ANSWERS_ENV);

    assert_eq!(
        fs::read_to_string(data_root.join("api_token.txt")).expect("read token"),
        "42\n0123456789abcdef0123456789abcdef\n"
    );
    let log = fs::read_to_string(temp.path().join("logs/configurator.log")).expect("read log");
    assert!(log.contains("\"event\":\"api_token.written\""));
    assert!(log.contains("\"event\":\"store.saved\""));
}

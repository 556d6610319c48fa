use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CONFIGURATOR_LOG_FILE: &str = "logs/configurator.log";

pub fn configurator_log_path(state_root: &Path) -> PathBuf {
    state_root.join(CONFIGURATOR_LOG_FILE)
}

/// Appends one JSON object per line. Logging never fails the caller.
pub fn append_event_log(path: &Path, level: &str, event: &str, message: &str) {
    let payload = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "level": level,
        "event": event,
        "message": message,
    });

    let Ok(line) = serde_json::to_string(&payload) else {
        return;
    };

    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "{line}");
}

/// Optional sink handed to long-lived components; a missing path drops events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&self, event: &str, message: &str) {
        self.emit("info", event, message);
    }

    pub fn warn(&self, event: &str, message: &str) {
        self.emit("warn", event, message);
    }

    pub fn error(&self, event: &str, message: &str) {
        self.emit("error", event, message);
    }

    fn emit(&self, level: &str, event: &str, message: &str) {
        if let Some(path) = &self.path {
            append_event_log(path, level, event, message);
        }
    }
}

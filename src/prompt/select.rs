use super::{install_interrupt_handler, DialogBackend, PlainBackend, PromptBackend, PromptError};
use crate::shared::logging::EventLog;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, IsTerminal};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Dialog,
    Plain,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Dialog => "dialog",
            BackendKind::Plain => "plain",
        }
    }
}

static SELECTED_KIND: OnceLock<BackendKind> = OnceLock::new();

/// The backend kind chosen for this process. Evaluated on first call only.
pub fn selected_backend_kind(log: &EventLog) -> BackendKind {
    *SELECTED_KIND.get_or_init(|| match dialog_capability() {
        Ok(()) => BackendKind::Dialog,
        Err(err) => {
            log.warn("prompt.dialog_unavailable", &err.to_string());
            BackendKind::Plain
        }
    })
}

fn dialog_capability() -> Result<(), PromptError> {
    if !(io::stdin().is_terminal() && io::stdout().is_terminal()) {
        return Err(PromptError::NotInteractive);
    }
    let term = std::env::var("TERM").unwrap_or_default();
    if term.trim().is_empty() || term == "dumb" {
        return Err(PromptError::UnsupportedTerminal(term));
    }
    enable_raw_mode().map_err(PromptError::RawMode)?;
    disable_raw_mode().map_err(PromptError::RawMode)
}

/// Builds the prompt backend for this process: full-screen dialogs when the
/// terminal supports them, line prompts over stdin/stdout otherwise.
pub fn select_backend(log: &EventLog) -> Box<dyn PromptBackend> {
    if selected_backend_kind(log) == BackendKind::Dialog {
        match DialogBackend::start(log.clone()) {
            Ok(dialog) => {
                log.info("prompt.backend_selected", BackendKind::Dialog.as_str());
                return Box::new(dialog);
            }
            Err(err) => log.warn("prompt.dialog_unavailable", &err.to_string()),
        }
    }
    if let Err(err) = install_interrupt_handler() {
        log.warn("prompt.interrupt_handler_failed", &err.to_string());
    }
    log.info("prompt.backend_selected", BackendKind::Plain.as_str());
    Box::new(PlainBackend::stdio())
}

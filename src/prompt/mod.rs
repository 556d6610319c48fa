//! Operator prompts: menus, free-text input, messages and confirmations.

mod dialog;
mod plain;
mod scripted;
mod select;

pub use dialog::DialogBackend;
pub use plain::{
    install_interrupt_handler, process_interrupt_flag, PlainBackend, INPUT_PROMPT, MENU_PROMPT,
};
pub use scripted::{parse_script, PromptRecord, ScriptedAnswer, ScriptedBackend};
pub use select::{select_backend, selected_backend_kind, BackendKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome<T> {
    Ok(T),
    Cancelled,
}

impl<T> PromptOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, PromptOutcome::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            PromptOutcome::Ok(value) => Some(value),
            PromptOutcome::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuChoice {
    pub tag: String,
    pub description: String,
}

impl MenuChoice {
    pub fn new(tag: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("standard input and output must both be terminals")]
    NotInteractive,
    #[error("terminal type `{0}` cannot host full-screen dialogs")]
    UnsupportedTerminal(String),
    #[error("failed to enable raw mode: {0}")]
    RawMode(#[source] std::io::Error),
    #[error("failed to enter dialog screen: {0}")]
    EnterScreen(#[source] std::io::Error),
    #[error("failed to create dialog terminal: {0}")]
    Terminal(#[source] std::io::Error),
}

/// Renders prompts for the configurator. Implementations never surface I/O
/// failures; a prompt that cannot be shown counts as cancelled.
pub trait PromptBackend {
    /// Title shown above every subsequent prompt.
    fn set_background_title(&mut self, title: &str);

    /// Returns the tag of the chosen entry.
    fn menu(&mut self, title: &str, choices: &[MenuChoice]) -> PromptOutcome<String>;

    /// Returns trimmed, non-empty text. Empty input cancels.
    fn inputbox(&mut self, query: &str) -> PromptOutcome<String>;

    fn msgbox(&mut self, message: &str);

    /// `Ok` only on an explicit yes.
    fn yesno(&mut self, question: &str) -> PromptOutcome<()>;
}

impl<B: PromptBackend + ?Sized> PromptBackend for Box<B> {
    fn set_background_title(&mut self, title: &str) {
        (**self).set_background_title(title)
    }

    fn menu(&mut self, title: &str, choices: &[MenuChoice]) -> PromptOutcome<String> {
        (**self).menu(title, choices)
    }

    fn inputbox(&mut self, query: &str) -> PromptOutcome<String> {
        (**self).inputbox(query)
    }

    fn msgbox(&mut self, message: &str) {
        (**self).msgbox(message)
    }

    fn yesno(&mut self, question: &str) -> PromptOutcome<()> {
        (**self).yesno(question)
    }
}

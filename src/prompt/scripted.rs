use super::{MenuChoice, PromptBackend, PromptOutcome};
use std::collections::VecDeque;

/// One pre-recorded operator response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    Choose(String),
    Text(String),
    Yes,
    No,
    Cancel,
}

/// What a scripted session was shown, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRecord {
    Title(String),
    Menu { title: String, tags: Vec<String> },
    Input { query: String },
    Message(String),
    YesNo { question: String },
}

/// Replays answers instead of reading a terminal. An exhausted script, or an
/// answer of the wrong kind for the prompt, cancels that prompt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    answers: VecDeque<ScriptedAnswer>,
    transcript: Vec<PromptRecord>,
    title: String,
}

impl ScriptedBackend {
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            transcript: Vec::new(),
            title: String::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn transcript(&self) -> &[PromptRecord] {
        &self.transcript
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|record| match record {
                PromptRecord::Message(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn menu_titles(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|record| match record {
                PromptRecord::Menu { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PromptBackend for ScriptedBackend {
    fn set_background_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.transcript.push(PromptRecord::Title(title.to_string()));
    }

    fn menu(&mut self, title: &str, choices: &[MenuChoice]) -> PromptOutcome<String> {
        self.transcript.push(PromptRecord::Menu {
            title: title.to_string(),
            tags: choices.iter().map(|choice| choice.tag.clone()).collect(),
        });
        match self.answers.pop_front() {
            Some(ScriptedAnswer::Choose(tag)) => PromptOutcome::Ok(tag),
            _ => PromptOutcome::Cancelled,
        }
    }

    fn inputbox(&mut self, query: &str) -> PromptOutcome<String> {
        self.transcript.push(PromptRecord::Input {
            query: query.to_string(),
        });
        match self.answers.pop_front() {
            Some(ScriptedAnswer::Text(text)) if !text.trim().is_empty() => {
                PromptOutcome::Ok(text.trim().to_string())
            }
            _ => PromptOutcome::Cancelled,
        }
    }

    fn msgbox(&mut self, message: &str) {
        self.transcript
            .push(PromptRecord::Message(message.to_string()));
    }

    fn yesno(&mut self, question: &str) -> PromptOutcome<()> {
        self.transcript.push(PromptRecord::YesNo {
            question: question.to_string(),
        });
        match self.answers.pop_front() {
            Some(ScriptedAnswer::Yes) => PromptOutcome::Ok(()),
            _ => PromptOutcome::Cancelled,
        }
    }
}

/// Parses `;`-separated tokens: `choose:<tag>`, `text:<value>`, `yes`, `no`,
/// `cancel`. Blank tokens are skipped.
pub fn parse_script(raw: &str) -> Result<Vec<ScriptedAnswer>, String> {
    let mut answers = Vec::new();
    for token in raw.split(';') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let answer = if let Some(tag) = token.strip_prefix("choose:") {
            ScriptedAnswer::Choose(tag.trim().to_string())
        } else if let Some(text) = token.strip_prefix("text:") {
            ScriptedAnswer::Text(text.to_string())
        } else {
            match token.to_ascii_lowercase().as_str() {
                "yes" => ScriptedAnswer::Yes,
                "no" => ScriptedAnswer::No,
                "cancel" => ScriptedAnswer::Cancel,
                other => {
                    return Err(format!(
                        "invalid scripted answer `{other}`; valid tokens: choose:<tag>,text:<value>,yes,no,cancel"
                    ));
                }
            }
        };
        answers.push(answer);
    }
    Ok(answers)
}

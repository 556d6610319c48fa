use super::{MenuChoice, PromptBackend, PromptOutcome};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

pub const MENU_PROMPT: &str = "Please enter your choice as a number, or 0 to cancel: ";
pub const INPUT_PROMPT: &str = "Please enter your answer, or leave it empty to cancel: ";

static PROCESS_INTERRUPT: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Flag raised by the process SIGINT handler and consumed by [`PlainBackend::stdio`].
pub fn process_interrupt_flag() -> Arc<AtomicBool> {
    PROCESS_INTERRUPT
        .get_or_init(|| Arc::new(AtomicBool::new(false)))
        .clone()
}

/// Routes Ctrl-C to [`process_interrupt_flag`] instead of terminating the
/// process. Only one handler can be installed per process.
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    let flag = process_interrupt_flag();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
}

/// Line-based prompts for terminals without full-screen support, or when
/// input is piped. End of input, failed reads and Ctrl-C count as no answer.
/// A line finished after Ctrl-C is discarded.
pub struct PlainBackend<R, W> {
    input: R,
    output: W,
    title: String,
    interrupt: Arc<AtomicBool>,
}

impl PlainBackend<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout()).with_interrupt_flag(process_interrupt_flag())
    }
}

impl<R: BufRead, W: Write> PlainBackend<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            title: String::new(),
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_interrupt_flag(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::SeqCst)
    }

    fn header(&mut self) {
        let _ = writeln!(self.output, "{}\n\n", self.title);
    }

    fn read_answer(&mut self, prompt: &str) -> Option<String> {
        if self.take_interrupt() {
            let _ = writeln!(self.output);
            return None;
        }
        let _ = write!(self.output, "{prompt}");
        let _ = self.output.flush();
        let mut line = String::new();
        let read = self.input.read_line(&mut line);
        if self.take_interrupt() {
            let _ = writeln!(self.output);
            return None;
        }
        match read {
            Ok(0) | Err(_) => {
                let _ = writeln!(self.output);
                None
            }
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

fn menu_line(index: usize, choice: &MenuChoice, width: usize) -> String {
    format!(
        " {index}. {tag:<pad$}{description}",
        tag = choice.tag,
        pad = width + 2,
        description = choice.description.replace('\n', "...\n      "),
    )
}

impl<R: BufRead, W: Write> PromptBackend for PlainBackend<R, W> {
    fn set_background_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn menu(&mut self, title: &str, choices: &[MenuChoice]) -> PromptOutcome<String> {
        self.header();
        let _ = writeln!(self.output, "{title}\n");
        let width = choices
            .iter()
            .map(|choice| choice.tag.chars().count())
            .max()
            .unwrap_or(0);
        for (index, choice) in choices.iter().enumerate() {
            let _ = writeln!(self.output, "{}", menu_line(index + 1, choice, width));
        }

        loop {
            let answer = self.read_answer(MENU_PROMPT);
            let Ok(number) = answer.as_deref().unwrap_or("0").trim().parse::<usize>() else {
                continue;
            };
            if number == 0 {
                return PromptOutcome::Cancelled;
            }
            if let Some(choice) = choices.get(number - 1) {
                return PromptOutcome::Ok(choice.tag.clone());
            }
        }
    }

    fn inputbox(&mut self, query: &str) -> PromptOutcome<String> {
        self.header();
        let _ = writeln!(self.output, "{query}\n");
        match self.read_answer(INPUT_PROMPT) {
            Some(answer) if !answer.trim().is_empty() => {
                PromptOutcome::Ok(answer.trim().to_string())
            }
            _ => PromptOutcome::Cancelled,
        }
    }

    fn msgbox(&mut self, message: &str) {
        self.header();
        let _ = writeln!(self.output, "{message}");
    }

    fn yesno(&mut self, question: &str) -> PromptOutcome<()> {
        let _ = writeln!(self.output, "{}\n", self.title);
        match self.read_answer(&format!("{question} (y/N): ")) {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => PromptOutcome::Ok(()),
            _ => PromptOutcome::Cancelled,
        }
    }
}

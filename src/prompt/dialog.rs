use super::{MenuChoice, PromptBackend, PromptError, PromptOutcome};
use crate::shared::logging::EventLog;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;

const MENU_HINT_TEXT: &str = "Up/Down move | Enter select | Esc cancel";
const INPUT_HINT_TEXT: &str = "Enter apply | Esc cancel (empty input cancels)";
const MESSAGE_HINT_TEXT: &str = "Press any key to continue";
const YESNO_HINT_TEXT: &str = "Left/Right or Tab switch | y/n | Enter confirm | Esc cancel";

type DialogTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Full-screen dialogs drawn with ratatui. The terminal stays in raw mode on
/// the alternate screen until the backend is dropped.
pub struct DialogBackend {
    terminal: DialogTerminal,
    title: String,
    log: EventLog,
}

enum KeyInput {
    Key(KeyEvent),
    Interrupt,
}

impl DialogBackend {
    pub fn start(log: EventLog) -> Result<Self, PromptError> {
        enable_raw_mode().map_err(PromptError::RawMode)?;
        let mut stdout = io::stdout();
        if let Err(source) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(PromptError::EnterScreen(source));
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self {
                terminal,
                title: String::new(),
                log,
            }),
            Err(source) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
                Err(PromptError::Terminal(source))
            }
        }
    }

    fn next_key(&mut self) -> io::Result<KeyInput> {
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(KeyInput::Interrupt);
            }
            return Ok(KeyInput::Key(key));
        }
    }

    fn report(&self, what: &str, err: &io::Error) {
        self.log
            .error("prompt.dialog_failed", &format!("failed to {what}: {err}"));
    }

    fn run_menu(&mut self, title: &str, choices: &[MenuChoice]) -> io::Result<Option<String>> {
        let mut selected = 0usize;
        loop {
            self.terminal
                .draw(|frame| draw_menu(frame, &self.title, title, choices, selected))?;
            let KeyInput::Key(key) = self.next_key()? else {
                return Ok(None);
            };
            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Up => selected = selected.saturating_sub(1),
                KeyCode::Down => {
                    selected = std::cmp::min(selected + 1, choices.len().saturating_sub(1))
                }
                KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => {
                    if let Some(choice) = choices.get(selected) {
                        return Ok(Some(choice.tag.clone()));
                    }
                }
                _ => {}
            }
        }
    }

    fn run_input(&mut self, query: &str) -> io::Result<Option<String>> {
        let mut value = String::new();
        loop {
            self.terminal
                .draw(|frame| draw_input(frame, &self.title, query, &value))?;
            let KeyInput::Key(key) = self.next_key()? else {
                return Ok(None);
            };
            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => {
                    let trimmed = value.trim();
                    return Ok((!trimmed.is_empty()).then(|| trimmed.to_string()));
                }
                KeyCode::Backspace => {
                    value.pop();
                }
                KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    value.push(ch)
                }
                _ => {}
            }
        }
    }

    fn run_message(&mut self, message: &str) -> io::Result<()> {
        self.terminal
            .draw(|frame| draw_message(frame, &self.title, message))?;
        self.next_key()?;
        Ok(())
    }

    fn run_yesno(&mut self, question: &str) -> io::Result<bool> {
        let mut yes_selected = false;
        loop {
            self.terminal
                .draw(|frame| draw_yesno(frame, &self.title, question, yes_selected))?;
            let KeyInput::Key(key) = self.next_key()? else {
                return Ok(false);
            };
            match key.code {
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => return Ok(false),
                KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(true),
                KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                    yes_selected = !yes_selected
                }
                KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => {
                    return Ok(yes_selected)
                }
                _ => {}
            }
        }
    }
}

impl Drop for DialogBackend {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), Show, LeaveAlternateScreen);
    }
}

impl PromptBackend for DialogBackend {
    fn set_background_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn menu(&mut self, title: &str, choices: &[MenuChoice]) -> PromptOutcome<String> {
        match self.run_menu(title, choices) {
            Ok(Some(tag)) => PromptOutcome::Ok(tag),
            Ok(None) => PromptOutcome::Cancelled,
            Err(err) => {
                self.report("render menu", &err);
                PromptOutcome::Cancelled
            }
        }
    }

    fn inputbox(&mut self, query: &str) -> PromptOutcome<String> {
        match self.run_input(query) {
            Ok(Some(value)) => PromptOutcome::Ok(value),
            Ok(None) => PromptOutcome::Cancelled,
            Err(err) => {
                self.report("render input", &err);
                PromptOutcome::Cancelled
            }
        }
    }

    fn msgbox(&mut self, message: &str) {
        if let Err(err) = self.run_message(message) {
            self.report("render message", &err);
        }
    }

    fn yesno(&mut self, question: &str) -> PromptOutcome<()> {
        match self.run_yesno(question) {
            Ok(true) => PromptOutcome::Ok(()),
            Ok(false) => PromptOutcome::Cancelled,
            Err(err) => {
                self.report("render confirmation", &err);
                PromptOutcome::Cancelled
            }
        }
    }
}

fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Header, body and footer rows shared by every dialog.
fn screen_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn draw_frame_chrome(frame: &mut Frame<'_>, background: &str, hint: &str) -> Rect {
    let [header, body, footer] = screen_chunks(frame.area());
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(background.to_string(), title_style())))
            .block(Block::default().borders(Borders::ALL)),
        header,
    );
    frame.render_widget(
        Paragraph::new(Line::from(hint.to_string()))
            .block(Block::default().borders(Borders::ALL)),
        footer,
    );
    body
}

fn draw_menu(
    frame: &mut Frame<'_>,
    background: &str,
    title: &str,
    choices: &[MenuChoice],
    selected: usize,
) {
    let body = draw_frame_chrome(frame, background, MENU_HINT_TEXT);
    let width = choices
        .iter()
        .map(|choice| choice.tag.chars().count())
        .max()
        .unwrap_or(0);
    let items: Vec<ListItem> = choices
        .iter()
        .enumerate()
        .map(|(idx, choice)| {
            let summary = choice.description.lines().next().unwrap_or_default();
            let item = ListItem::new(Line::from(format!(
                "{tag:<pad$}{summary}",
                tag = choice.tag,
                pad = width + 2
            )));
            if idx == selected {
                item.style(selected_style())
            } else {
                item
            }
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title.to_string(), title_style()))
        .padding(Padding::new(3, 3, 1, 1));
    frame.render_widget(List::new(items).block(block), body);
}

fn draw_input(frame: &mut Frame<'_>, background: &str, query: &str, value: &str) {
    draw_frame_chrome(frame, background, INPUT_HINT_TEXT);
    let area = centered_rect(70, 30, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(2, 2, 1, 1));
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);
    let max_input_width = rows[2].width.saturating_sub(2) as usize;
    let display_value = tail_for_display(value, max_input_width);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(query.to_string(), title_style()))),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(format!("> {display_value}"))),
        rows[2],
    );
    frame.set_cursor_position((
        rows[2].x + 2 + display_value.chars().count() as u16,
        rows[2].y,
    ));
}

fn draw_message(frame: &mut Frame<'_>, background: &str, message: &str) {
    draw_frame_chrome(frame, background, MESSAGE_HINT_TEXT);
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(
        Paragraph::new(message.to_string())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding::new(2, 2, 1, 1)),
            ),
        area,
    );
}

fn draw_yesno(frame: &mut Frame<'_>, background: &str, question: &str, yes_selected: bool) {
    draw_frame_chrome(frame, background, YESNO_HINT_TEXT);
    let area = centered_rect(60, 40, frame.area());
    let button = |label: &'static str, active: bool| {
        if active {
            Span::styled(format!("[ {label} ]"), selected_style())
        } else {
            Span::raw(format!("  {label}  "))
        }
    };
    let mut lines: Vec<Line> = question
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        button("Yes", yes_selected),
        Span::raw("    "),
        button("No", !yes_selected),
    ]));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::new(2, 2, 1, 1)),
        ),
        area,
    );
}

pub(crate) fn tail_for_display(value: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max_chars {
        return value.to_string();
    }
    chars[chars.len() - max_chars..].iter().collect()
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

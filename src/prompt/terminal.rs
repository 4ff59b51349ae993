use console::{Key, Style, Term};
use std::io;

use crate::error::{BuddyError, Result};

use super::select::SelectState;
use super::{is_yes, Accent, Prompter};

/// Prompts rendered on stderr through `console`.
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn ensure_terminal(&self) -> Result<()> {
        if self.term.is_term() {
            Ok(())
        } else {
            Err(BuddyError::Prompt(
                "not attached to an interactive terminal".to_string(),
            ))
        }
    }

    /// Redraws the selector and returns how many lines it occupies.
    fn render(&self, label: &str, state: &SelectState<'_>, style: &Style) -> io::Result<usize> {
        self.term.write_line(&format!(
            "{} {} {}",
            style.apply_to("?").bold(),
            console::style(label).bold(),
            state.query()
        ))?;

        let mut lines = 1;
        for (item, highlighted) in state.visible() {
            if highlighted {
                self.term
                    .write_line(&format!("▸ {}", style.apply_to(item).bold()))?;
            } else {
                self.term.write_line(&format!("  {}", style.apply_to(item)))?;
            }
            lines += 1;
        }

        if lines == 1 {
            self.term
                .write_line(&format!("  {}", console::style("no matches").dim()))?;
            lines += 1;
        }

        Ok(lines)
    }

    fn run_select(&self, label: &str, items: &[String], style: &Style) -> io::Result<usize> {
        let mut state = SelectState::new(items);
        let mut drawn = self.render(label, &state, style)?;

        loop {
            let key = self.term.read_key()?;
            match key {
                Key::Enter => {
                    if let Some(index) = state.selected() {
                        self.term.clear_last_lines(drawn)?;
                        self.term.write_line(&format!(
                            "{} {} {}",
                            style.apply_to("✔").bold(),
                            console::style(label).bold(),
                            style.apply_to(&items[index]).bold()
                        ))?;
                        return Ok(index);
                    }
                    continue;
                }
                Key::Escape | Key::Char('\u{3}') => {
                    self.term.clear_last_lines(drawn)?;
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"));
                }
                Key::ArrowUp => state.move_up(),
                Key::ArrowDown | Key::Tab => state.move_down(),
                Key::Backspace => state.pop_char(),
                Key::Char(c) if !c.is_control() => state.push_char(c),
                _ => continue,
            }

            self.term.clear_last_lines(drawn)?;
            drawn = self.render(label, &state, style)?;
        }
    }

    fn ask(&self, label: &str) -> io::Result<()> {
        self.term.write_str(&format!(
            "{} {}: ",
            console::style("?").yellow().bold(),
            console::style(label).bold()
        ))
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&self, label: &str, items: &[String], accent: Accent) -> Result<usize> {
        if items.is_empty() {
            return Err(BuddyError::Prompt(format!("{label}: nothing to choose from")));
        }
        self.ensure_terminal()?;

        let style = match accent {
            Accent::Cyan => Style::new().cyan(),
            Accent::Green => Style::new().green(),
            Accent::Magenta => Style::new().magenta(),
        };

        self.term
            .hide_cursor()
            .map_err(|e| prompt_error(label, &e))?;
        let result = self.run_select(label, items, &style);
        let _ = self.term.show_cursor();
        result.map_err(|e| prompt_error(label, &e))
    }

    fn confirm(&self, label: &str) -> Result<bool> {
        self.ensure_terminal()?;
        let label = format!("{label} (yes/no)");
        self.ask(&label)
            .and_then(|()| self.term.read_line())
            .map(|answer| is_yes(&answer))
            .map_err(|e| prompt_error(&label, &e))
    }

    fn input(&self, label: &str) -> Result<String> {
        self.ensure_terminal()?;
        self.ask(label)
            .and_then(|()| self.term.read_line())
            .map(|answer| answer.trim().to_string())
            .map_err(|e| prompt_error(label, &e))
    }

    fn secret(&self, label: &str) -> Result<String> {
        self.ensure_terminal()?;
        self.ask(label)
            .and_then(|()| self.term.read_secure_line())
            .map(|answer| answer.trim().to_string())
            .map_err(|e| prompt_error(label, &e))
    }
}

fn prompt_error(label: &str, error: &io::Error) -> BuddyError {
    BuddyError::Prompt(format!("{label}: {error}"))
}

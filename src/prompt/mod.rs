//! Interactive prompts: single selection with a live filter, yes/no
//! confirmation and free-text input.

#[cfg(test)]
pub(crate) mod scripted;
mod select;
mod terminal;

pub use select::{filter_candidates, SelectState};
pub use terminal::TerminalPrompter;

use crate::error::Result;

/// Colour used to render a selector's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Cyan,
    Green,
    Magenta,
}

/// Source of user decisions.
///
/// Every method blocks until the user answers. Cancelling or a failed
/// terminal read is reported as [`crate::error::BuddyError::Prompt`].
pub trait Prompter {
    /// Pick one of `items` (must not be empty), returning its index.
    fn select(&self, label: &str, items: &[String], accent: Accent) -> Result<usize>;

    /// Ask a yes/no question. Only "yes" counts as agreement.
    fn confirm(&self, label: &str) -> Result<bool>;

    fn input(&self, label: &str) -> Result<String>;

    /// Like [`Prompter::input`], without echoing what is typed.
    fn secret(&self, label: &str) -> Result<String>;
}

/// `true` only for an explicit "yes", ignoring case and surrounding whitespace.
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

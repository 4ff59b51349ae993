use console::style;

use crate::buddy::ExecutionStatus;

/// Styling helpers for terminal output
pub fn bright_yellow(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn bright_green(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn bright_red(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().red()
}

pub fn cyan(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).cyan()
}

pub fn cyan_bold(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).cyan().bold()
}

pub fn dim(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn magenta_bold(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

/// Green for success, yellow while pending, red for failure, dim for everything else.
pub fn status(status: &ExecutionStatus) -> console::StyledObject<String> {
    match status {
        ExecutionStatus::Successful => bright_green(status),
        ExecutionStatus::Failed => bright_red(status),
        s if s.is_pending() => bright_yellow(status),
        _ => dim(status),
    }
}

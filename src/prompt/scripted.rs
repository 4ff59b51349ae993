use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::{BuddyError, Result};

use super::{filter_candidates, is_yes, Accent, Prompter};

/// A canned answer for [`ScriptedPrompter`].
#[derive(Debug, Clone)]
pub enum Answer {
    /// Type this filter and pick the first remaining candidate
    Pick(&'static str),
    Text(&'static str),
    Cancel,
}

/// Replays answers in order and records every question asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, label: &str) -> Result<Answer> {
        self.asked.borrow_mut().push(label.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| BuddyError::Prompt(format!("{label}: no scripted answer left")))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, label: &str, items: &[String], _accent: Accent) -> Result<usize> {
        assert!(!items.is_empty(), "selector opened on an empty list");
        match self.next(label)? {
            Answer::Pick(filter) => filter_candidates(items, filter)
                .first()
                .copied()
                .ok_or_else(|| BuddyError::Prompt(format!("{label}: no match for {filter}"))),
            Answer::Cancel => Err(BuddyError::Prompt(format!("{label}: cancelled"))),
            Answer::Text(text) => panic!("expected a selection for {label}, got text {text}"),
        }
    }

    fn confirm(&self, label: &str) -> Result<bool> {
        match self.next(label)? {
            Answer::Text(text) => Ok(is_yes(text)),
            Answer::Cancel => Err(BuddyError::Prompt(format!("{label}: cancelled"))),
            Answer::Pick(filter) => panic!("expected text for {label}, got selection {filter}"),
        }
    }

    fn input(&self, label: &str) -> Result<String> {
        match self.next(label)? {
            Answer::Text(text) => Ok(text.to_string()),
            Answer::Cancel => Err(BuddyError::Prompt(format!("{label}: cancelled"))),
            Answer::Pick(filter) => panic!("expected text for {label}, got selection {filter}"),
        }
    }

    fn secret(&self, label: &str) -> Result<String> {
        self.input(label)
    }
}

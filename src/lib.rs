pub mod auth;
pub mod buddy;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod git;
pub mod output;
pub mod prompt;

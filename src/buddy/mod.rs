mod api;
mod client;
mod endpoints;
mod types;

pub use api::BuddyApi;
pub use client::{BuddyClient, DEFAULT_API_URL};
pub use types::{Branch, Creator, Execution, ExecutionStatus, Pipeline, Project, Revision};

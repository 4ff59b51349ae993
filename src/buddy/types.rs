use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Buddy project within a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// URL-safe project identifier
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    /// Project state as reported by Buddy (e.g., "ACTIVE")
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub html_url: String,
}

/// A git branch of a project's repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    /// Whether this is the repository's default branch
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub html_url: String,
}

/// A pipeline definition within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub priority: String,
    /// Ref patterns the pipeline is configured for (e.g., "refs/heads/main")
    #[serde(default)]
    pub refs: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub html_url: String,
}

impl Pipeline {
    /// Label shown in the selector; the id keeps equally named pipelines apart.
    pub fn label(&self) -> String {
        format!("{} (#{})", self.name, self.id)
    }
}

/// The user who triggered an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Creator {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A revision reference as accepted and returned by the executions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Revision {
    pub revision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One run of a pipeline against a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub id: u64,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Unset until the execution reaches a terminal status
    #[serde(default)]
    pub finish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub triggered_on: Option<String>,
    #[serde(default)]
    pub creator: Option<Creator>,
    #[serde(default)]
    pub branch: Option<Branch>,
    #[serde(default)]
    pub pipeline: Option<Pipeline>,
    #[serde(default)]
    pub to_revision: Option<Revision>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub html_url: String,
}

/// Lifecycle status of an execution.
///
/// Wire values are case-sensitive. Anything Buddy adds later decodes as
/// `Unknown` instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Initial,
    Enqueued,
    InProgress,
    Successful,
    Failed,
    Skipped,
    Terminated,
    NotExecuted,
    Unknown(String),
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Initial => "INITIAL",
            Self::Enqueued => "ENQUEUED",
            Self::InProgress => "INPROGRESS",
            Self::Successful => "SUCCESSFUL",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::Terminated => "TERMINATED",
            Self::NotExecuted => "NOT_EXECUTED",
            Self::Unknown(value) => value,
        }
    }

    /// Statuses after which the execution may still change.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Initial | Self::Enqueued | Self::InProgress)
    }
}

impl From<String> for ExecutionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "INITIAL" => Self::Initial,
            "ENQUEUED" => Self::Enqueued,
            "INPROGRESS" => Self::InProgress,
            "SUCCESSFUL" => Self::Successful,
            "FAILED" => Self::Failed,
            "SKIPPED" => Self::Skipped,
            "TERMINATED" => Self::Terminated,
            "NOT_EXECUTED" => Self::NotExecuted,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST .../pipelines/{id}/executions`.
#[derive(Debug, Serialize)]
pub(crate) struct ExecutionRequest<'a> {
    pub to_revision: RevisionRef<'a>,
    pub branch: BranchRef<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RevisionRef<'a> {
    pub revision: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct BranchRef<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchesResponse {
    #[serde(default)]
    pub branches: Vec<Branch>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PipelinesResponse {
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
}

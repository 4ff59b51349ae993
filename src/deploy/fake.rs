use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::buddy::{BuddyApi, Branch, Execution, ExecutionStatus, Pipeline, Project};
use crate::error::{BuddyError, Result};

/// In-memory Buddy workspace holding a single project.
pub struct FakeBuddy {
    pub projects: Vec<Project>,
    pub branches: Vec<Branch>,
    pub pipelines: Vec<Pipeline>,
    statuses: Mutex<VecDeque<Result<ExecutionStatus>>>,
    calls: Mutex<Vec<String>>,
}

pub fn project(name: &str) -> Project {
    Project {
        name: name.to_string(),
        display_name: name.to_uppercase(),
        status: "ACTIVE".to_string(),
        url: String::new(),
        html_url: String::new(),
    }
}

pub fn branch(name: &str) -> Branch {
    Branch {
        name: name.to_string(),
        default: name == "main",
        url: String::new(),
        html_url: String::new(),
    }
}

pub fn pipeline(id: u64, name: &str) -> Pipeline {
    Pipeline {
        id,
        name: name.to_string(),
        priority: "NORMAL".to_string(),
        refs: vec![],
        url: String::new(),
        html_url: String::new(),
    }
}

impl FakeBuddy {
    pub fn new() -> Self {
        Self {
            projects: vec![project("web"), project("api")],
            branches: vec![branch("main"), branch("develop"), branch("feature/login")],
            pipelines: vec![pipeline(7, "CD"), pipeline(8, "Deploy to Staging")],
            statuses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Responses for successive status checks.
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = Result<ExecutionStatus>>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into_iter().collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn known_project(&self, name: &str) -> Result<()> {
        if self.projects.iter().any(|p| p.name == name) {
            Ok(())
        } else {
            Err(BuddyError::NotFound(format!("Project {name} not found")))
        }
    }
}

#[async_trait]
impl BuddyApi for FakeBuddy {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.record("list_projects".to_string());
        Ok(self.projects.clone())
    }

    async fn get_project(&self, name: &str) -> Result<Project> {
        self.record(format!("get_project {name}"));
        self.known_project(name)?;
        Ok(project(name))
    }

    async fn list_branches(&self, project: &str) -> Result<Vec<Branch>> {
        self.record(format!("list_branches {project}"));
        self.known_project(project)?;
        Ok(self.branches.clone())
    }

    async fn get_branch(&self, project: &str, name: &str) -> Result<Branch> {
        self.record(format!("get_branch {project} {name}"));
        self.branches
            .iter()
            .find(|b| b.name == name)
            .cloned()
            .ok_or_else(|| {
                BuddyError::NotFound(format!("Branch {name} not found in project {project}"))
            })
    }

    async fn list_pipelines(&self, project: &str) -> Result<Vec<Pipeline>> {
        self.record(format!("list_pipelines {project}"));
        self.known_project(project)?;
        Ok(self.pipelines.clone())
    }

    async fn get_pipeline(&self, project: &str, id: u64) -> Result<Pipeline> {
        self.record(format!("get_pipeline {project} {id}"));
        self.pipelines
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| {
                BuddyError::NotFound(format!("Pipeline {id} not found in project {project}"))
            })
    }

    async fn trigger_execution(
        &self,
        project: &str,
        pipeline_id: u64,
        branch: &str,
    ) -> Result<Execution> {
        self.record(format!("trigger_execution {project} {pipeline_id} {branch}"));
        Ok(serde_json::from_value(serde_json::json!({
            "id": 42,
            "status": "ENQUEUED",
            "triggered_on": "API",
            "creator": {"name": "Jane Doe"},
            "branch": {"name": branch},
            "html_url": format!("https://app.buddy.works/acme/{project}/pipelines/pipeline/{pipeline_id}/execution/42"),
        }))?)
    }

    async fn get_execution(
        &self,
        project: &str,
        pipeline_id: u64,
        execution_id: u64,
    ) -> Result<Execution> {
        self.record(format!("get_execution {project} {pipeline_id} {execution_id}"));
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BuddyError::Api {
                status: 500,
                message: "no scripted status left".to_string(),
            }))?;

        Ok(serde_json::from_value(serde_json::json!({
            "id": execution_id,
            "status": status.as_str(),
        }))?)
    }
}

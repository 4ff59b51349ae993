use async_trait::async_trait;

use crate::error::Result;

use super::types::{Branch, Execution, ExecutionStatus, Pipeline, Project};

/// Workspace-scoped operations against the Buddy REST API.
///
/// Implemented by [`super::BuddyClient`]; the deploy flow only depends on
/// this trait so it can run against an in-memory backend in tests.
#[async_trait]
pub trait BuddyApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>>;

    async fn get_project(&self, name: &str) -> Result<Project>;

    async fn list_branches(&self, project: &str) -> Result<Vec<Branch>>;

    async fn get_branch(&self, project: &str, name: &str) -> Result<Branch>;

    async fn list_pipelines(&self, project: &str) -> Result<Vec<Pipeline>>;

    async fn get_pipeline(&self, project: &str, id: u64) -> Result<Pipeline>;

    /// Starts `pipeline_id` on `branch` at `HEAD`.
    async fn trigger_execution(
        &self,
        project: &str,
        pipeline_id: u64,
        branch: &str,
    ) -> Result<Execution>;

    async fn get_execution(
        &self,
        project: &str,
        pipeline_id: u64,
        execution_id: u64,
    ) -> Result<Execution>;

    async fn get_execution_status(
        &self,
        project: &str,
        pipeline_id: u64,
        execution_id: u64,
    ) -> Result<ExecutionStatus> {
        Ok(self
            .get_execution(project, pipeline_id, execution_id)
            .await?
            .status)
    }
}

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::{BuddyError, Result};

use super::api::BuddyApi;
use super::client::BuddyClient;
use super::types::{
    Branch, BranchRef, BranchesResponse, Execution, ExecutionRequest, Pipeline, PipelinesResponse,
    Project, ProjectsResponse, RevisionRef,
};

const PROJECTS_PER_PAGE: &str = "100";

#[async_trait]
impl BuddyApi for BuddyClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut url = self.endpoint(&["projects"])?;
        url.query_pairs_mut()
            .append_pair("per_page", PROJECTS_PER_PAGE);

        let response = self.send(self.get(url)).await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: ProjectsResponse = Self::decode(response).await?;
        Ok(body.projects)
    }

    async fn get_project(&self, name: &str) -> Result<Project> {
        let url = self.endpoint(&["projects", name])?;
        let response = self.send(self.get(url)).await?;

        match response.status() {
            StatusCode::OK => Self::decode(response).await,
            StatusCode::NOT_FOUND => Err(BuddyError::NotFound(format!(
                "Project {name} not found"
            ))),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn list_branches(&self, project: &str) -> Result<Vec<Branch>> {
        let url = self.endpoint(&["projects", project, "repository", "branches"])?;
        let response = self.send(self.get(url)).await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: BranchesResponse = Self::decode(response).await?;
        Ok(body.branches)
    }

    async fn get_branch(&self, project: &str, name: &str) -> Result<Branch> {
        let url = self.endpoint(&["projects", project, "repository", "branches", name])?;
        let response = self.send(self.get(url)).await?;

        // Buddy does not distinguish a missing branch from other failures here
        if response.status() != StatusCode::OK {
            return Err(BuddyError::NotFound(format!(
                "Branch {name} not found in project {project}"
            )));
        }

        Self::decode(response).await
    }

    async fn list_pipelines(&self, project: &str) -> Result<Vec<Pipeline>> {
        let url = self.endpoint(&["projects", project, "pipelines"])?;
        let response = self.send(self.get(url)).await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: PipelinesResponse = Self::decode(response).await?;
        Ok(body.pipelines)
    }

    async fn get_pipeline(&self, project: &str, id: u64) -> Result<Pipeline> {
        let id = id.to_string();
        let url = self.endpoint(&["projects", project, "pipelines", &id])?;
        let response = self.send(self.get(url)).await?;

        match response.status() {
            StatusCode::OK => Self::decode(response).await,
            StatusCode::NOT_FOUND => Err(BuddyError::NotFound(format!(
                "Pipeline {id} not found in project {project}"
            ))),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn trigger_execution(
        &self,
        project: &str,
        pipeline_id: u64,
        branch: &str,
    ) -> Result<Execution> {
        let pipeline_id = pipeline_id.to_string();
        let url = self.endpoint(&["projects", project, "pipelines", &pipeline_id, "executions"])?;
        let body = ExecutionRequest {
            to_revision: RevisionRef { revision: "HEAD" },
            branch: BranchRef { name: branch },
        };

        let response = self.send(self.post(url).json(&body)).await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Self::decode(response).await,
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn get_execution(
        &self,
        project: &str,
        pipeline_id: u64,
        execution_id: u64,
    ) -> Result<Execution> {
        let pipeline_id = pipeline_id.to_string();
        let execution_id = execution_id.to_string();
        let url = self.endpoint(&[
            "projects",
            project,
            "pipelines",
            &pipeline_id,
            "executions",
            &execution_id,
        ])?;
        let response = self.send(self.get(url)).await?;

        if response.status() != StatusCode::OK {
            return Err(Self::api_error(response).await);
        }

        Self::decode(response).await
    }
}

//! Interactive deployment: resolve a project, branch and pipeline, guard
//! against protected names, trigger an execution and watch it.

#[cfg(test)]
mod fake;
mod guard;
mod watch;

pub use guard::ensure_deployable;
pub use watch::{watch_execution, ExecutionRef, WatchOutcome, POLL_INTERVAL};

use log::info;
use std::time::Duration;

use crate::buddy::{BuddyApi, Branch, Execution, Pipeline, Project};
use crate::config::Protected;
use crate::error::{BuddyError, Result};
use crate::output::{self, Spinner};
use crate::prompt::{Accent, Prompter};

/// What the user asked to deploy. Anything left `None` is chosen interactively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployOptions {
    pub project: Option<String>,
    pub branch: Option<String>,
    pub pipeline: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The user declined the final confirmation
    Cancelled,
    Triggered {
        execution: Execution,
        watch: WatchOutcome,
    },
}

/// Runs one deployment against a Buddy workspace.
pub struct Deployer<'a> {
    api: &'a dyn BuddyApi,
    prompter: &'a dyn Prompter,
    protected: Option<&'a Protected>,
    poll_interval: Duration,
}

impl<'a> Deployer<'a> {
    pub fn new(
        api: &'a dyn BuddyApi,
        prompter: &'a dyn Prompter,
        protected: Option<&'a Protected>,
    ) -> Self {
        Self {
            api,
            prompter,
            protected,
            poll_interval: POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Resolve, guard, confirm, trigger and watch.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup or prompt fails, the selection is
    /// protected, or the trigger request is rejected. Failures while
    /// watching are reported in the [`WatchOutcome`] instead.
    pub async fn run(&self, options: &DeployOptions) -> Result<DeployOutcome> {
        let project = self.resolve_project(options.project.as_deref()).await?;

        // An explicit pipeline is checked before any branch prompt is shown
        let explicit_pipeline = match options.pipeline {
            Some(id) => Some(self.lookup_pipeline(&project.name, id).await?),
            None => None,
        };

        let branch = self
            .resolve_branch(&project.name, options.branch.as_deref())
            .await?;

        let pipeline = match explicit_pipeline {
            Some(pipeline) => pipeline,
            None => self.select_pipeline(&project.name).await?,
        };

        ensure_deployable(self.protected, &pipeline, &branch)?;

        eprintln!("You selected project: {}", output::cyan_bold(&project.name));
        eprintln!("You selected branch: {}", output::cyan_bold(&branch.name));
        eprintln!(
            "You selected pipeline: {} ({})",
            output::cyan_bold(&pipeline.name),
            output::cyan_bold(pipeline.id)
        );

        if !self.prompter.confirm("Are you sure you want to deploy")? {
            eprintln!("Deployment canceled.");
            return Ok(DeployOutcome::Cancelled);
        }

        info!(
            "Triggering pipeline {} of {} on {}",
            pipeline.id, project.name, branch.name
        );
        let execution = self
            .api
            .trigger_execution(&project.name, pipeline.id, &branch.name)
            .await?;

        report_triggered(&execution);

        let target = ExecutionRef {
            project: project.name,
            pipeline_id: pipeline.id,
            execution_id: execution.id,
            html_url: execution.html_url.clone(),
        };
        let watch = watch_execution(self.api, self.prompter, &target, self.poll_interval).await;

        Ok(DeployOutcome::Triggered { execution, watch })
    }

    async fn resolve_project(&self, name: Option<&str>) -> Result<Project> {
        if let Some(name) = name {
            eprintln!("Looking up project: {name}");
            let project = self.api.get_project(name).await?;
            info!("Project found: {}", project.name);
            return Ok(project);
        }

        let spinner = Spinner::start("Fetching projects");
        let projects = self.api.list_projects().await;
        spinner.finish();
        let mut projects = projects?;

        let labels: Vec<String> = projects.iter().map(|p| p.name.clone()).collect();
        let index = self.choose("Select a Project", &labels, Accent::Cyan, "projects")?;
        Ok(projects.swap_remove(index))
    }

    async fn resolve_branch(&self, project: &str, name: Option<&str>) -> Result<Branch> {
        if let Some(name) = name {
            eprintln!("Looking up branch: {name}");
            let branch = self.api.get_branch(project, name).await?;
            info!("Branch found: {}", branch.name);
            return Ok(branch);
        }

        let spinner = Spinner::start("Fetching branches");
        let branches = self.api.list_branches(project).await;
        spinner.finish();
        let mut branches = branches?;

        let labels: Vec<String> = branches.iter().map(|b| b.name.clone()).collect();
        let index = self.choose("Select a Branch", &labels, Accent::Green, "branches")?;
        Ok(branches.swap_remove(index))
    }

    async fn lookup_pipeline(&self, project: &str, id: u64) -> Result<Pipeline> {
        eprintln!("Using pipeline passed as flag: {id}");
        let pipeline = self.api.get_pipeline(project, id).await?;
        info!("Pipeline found: {} {}", pipeline.id, pipeline.name);
        Ok(pipeline)
    }

    async fn select_pipeline(&self, project: &str) -> Result<Pipeline> {
        let spinner = Spinner::start("Fetching pipelines");
        let pipelines = self.api.list_pipelines(project).await;
        spinner.finish();
        let mut pipelines = pipelines?;

        let labels: Vec<String> = pipelines.iter().map(Pipeline::label).collect();
        let index = self.choose("Select Pipeline", &labels, Accent::Magenta, "pipelines")?;
        Ok(pipelines.swap_remove(index))
    }

    fn choose(&self, label: &str, items: &[String], accent: Accent, what: &str) -> Result<usize> {
        if items.is_empty() {
            return Err(BuddyError::NotFound(format!("No {what} available")));
        }
        self.prompter.select(label, items, accent)
    }
}

fn report_triggered(execution: &Execution) {
    eprintln!(
        "{}\nTriggered On: {}\nStatus: {}",
        output::bright_green("Pipeline execution started successfully!"),
        output::cyan(execution.triggered_on.as_deref().unwrap_or("-")),
        output::status(&execution.status)
    );
    if let Some(creator) = &execution.creator {
        eprintln!("Executed By: {}", output::cyan(&creator.name));
    }
    eprintln!("Checkout the execution at: {}", output::cyan(&execution.html_url));
}

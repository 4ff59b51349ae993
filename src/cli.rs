use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use crate::buddy::{BuddyApi, BuddyClient, DEFAULT_API_URL};
use crate::config::{Config, ConfigKey};
use crate::deploy::{DeployOptions, Deployer};
use crate::error::BuddyError;
use crate::git::WorkingCopy;
use crate::output::{self, config_table, execution_table};
use crate::prompt::{Prompter, TerminalPrompter};

#[derive(Parser)]
#[command(name = "buddyctl")]
#[command(author, version, about = "Trigger and watch Buddy pipelines", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ~/.buddy_config.json)
    #[arg(long, global = true, env = "BUDDYCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Buddy API base URL
    #[arg(long, global = true, env = "BUDDY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure your token, workspace and protected names
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Select a project, branch, and pipeline for deployment
    ///
    /// The project can be given as an argument, the branch and pipeline as
    /// flags; anything missing is selected interactively.
    Deploy {
        /// Project name
        project: Option<String>,

        /// Branch to deploy
        #[arg(short, long)]
        branch: Option<String>,

        /// Pipeline ID to run
        #[arg(short, long)]
        pipeline: Option<u64>,

        /// Use the current directory as project and the checked out git branch
        #[arg(short, long, default_value_t = false)]
        current: bool,
    },

    /// Show the status of a pipeline execution
    Status {
        project: String,
        pipeline: u64,
        execution: u64,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current configuration
    Get,

    /// Set one value, or prompt for token and workspace when called without arguments
    Set {
        /// token, workspace, protected.branch or protected.pipeline
        #[arg(requires = "value")]
        key: Option<String>,

        value: Option<String>,
    },

    /// Delete the saved configuration
    Reset,
}

impl Cli {
    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::default_path()?),
        }
    }

    fn client(&self, config: &Config) -> Result<BuddyClient> {
        config.ensure_complete()?;
        Ok(BuddyClient::new(
            &self.api_url,
            &config.workspace,
            config.token(),
        )?)
    }

    async fn execute_deploy(
        &self,
        project: Option<&str>,
        branch: Option<&str>,
        pipeline: Option<u64>,
        current: bool,
    ) -> Result<()> {
        let config = load_config(&self.config_path()?)?;
        let client = self.client(&config)?;

        let working_copy = if current {
            let dir = std::env::current_dir().context("Failed to read current directory")?;
            let working_copy = WorkingCopy::detect(&dir)?;
            info!(
                "Using current project {} and branch {}",
                working_copy.project, working_copy.branch
            );
            Some(working_copy)
        } else {
            None
        };

        let options = deploy_options(project, branch, pipeline, working_copy);
        let prompter = TerminalPrompter::new();

        Deployer::new(&client, &prompter, config.protected.as_ref())
            .run(&options)
            .await?;

        Ok(())
    }

    async fn execute_status(&self, project: &str, pipeline: u64, execution: u64) -> Result<()> {
        let config = load_config(&self.config_path()?)?;
        let client = self.client(&config)?;

        let execution = client
            .get_execution(project, pipeline, execution)
            .await
            .with_context(|| format!("Failed to fetch execution {execution}"))?;

        println!("{}", execution_table(&execution));
        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Config { action } => {
                let path = self.config_path()?;
                let prompter = TerminalPrompter::new();
                match action {
                    ConfigAction::Get => config_get(&path, &prompter),
                    ConfigAction::Set {
                        key: Some(key),
                        value: Some(value),
                    } => config_set_value(&path, key, value),
                    ConfigAction::Set { .. } => config_set_interactive(&path, &prompter),
                    ConfigAction::Reset => config_reset(&path, &prompter),
                }
            }
            Commands::Deploy {
                project,
                branch,
                pipeline,
                current,
            } => {
                self.execute_deploy(project.as_deref(), branch.as_deref(), *pipeline, *current)
                    .await
            }
            Commands::Status {
                project,
                pipeline,
                execution,
            } => self.execute_status(project, *pipeline, *execution).await,
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    match Config::load(path) {
        Err(BuddyError::MissingConfig(path)) => Err(anyhow::anyhow!(
            "No configuration found at {path}. Run `buddyctl config set` first"
        )),
        other => Ok(other?),
    }
}

/// Explicit arguments win over values inferred from the working copy.
fn deploy_options(
    project: Option<&str>,
    branch: Option<&str>,
    pipeline: Option<u64>,
    working_copy: Option<WorkingCopy>,
) -> DeployOptions {
    let (current_project, current_branch) = working_copy
        .map(|w| (Some(w.project), Some(w.branch)))
        .unwrap_or_default();

    DeployOptions {
        project: project.map(ToString::to_string).or(current_project),
        branch: branch.map(ToString::to_string).or(current_branch),
        pipeline,
    }
}

fn config_get(path: &Path, prompter: &dyn Prompter) -> Result<()> {
    let config = match Config::load(path) {
        Ok(config) => config,
        Err(BuddyError::MissingConfig(_)) => {
            eprintln!("{}", output::bright_red("No configuration found."));
            if prompter.confirm("Would you like to create one?")? {
                return config_set_interactive(path, prompter);
            }
            eprintln!("No configuration created.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    println!("{}", console::style("Current Configuration:").bold());
    println!("{}", config_table(&config));
    Ok(())
}

fn config_set_value(path: &Path, key: &str, value: &str) -> Result<()> {
    let parsed: ConfigKey = key.parse()?;
    let mut config = Config::load_or_default(path).context("Failed to load existing config")?;
    config.set(parsed, value);
    config.save(path)?;

    let shown = match parsed {
        ConfigKey::Token => config.token().masked(),
        _ if value.is_empty() => "(not set)".to_string(),
        _ => value.to_string(),
    };
    eprintln!("{} updated to: {}", key.to_lowercase(), output::bright_yellow(shown));
    eprintln!("{}", output::bright_green("Configuration updated successfully!"));
    Ok(())
}

fn config_set_interactive(path: &Path, prompter: &dyn Prompter) -> Result<()> {
    let mut config = Config::load_or_default(path).context("Failed to load existing config")?;

    if config.token.is_empty() {
        let token = prompter.secret("Enter your Buddy API token")?;
        config.set(ConfigKey::Token, &token);
    }
    if config.workspace.is_empty() {
        let workspace = prompter.input("Enter your Buddy workspace")?;
        config.set(ConfigKey::Workspace, &workspace);
    }

    config.save(path)?;
    eprintln!("{}", output::bright_green("Configuration saved successfully!"));
    Ok(())
}

fn config_reset(path: &Path, prompter: &dyn Prompter) -> Result<()> {
    if !prompter.confirm("Are you sure you want to reset the configuration?")? {
        eprintln!("Reset canceled.");
        return Ok(());
    }

    if Config::reset(path)? {
        eprintln!("{}", output::bright_green("Configuration has been reset."));
    } else {
        eprintln!("Nothing to reset.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::scripted::{Answer, ScriptedPrompter};

    fn working_copy() -> Option<WorkingCopy> {
        Some(WorkingCopy {
            project: "shop".to_string(),
            branch: "release".to_string(),
        })
    }

    #[test]
    fn test_cli_parses_deploy_flags() {
        let cli = Cli::try_parse_from(["buddyctl", "deploy", "web", "-b", "main", "-p", "7", "-c"])
            .unwrap();
        match cli.command {
            Commands::Deploy {
                project,
                branch,
                pipeline,
                current,
            } => {
                assert_eq!(project.as_deref(), Some("web"));
                assert_eq!(branch.as_deref(), Some("main"));
                assert_eq!(pipeline, Some(7));
                assert!(current);
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn test_cli_rejects_non_numeric_pipeline() {
        assert!(Cli::try_parse_from(["buddyctl", "deploy", "-p", "CD"]).is_err());
    }

    #[test]
    fn test_cli_set_requires_value_with_key() {
        assert!(Cli::try_parse_from(["buddyctl", "config", "set", "token"]).is_err());
        assert!(Cli::try_parse_from(["buddyctl", "config", "set", "token", "abc"]).is_ok());
        assert!(Cli::try_parse_from(["buddyctl", "config", "set"]).is_ok());
    }

    #[test]
    fn test_deploy_options_from_working_copy() {
        let options = deploy_options(None, None, Some(3), working_copy());
        assert_eq!(options.project.as_deref(), Some("shop"));
        assert_eq!(options.branch.as_deref(), Some("release"));
        assert_eq!(options.pipeline, Some(3));
    }

    #[test]
    fn test_explicit_values_override_working_copy() {
        let options = deploy_options(Some("web"), Some("main"), None, working_copy());
        assert_eq!(options.project.as_deref(), Some("web"));
        assert_eq!(options.branch.as_deref(), Some("main"));

        let options = deploy_options(None, None, None, None);
        assert_eq!(options, DeployOptions::default());
    }

    #[test]
    fn test_config_set_value_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        config_set_value(&path, "workspace", "acme").unwrap();
        config_set_value(&path, "protected.pipeline", "CD").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.workspace, "acme");
        assert_eq!(config.protected_pipeline(), Some("CD"));
    }

    #[test]
    fn test_config_set_value_rejects_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(config_set_value(&path, "region", "eu").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_config_set_interactive_prompts_only_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        config_set_value(&path, "workspace", "acme").unwrap();

        let prompter = ScriptedPrompter::new([Answer::Text("tok-123")]);
        config_set_interactive(&path, &prompter).unwrap();

        assert_eq!(prompter.asked(), vec!["Enter your Buddy API token"]);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.token, "tok-123");
        assert_eq!(config.workspace, "acme");
    }

    #[test]
    fn test_config_get_offers_to_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let prompter = ScriptedPrompter::new([
            Answer::Text("yes"),
            Answer::Text("tok"),
            Answer::Text("acme"),
        ]);

        config_get(&path, &prompter).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.token, "tok");
        assert_eq!(config.workspace, "acme");
    }

    #[test]
    fn test_config_get_declined_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let prompter = ScriptedPrompter::new([Answer::Text("no")]);

        config_get(&path, &prompter).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_config_reset_requires_yes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        config_set_value(&path, "token", "abc").unwrap();

        config_reset(&path, &ScriptedPrompter::new([Answer::Text("no")])).unwrap();
        assert!(path.exists());

        config_reset(&path, &ScriptedPrompter::new([Answer::Text("yes")])).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_config_missing_has_hint() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("config.json")).unwrap_err();
        assert!(err.to_string().contains("config set"));
    }
}

use std::path::Path;
use std::process::Command;

use crate::error::{BuddyError, Result};

/// Project and branch inferred from a local working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    /// Name of the directory, used as the Buddy project name
    pub project: String,
    /// Checked out branch
    pub branch: String,
}

impl WorkingCopy {
    /// Inspect the git repository at `dir`.
    pub fn detect(dir: &Path) -> Result<Self> {
        if !is_git_repo(dir) {
            return Err(BuddyError::Git(format!(
                "{} is not a git repository",
                dir.display()
            )));
        }

        Ok(Self {
            project: directory_name(dir)?,
            branch: current_branch(dir)?,
        })
    }
}

fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| BuddyError::Git(format!("Failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BuddyError::Git(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn is_git_repo(dir: &Path) -> bool {
    git(dir, &["rev-parse", "--is-inside-work-tree"]).is_ok_and(|out| out == "true")
}

fn current_branch(dir: &Path) -> Result<String> {
    let branch = git(dir, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    if branch.is_empty() || branch == "HEAD" {
        return Err(BuddyError::Git("HEAD is detached, no current branch".to_string()));
    }
    Ok(branch)
}

fn directory_name(dir: &Path) -> Result<String> {
    let absolute = dir.canonicalize()?;
    absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| BuddyError::Git(format!("{} has no directory name", dir.display())))
}

//! Git command wrappers.
//!
//! This module provides a thin wrapper around the git CLI, handling command
//! execution and error formatting, plus the [`Git`] trait the classifier and
//! sync operation call through.

use crate::constants::{PULL_ARGS, REMOTE_SHOW_ARGS};
use anyhow::Context;
use colored::Colorize;
use std::path::Path;

/// Callback invoked with the working directory and arguments of every git
/// command before it runs.
pub type GitLogger = fn(&Path, &[&str]);

/// Prints each git command to stderr.
pub fn verbose_logger(repo: &Path, args: &[&str]) {
    eprintln!(
        "  {}",
        format!("$ git {}  ({})", args.join(" "), repo.display()).dimmed()
    );
}

pub fn no_op_logger(_repo: &Path, _args: &[&str]) {}

/// Output of a git command that exited successfully.
///
/// `stderr` may be non-empty even on success: git writes progress and
/// advisory messages there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `git <args>` in `repo`.
///
/// Fails when the process cannot be spawned or exits unsuccessfully; the
/// error message then carries git's stderr.
pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<GitOutput> {
    let output = std::process::Command::new("git")
        .current_dir(repo)
        .args(args)
        .output()
        .with_context(|| format!("Failed to spawn git command in {}", repo.display()))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        Ok(GitOutput { stdout, stderr })
    } else {
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim())
    }
}

/// The git operations the tree walker needs.
pub trait Git: Sync {
    /// Lists the remotes configured for `repo`, one per line.
    fn list_remotes(&self, repo: &Path) -> anyhow::Result<GitOutput>;

    /// Pulls and rebases `repo` onto its upstream.
    fn pull(&self, repo: &Path) -> anyhow::Result<GitOutput>;
}

/// [`Git`] backed by the `git` executable on `PATH`.
#[derive(Debug, Clone, Copy)]
pub struct GitCli {
    logger: GitLogger,
}

impl GitCli {
    #[must_use]
    pub fn new(logger: GitLogger) -> Self {
        Self { logger }
    }

    fn run(&self, repo: &Path, args: &[&str]) -> anyhow::Result<GitOutput> {
        (self.logger)(repo, args);
        run_git(repo, args)
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(no_op_logger)
    }
}

impl Git for GitCli {
    fn list_remotes(&self, repo: &Path) -> anyhow::Result<GitOutput> {
        self.run(repo, REMOTE_SHOW_ARGS)
            .context("Failed to list remotes")
    }

    fn pull(&self, repo: &Path) -> anyhow::Result<GitOutput> {
        self.run(repo, PULL_ARGS).context("Failed to pull from remote")
    }
}

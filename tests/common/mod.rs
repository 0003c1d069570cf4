//! Test infrastructure for git-sync-tree integration tests.

#![allow(dead_code)]

use anyhow::Result;
use git_sync_tree::git::run_git;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree of git repositories, with their bare remotes
/// kept in a separate temporary directory so the walker never sees them.
/// Everything is cleaned up when dropped.
pub struct Workspace {
    root: TempDir,
    remotes: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            root: TempDir::new()?,
            remotes: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a plain directory at `rel`.
    pub fn add_dir(&self, rel: &str) -> Result<PathBuf> {
        let path = self.path().join(rel);
        std::fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Creates a repository at `rel` with an initial commit and no remote.
    pub fn add_repo(&self, rel: &str) -> Result<PathBuf> {
        let path = self.add_dir(rel)?;
        init_repo(&path, "master")?;
        Ok(path)
    }

    /// Creates a repository at `rel` tracking `origin/master` in a bare remote.
    pub fn add_repo_with_remote(&self, rel: &str) -> Result<PathBuf> {
        let path = self.add_repo(rel)?;
        let remote = self.remote_path(rel);
        std::fs::create_dir_all(&remote)?;
        run_git(&remote, &["init", "--bare", "-b", "master"])?;

        run_git(&path, &["remote", "add", "origin", path_str(&remote)])?;
        run_git(&path, &["push", "-u", "origin", "master"])?;
        Ok(path)
    }

    /// Commits `file` to the remote of `rel` from a separate clone.
    pub fn push_upstream_commit(&self, rel: &str, file: &str, content: &str) -> Result<()> {
        let clone_parent = TempDir::new()?;
        let clone = clone_parent.path().join("clone");
        run_git(
            clone_parent.path(),
            &["clone", path_str(&self.remote_path(rel)), "clone"],
        )?;
        configure_identity(&clone)?;

        std::fs::write(clone.join(file), content)?;
        run_git(&clone, &["add", file])?;
        let message = format!("Add {}", file);
        run_git(&clone, &["commit", "-m", message.as_str()])?;
        run_git(&clone, &["push", "origin", "master"])?;
        Ok(())
    }

    fn remote_path(&self, rel: &str) -> PathBuf {
        self.remotes
            .path()
            .join(format!("{}.git", rel.replace('/', "-")))
    }
}

/// Initializes a repository at `path` with one commit on `branch`.
pub fn init_repo(path: &Path, branch: &str) -> Result<()> {
    run_git(path, &["init", "-b", branch])?;
    configure_identity(path)?;

    std::fs::write(path.join("README.md"), "# Test Repo\n")?;
    run_git(path, &["add", "README.md"])?;
    run_git(path, &["commit", "-m", "Initial commit"])?;
    Ok(())
}

fn configure_identity(path: &Path) -> Result<()> {
    run_git(path, &["config", "user.email", "test@example.com"])?;
    run_git(path, &["config", "user.name", "Test User"])?;
    Ok(())
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are valid UTF-8")
}

/// True if `git status --porcelain` reports anything for `repo`.
pub fn is_dirty(repo: &Path) -> Result<bool> {
    Ok(!run_git(repo, &["status", "--porcelain"])?.stdout.trim().is_empty())
}

//! Test doubles shared by the unit tests.

use crate::constants::GIT_DIR;
use crate::git::{Git, GitOutput};
use crate::repo::{Diagnostic, SyncCallbacks, SyncResult};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

enum RemoteReply {
    Stdout(String),
    Stderr(String),
    Error(String),
}

/// [`Git`] that answers from canned replies and records every call.
/// Unknown repositories have an `origin` remote and pull cleanly.
#[derive(Default)]
pub struct FakeGit {
    remotes: HashMap<PathBuf, RemoteReply>,
    failing_pulls: HashSet<PathBuf>,
    remote_queries: Mutex<Vec<PathBuf>>,
    pulls: Mutex<Vec<PathBuf>>,
}

impl FakeGit {
    pub fn without_remote(mut self, repo: &Path) -> Self {
        self.remotes
            .insert(repo.to_path_buf(), RemoteReply::Stdout(String::new()));
        self
    }

    pub fn remote_stderr(mut self, repo: &Path, stderr: &str) -> Self {
        self.remotes
            .insert(repo.to_path_buf(), RemoteReply::Stderr(stderr.to_string()));
        self
    }

    pub fn remote_error(mut self, repo: &Path, error: &str) -> Self {
        self.remotes
            .insert(repo.to_path_buf(), RemoteReply::Error(error.to_string()));
        self
    }

    pub fn failing_pull(mut self, repo: &Path) -> Self {
        self.failing_pulls.insert(repo.to_path_buf());
        self
    }

    /// Repositories pulled so far, sorted.
    pub fn pulls(&self) -> Vec<PathBuf> {
        sorted(&self.pulls)
    }

    /// Repositories whose remotes were queried so far, sorted.
    pub fn remote_queries(&self) -> Vec<PathBuf> {
        sorted(&self.remote_queries)
    }
}

impl Git for FakeGit {
    fn list_remotes(&self, repo: &Path) -> anyhow::Result<GitOutput> {
        self.remote_queries.lock().unwrap().push(repo.to_path_buf());
        match self.remotes.get(repo) {
            None => Ok(GitOutput {
                stdout: "origin\n".to_string(),
                stderr: String::new(),
            }),
            Some(RemoteReply::Stdout(stdout)) => Ok(GitOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            Some(RemoteReply::Stderr(stderr)) => Ok(GitOutput {
                stdout: "origin\n".to_string(),
                stderr: stderr.clone(),
            }),
            Some(RemoteReply::Error(error)) => anyhow::bail!("git remote show failed: {}", error),
        }
    }

    fn pull(&self, repo: &Path) -> anyhow::Result<GitOutput> {
        self.pulls.lock().unwrap().push(repo.to_path_buf());
        if self.failing_pulls.contains(repo) {
            anyhow::bail!("git pull failed: fatal: could not read from remote repository")
        }
        Ok(GitOutput {
            stdout: "Already up to date.\n".to_string(),
            stderr: String::new(),
        })
    }
}

/// [`SyncCallbacks`] that remembers every event it receives.
#[derive(Default)]
pub struct RecordingCallbacks {
    diagnostics: Mutex<Vec<Diagnostic>>,
    started: Mutex<Vec<PathBuf>>,
    completed: Mutex<Vec<SyncResult>>,
    levels_done: Mutex<Vec<PathBuf>>,
}

impl RecordingCallbacks {
    /// Diagnostics in the order they were reported.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().unwrap().clone()
    }

    pub fn started(&self) -> Vec<PathBuf> {
        sorted(&self.started)
    }

    pub fn completed(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .completed
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect();
        paths.sort();
        paths
    }

    pub fn levels_done(&self) -> Vec<PathBuf> {
        sorted(&self.levels_done)
    }
}

impl SyncCallbacks for RecordingCallbacks {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic.clone());
    }

    fn on_sync_start(&self, path: &Path) {
        self.started.lock().unwrap().push(path.to_path_buf());
    }

    fn on_complete(&self, result: &SyncResult) {
        self.completed.lock().unwrap().push(result.clone());
    }

    fn on_level_done(&self, dir: &Path) {
        self.levels_done.lock().unwrap().push(dir.to_path_buf());
    }
}

fn sorted(paths: &Mutex<Vec<PathBuf>>) -> Vec<PathBuf> {
    let mut paths = paths.lock().unwrap().clone();
    paths.sort();
    paths
}

/// Creates a plain directory `parent/name`.
pub fn make_dir(parent: &Path, name: &str) -> std::io::Result<PathBuf> {
    let path = parent.join(name);
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Creates `parent/name` with an empty `.git` directory, enough for the
/// classifier to treat it as a repository.
pub fn make_repo(parent: &Path, name: &str) -> std::io::Result<PathBuf> {
    let path = make_dir(parent, name)?;
    std::fs::create_dir_all(path.join(GIT_DIR))?;
    Ok(path)
}

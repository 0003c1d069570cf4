// Repository classification, sync logic, result types

use crate::constants::{GIT_DIR, REMOTE_SHOW_ARGS, SKIP_MARKER};
use crate::git::Git;
use crate::output::display_name;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Something noteworthy found while classifying a directory.
///
/// None of these stop the walk; they are reported and the directory is left
/// out of the current batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    StatFailed { path: PathBuf, message: String },
    NotARepository { path: PathBuf },
    Skipped { path: PathBuf },
    RemoteQueryFailed { path: PathBuf, message: String },
    NoRemote { path: PathBuf },
    ListFailed { path: PathBuf, message: String },
}

impl Diagnostic {
    pub fn path(&self) -> &Path {
        match self {
            Diagnostic::StatFailed { path, .. }
            | Diagnostic::NotARepository { path }
            | Diagnostic::Skipped { path }
            | Diagnostic::RemoteQueryFailed { path, .. }
            | Diagnostic::NoRemote { path }
            | Diagnostic::ListFailed { path, .. } => path,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Diagnostic::StatFailed { path, message } => format!(
                "Something went wrong on \"{}\"\nMessage: {}",
                path.display(),
                message
            ),
            Diagnostic::NotARepository { .. } => "Not a git repository".to_string(),
            Diagnostic::Skipped { .. } => "Skip this git repository".to_string(),
            Diagnostic::RemoteQueryFailed { path, message } => format!(
                "Something went wrong on \"{}\" ... Command: git {} Message: {}",
                path.display(),
                REMOTE_SHOW_ARGS.join(" "),
                message
            ),
            Diagnostic::NoRemote { .. } => "Remote tracking repository is not defined".to_string(),
            Diagnostic::ListFailed { message, .. } => {
                format!("Failed to list directory: {}", message)
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", display_name(self.path()), self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The pull succeeded; git's own output is kept verbatim.
    Synced { stdout: String, stderr: String },
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct SyncResult {
    pub path: PathBuf,
    pub outcome: SyncOutcome,
    pub duration: Duration,
}

impl SyncResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Synced { .. })
    }
}

/// Receives progress events from classification and syncing.
///
/// Called concurrently from worker threads, so implementations must be `Sync`.
pub trait SyncCallbacks: Sync {
    fn on_diagnostic(&self, diagnostic: &Diagnostic);

    fn on_sync_start(&self, _path: &Path) {}

    fn on_complete(&self, result: &SyncResult);

    /// Every repository found directly under `dir` has finished syncing.
    fn on_level_done(&self, _dir: &Path) {}
}

/// Returns true if `path` exists and is a directory (symlinks are followed).
pub fn is_directory(path: &Path, callbacks: &dyn SyncCallbacks) -> bool {
    match std::fs::metadata(path) {
        Ok(metadata) => metadata.is_dir(),
        Err(e) => {
            callbacks.on_diagnostic(&Diagnostic::StatFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
            false
        }
    }
}

/// Returns true if `path` holds a `.git` entry that is not marked `.git/.skip`.
pub fn has_repo_marker(path: &Path, callbacks: &dyn SyncCallbacks) -> bool {
    let git_dir = path.join(GIT_DIR);
    if !git_dir.exists() {
        callbacks.on_diagnostic(&Diagnostic::NotARepository {
            path: path.to_path_buf(),
        });
        return false;
    }
    if git_dir.join(SKIP_MARKER).exists() {
        callbacks.on_diagnostic(&Diagnostic::Skipped {
            path: path.to_path_buf(),
        });
        return false;
    }
    true
}

/// Returns true if `path` has no `.git` entry at all. The skip marker is not
/// consulted: a skipped repository is still a repository.
pub fn lacks_repo_marker(path: &Path) -> bool {
    !path.join(GIT_DIR).exists()
}

/// Returns true if the repository at `path` has at least one remote.
pub fn has_remote(path: &Path, git: &dyn Git, callbacks: &dyn SyncCallbacks) -> bool {
    let failure = |message: String| {
        callbacks.on_diagnostic(&Diagnostic::RemoteQueryFailed {
            path: path.to_path_buf(),
            message,
        });
        false
    };

    match git.list_remotes(path) {
        Err(e) => failure(format!("{:#}", e)),
        Ok(output) if !output.stderr.is_empty() => failure(output.stderr),
        Ok(output) if output.stdout.trim().is_empty() => {
            callbacks.on_diagnostic(&Diagnostic::NoRemote {
                path: path.to_path_buf(),
            });
            false
        }
        Ok(_) => true,
    }
}

/// Classifies every path concurrently and keeps the ones matching
/// `predicate`, in their original order. Returns once all are classified.
pub fn filter_paths<F>(paths: Vec<PathBuf>, predicate: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool + Sync + Send,
{
    paths.into_par_iter().filter(|path| predicate(path)).collect()
}

/// Pulls `path` and reports the outcome. Never fails: a failed pull is
/// returned as [`SyncOutcome::Failed`] so sibling syncs carry on.
pub fn sync_repo(path: &Path, git: &dyn Git, callbacks: &dyn SyncCallbacks) -> SyncResult {
    let start = Instant::now();
    callbacks.on_sync_start(path);

    let outcome = match git.pull(path) {
        Ok(output) => SyncOutcome::Synced {
            stdout: output.stdout,
            stderr: output.stderr,
        },
        Err(e) => SyncOutcome::Failed {
            error: format!("{:#}", e),
        },
    };

    let result = SyncResult {
        path: path.to_path_buf(),
        outcome,
        duration: start.elapsed(),
    };
    callbacks.on_complete(&result);
    result
}

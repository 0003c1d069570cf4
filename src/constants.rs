//! Application-wide constants.
//!
//! Marker names, git arguments and pool sizing live here so the rest of the
//! crate never spells them out.

/// Git directory name used to detect repositories.
pub const GIT_DIR: &str = ".git";

/// File or directory inside [`GIT_DIR`] that opts a repository out of syncing.
pub const SKIP_MARKER: &str = ".skip";

/// Lists the configured remotes of a repository.
pub const REMOTE_SHOW_ARGS: &[&str] = &["remote", "show"];

/// Pulls upstream changes, rebasing local commits and stashing local edits.
pub const PULL_ARGS: &[&str] = &["pull", "--rebase", "--autostash", "--recurse-submodules"];

/// Number of trailing path components shown when naming a directory.
pub const DISPLAY_COMPONENTS: usize = 2;

/// Default number of threads for parallel classification and syncing.
/// Higher than CPU count because the work is waiting on git processes.
const DEFAULT_THREAD_COUNT: usize = 60;

/// Returns the worker pool size.
///
/// Can be customized via the GIT_SYNC_THREADS environment variable.
/// Falls back to 60 if not set, invalid or zero.
///
/// Example: `GIT_SYNC_THREADS=8 git-sync-tree -r ~/src`
pub fn thread_count() -> usize {
    parse_thread_count(std::env::var("GIT_SYNC_THREADS").ok().as_deref())
}

fn parse_thread_count(value: Option<&str>) -> usize {
    value
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_THREAD_COUNT)
}

/// Progress spinner tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;

/// Default name used when a directory name cannot be determined from its path.
pub const DEFAULT_DIR_NAME: &str = "directory";

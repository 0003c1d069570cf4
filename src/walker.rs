//! Directory tree walking.
//!
//! [`sync_level`] syncs the repositories directly below a directory;
//! [`sync_tree`] additionally descends into every child that is not a
//! repository. Classification and syncing fan out over the rayon pool the
//! caller runs in.

use crate::config::WalkMode;
use crate::git::Git;
use crate::repo::{
    Diagnostic, SyncCallbacks, SyncResult, filter_paths, has_remote, has_repo_marker,
    is_directory, lacks_repo_marker, sync_repo,
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Lists the entries of `dir` as full paths, sorted by name.
///
/// Fails only if `dir` itself cannot be read; unreadable entries are skipped.
pub fn list_children(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path()));
    Ok(sorted_children(entries))
}

fn sorted_children<I>(entries: I) -> Vec<PathBuf>
where
    I: Iterator<Item = std::io::Result<PathBuf>>,
{
    let mut children: Vec<PathBuf> = entries.filter_map(|e| e.ok()).collect();
    children.sort();
    children
}

/// Entry point: syncs `root` in the requested mode and blocks until every
/// repository found has been synced.
pub fn run(
    root: &Path,
    mode: WalkMode,
    git: &dyn Git,
    callbacks: &dyn SyncCallbacks,
) -> Vec<SyncResult> {
    match mode {
        WalkMode::Shallow => sync_level(root, git, callbacks),
        WalkMode::Recursive => sync_tree(root, git, callbacks),
    }
}

/// Syncs every child of `dir` that is a repository with a remote.
///
/// A listing failure is reported and ends the call with no results; a failed
/// sync does not stop its siblings.
pub fn sync_level(dir: &Path, git: &dyn Git, callbacks: &dyn SyncCallbacks) -> Vec<SyncResult> {
    let children = match list_children(dir) {
        Ok(children) => children,
        Err(e) => {
            callbacks.on_diagnostic(&Diagnostic::ListFailed {
                path: dir.to_path_buf(),
                message: e.to_string(),
            });
            return Vec::new();
        }
    };

    let dirs = filter_paths(children, |path| is_directory(path, callbacks));
    let repos = filter_paths(dirs, |path| has_repo_marker(path, callbacks));
    let tracked = filter_paths(repos, |path| has_remote(path, git, callbacks));

    let results: Vec<SyncResult> = tracked
        .par_iter()
        .map(|path| sync_repo(path, git, callbacks))
        .collect();

    callbacks.on_level_done(dir);
    results
}

/// Syncs `dir` like [`sync_level`] while concurrently descending into each
/// child directory that is not a repository, at any depth.
///
/// Directories are identified by canonical path and visited at most once, so
/// symlink cycles end the descent instead of looping.
pub fn sync_tree(dir: &Path, git: &dyn Git, callbacks: &dyn SyncCallbacks) -> Vec<SyncResult> {
    let visited = Mutex::new(HashSet::new());
    first_visit(&visited, dir);
    descend(dir, git, callbacks, &visited)
}

fn descend(
    dir: &Path,
    git: &dyn Git,
    callbacks: &dyn SyncCallbacks,
    visited: &Mutex<HashSet<PathBuf>>,
) -> Vec<SyncResult> {
    let (mut results, nested) = rayon::join(
        || sync_level(dir, git, callbacks),
        || {
            // sync_level already reports a listing failure for this directory.
            let Ok(children) = list_children(dir) else {
                return Vec::new();
            };
            let dirs = filter_paths(children, |path| is_directory(path, callbacks));
            filter_paths(dirs, lacks_repo_marker)
                .into_par_iter()
                .filter(|path| first_visit(visited, path))
                .flat_map_iter(|path| descend(&path, git, callbacks, visited))
                .collect::<Vec<_>>()
        },
    );
    results.extend(nested);
    results
}

/// Records `dir` as visited; false if it had been visited already.
fn first_visit(visited: &Mutex<HashSet<PathBuf>>, dir: &Path) -> bool {
    let key = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    match visited.lock() {
        Ok(mut set) => set.insert(key),
        Err(poisoned) => poisoned.into_inner().insert(key),
    }
}

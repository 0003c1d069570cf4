//! Git repository tree syncer library.
//!
//! This crate finds git repositories under a directory and brings each one
//! up to date by:
//! - Skipping directories that are not repositories or opt out via `.git/.skip`
//! - Skipping repositories without a remote
//! - Running `git pull --rebase --autostash --recurse-submodules` in parallel
//! - Optionally descending into non-repository directories to find nested ones

pub mod config;
pub mod constants;
pub mod git;
pub mod output;
pub mod repo;
pub mod walker;

#[cfg(test)]
mod testing;

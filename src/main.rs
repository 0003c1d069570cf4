use anyhow::Context;
use clap::Parser;
use git_sync_tree::config::{Config, Verbosity, WalkMode};
use git_sync_tree::git::GitCli;
use git_sync_tree::output::{self, ConsoleCallbacks};
use git_sync_tree::{constants, walker};
use std::path::PathBuf;
use std::time::Instant;

/// Pull and rebase every git repository found under a directory.
#[derive(Debug, Parser)]
#[command(name = "git-sync-tree", version)]
struct Cli {
    /// Directory whose child repositories are synced [default: current directory]
    path: Option<PathBuf>,

    /// Also search directories that are not repositories, at any depth
    #[arg(short, long)]
    recursive: bool,

    /// Only print sync results
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print every git command and a header per repository
    #[arg(short, long)]
    verbose: bool,

    /// Print a summary of synced and failed repositories at the end
    #[arg(long)]
    summary: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let verbosity = if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        let mode = if self.recursive {
            WalkMode::Recursive
        } else {
            WalkMode::Shallow
        };
        Config {
            verbosity,
            mode,
            summary: self.summary,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }
    let config = cli.config();

    let root = match cli.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    output::print_working_dir(&root, &config);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(constants::thread_count())
        .build()
        .context("Failed to build worker pool")?;

    let git = GitCli::new(config.git_logger());
    let callbacks = ConsoleCallbacks::new(config);
    let start = Instant::now();

    let results = pool.install(|| walker::run(&root, config.mode, &git, &callbacks));
    callbacks.finish();

    if config.summary {
        output::print_summary(&results, start.elapsed(), &config);
    }

    Ok(())
}

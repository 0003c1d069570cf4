//! Console output, progress spinner, and summary formatting.
//!
//! Every line printed while the walk is running goes through
//! [`ConsoleCallbacks`], which writes whole messages at once so output from
//! concurrent syncs never splits mid-message.

use crate::config::Config;
use crate::constants::{DEFAULT_DIR_NAME, DISPLAY_COMPONENTS, PROGRESS_TICK_MS};
use crate::repo::{Diagnostic, SyncCallbacks, SyncOutcome, SyncResult};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Component, Path};
use std::time::Duration;

/// No-op callbacks for when no output is wanted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl SyncCallbacks for NoOpCallbacks {
    fn on_diagnostic(&self, _diagnostic: &Diagnostic) {}
    fn on_complete(&self, _result: &SyncResult) {}
}

/// Short name for `path`: its last two components, e.g. `src/project`.
pub fn display_name(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        return DEFAULT_DIR_NAME.to_string();
    }
    let start = parts.len().saturating_sub(DISPLAY_COMPONENTS);
    parts[start..].join(std::path::MAIN_SEPARATOR_STR)
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    format!(
        "{} : {}\n",
        display_name(diagnostic.path()).cyan(),
        diagnostic.message()
    )
}

/// Git's output is printed as-is after the name, without adding a newline.
fn format_sync_result(result: &SyncResult) -> String {
    let name = display_name(&result.path).cyan();
    match &result.outcome {
        SyncOutcome::Synced { stdout, stderr } => format!("{} : {}{}", name, stdout, stderr),
        SyncOutcome::Failed { error } => format!(
            "{}\nSomething went wrong on \"{}\" ...\nMessage: {}\n",
            name,
            result.path.display(),
            error
        ),
    }
}

fn format_level_done(dir: &Path) -> String {
    format!("Done for folder: {}\n", display_name(dir).green())
}

/// Callbacks that write to the terminal.
///
/// In normal mode a spinner on stderr counts finished syncs; it is hidden in
/// quiet and verbose mode. Quiet mode drops classification diagnostics and
/// per-folder completion lines but keeps sync results.
pub struct ConsoleCallbacks {
    config: Config,
    spinner: ProgressBar,
}

impl ConsoleCallbacks {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            spinner: create_spinner(&config),
        }
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    fn emit(&self, text: &str) {
        self.spinner.suspend(|| {
            let mut stdout = std::io::stdout().lock();
            // Nothing sensible to do if the terminal went away.
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        });
    }
}

impl SyncCallbacks for ConsoleCallbacks {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        if self.config.is_quiet() {
            return;
        }
        self.emit(&format_diagnostic(diagnostic));
    }

    fn on_sync_start(&self, path: &Path) {
        if !self.config.is_verbose() {
            return;
        }
        self.spinner.suspend(|| {
            eprintln!("{}", format!("[{}]", display_name(path)).white().bold());
        });
    }

    fn on_complete(&self, result: &SyncResult) {
        if result.is_success() {
            self.spinner.inc(1);
        }
        self.emit(&format_sync_result(result));
    }

    fn on_level_done(&self, dir: &Path) {
        if self.config.is_quiet() {
            return;
        }
        self.emit(&format_level_done(dir));
    }
}

fn create_spinner(config: &Config) -> ProgressBar {
    if config.is_quiet() || config.is_verbose() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {pos} repositories synced")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
    spinner
}

pub fn print_working_dir(path: &Path, config: &Config) {
    if config.is_quiet() {
        return;
    }
    println!(
        "{} {}",
        "Working in:".cyan(),
        path.display().to_string().white().bold()
    )
}

pub fn print_summary(results: &[SyncResult], duration: Duration, config: &Config) {
    if config.is_quiet() {
        print_quiet_summary(results);
    } else {
        print_normal_summary(results, duration);
    }
}

fn print_quiet_summary(results: &[SyncResult]) {
    let synced = results.iter().filter(|r| r.is_success()).count();
    println!("{}/{} repositories synced", synced, results.len());

    for result in results {
        if let SyncOutcome::Failed { error } = &result.outcome {
            eprintln!("error: {}: {}", result.path.display(), error);
        }
    }
}

fn print_normal_summary(results: &[SyncResult], duration: Duration) {
    print_section("Summary");
    let (successes, failures): (Vec<_>, Vec<_>) = results.iter().partition(|r| r.is_success());

    if results.is_empty() {
        println!("{}", "No git repositories with a remote found".yellow().bold());
    }
    print_successes(&successes);
    print_failures(&failures);

    println!(
        "{}: {}/{} repos in {}",
        "Total".white().bold(),
        successes.len(),
        results.len(),
        format_duration(duration)
    );
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn print_section(title: &str) {
    let line = "=".repeat(50).cyan().dimmed();
    let padding = (50 - title.len()) / 2;
    let centered = format!("{:>width$}", title, width = padding + title.len());
    println!("\n{}\n{}\n{}\n", line, centered.cyan().bold(), line);
}

fn print_successes(successes: &[&SyncResult]) {
    if successes.is_empty() {
        return;
    }
    println!(
        "{}",
        format!("Synced ({}):", successes.len()).green().bold()
    );
    for result in successes {
        println!(
            "  {} {} in {}",
            "OK".green().bold(),
            result.path.display().to_string().white(),
            format_duration(result.duration).dimmed(),
        );
    }
    println!();
}

fn print_failures(failures: &[&SyncResult]) {
    if failures.is_empty() {
        return;
    }
    println!("{}", format!("Failed ({}):", failures.len()).red().bold());
    for result in failures {
        if let SyncOutcome::Failed { error } = &result.outcome {
            println!(
                "  {} {} {} in {}",
                "FAIL".red().bold(),
                result.path.display().to_string().white(),
                error.red(),
                format_duration(result.duration).dimmed(),
            );
        }
    }
    println!();
}

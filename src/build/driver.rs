//! Build driver.
//!
//! Runs one invocation as an explicit state machine:
//!
//! ```text
//! Idle -> Compiling(0) -> ... -> Compiling(n-1) -> Linking -> Done
//! Idle -> Cleaning -> Done                      (clean)
//! Idle -> Cleaning -> Compiling(0) -> ...       (rebuild)
//! Compiling(i) | Linking -> Failed
//! ```
//!
//! Every unit is recompiled on every build. The first failing tool stops the
//! run: later units are not compiled and the link is not attempted.

use super::command::{BuildPlan, CommandLine};
use super::compdb::{self, COMPDB_FILE};
use super::discover::{SourceTree, discover};
use super::feedback::FeedbackAnalyzer;
use super::runner::{ToolOutput, ToolRunner};
use crate::config::BuildConfig;
use crate::error::{BuildError, ToolStatus};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

/// What the invocation was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Build,
    Clean,
    Rebuild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Cleaning,
    /// Index into the plan's units
    Compiling(usize),
    Linking,
    Done,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Echo each command before running it
    pub verbose: bool,
    /// Print commands and removals instead of performing them
    pub dry_run: bool,
    /// Write `compile_commands.json` into this directory before compiling
    pub compile_commands: Option<PathBuf>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Units whose compiler invocation succeeded
    pub compiled: usize,
    /// Artifacts that existed and were removed while cleaning
    pub removed: Vec<PathBuf>,
    /// The linked binary, when the run linked
    pub output: Option<PathBuf>,
}

pub struct Driver<'a> {
    config: BuildConfig,
    tree: &'a dyn SourceTree,
    runner: &'a mut dyn ToolRunner,
    options: DriverOptions,
    state: BuildState,
    trace: Vec<BuildState>,
}

impl<'a> Driver<'a> {
    pub fn new(
        config: BuildConfig,
        tree: &'a dyn SourceTree,
        runner: &'a mut dyn ToolRunner,
        options: DriverOptions,
    ) -> Self {
        Self {
            config,
            tree,
            runner,
            options,
            state: BuildState::Idle,
            trace: vec![BuildState::Idle],
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn trace(&self) -> &[BuildState] {
        &self.trace
    }

    fn enter(&mut self, state: BuildState) {
        self.state = state;
        self.trace.push(state);
    }

    /// Discovers the source set and composes every command.
    pub fn plan(&mut self) -> Result<BuildPlan, BuildError> {
        match discover(&self.config, self.tree) {
            Ok(units) => Ok(BuildPlan::new(&self.config, units)),
            Err(e) => {
                self.enter(BuildState::Failed);
                Err(e)
            }
        }
    }

    /// Plans and executes `mode`.
    pub fn run(&mut self, mode: Mode) -> Result<BuildReport, BuildError> {
        let plan = self.plan()?;
        self.execute(mode, &plan)
    }

    pub fn execute(&mut self, mode: Mode, plan: &BuildPlan) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport {
            compiled: 0,
            removed: Vec::new(),
            output: None,
        };

        if matches!(mode, Mode::Clean | Mode::Rebuild) {
            self.enter(BuildState::Cleaning);
            report.removed = self.clean(plan)?;
            if mode == Mode::Clean {
                self.enter(BuildState::Done);
                return Ok(report);
            }
        }

        if let Some(root) = self.options.compile_commands.clone()
            && !self.options.dry_run
        {
            if let Err(e) = compdb::write(plan, &root) {
                self.enter(BuildState::Failed);
                return Err(BuildError::Io(e));
            }
        }

        let start = Instant::now();
        report.compiled = self.compile_all(plan)?;

        self.enter(BuildState::Linking);
        self.link(plan)?;
        report.output = Some(plan.link.output.clone());
        self.enter(BuildState::Done);

        if !self.options.dry_run {
            println!(
                "{} Built {} in {:.2?}",
                "✓".green(),
                plan.link.output.display().to_string().bold(),
                start.elapsed()
            );
        }
        Ok(report)
    }

    fn clean(&mut self, plan: &BuildPlan) -> Result<Vec<PathBuf>, BuildError> {
        let mut targets = plan.artifacts();
        targets.push(PathBuf::from(COMPDB_FILE));

        if self.options.dry_run {
            for path in &targets {
                println!("   Would remove {}", path.display());
            }
            return Ok(Vec::new());
        }

        let mut removed = Vec::new();
        for path in targets {
            match self.tree.remove_artifact(&path) {
                Ok(true) => {
                    if self.options.verbose {
                        println!("   {} {}", "rm".red(), path.display());
                    }
                    removed.push(path);
                }
                Ok(false) => {}
                Err(source) => {
                    self.enter(BuildState::Failed);
                    return Err(BuildError::Clean { path, source });
                }
            }
        }

        if removed.is_empty() {
            println!("{} Nothing to clean", "!".yellow());
        } else {
            println!("{} Removed {} artifacts", "✓".green(), removed.len());
        }
        Ok(removed)
    }

    fn compile_all(&mut self, plan: &BuildPlan) -> Result<usize, BuildError> {
        let pb = if self.options.dry_run {
            ProgressBar::hidden()
        } else {
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .map(|s| s.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            let pb = ProgressBar::new(plan.compiles.len() as u64);
            pb.set_style(style);
            pb
        };

        let mut compiled = 0;
        for (i, compile) in plan.compiles.iter().enumerate() {
            self.enter(BuildState::Compiling(i));
            pb.set_message(format!(
                "Compiling [{}] {}",
                compile.axis.label(),
                compile.source.display()
            ));

            if self.options.dry_run {
                println!("   Would execute: {}", compile.line.display());
                continue;
            }
            if self.options.verbose {
                pb.println(format!("   {}", compile.line.display()));
            }

            match self.invoke(&compile.line) {
                Ok(out) => {
                    if !out.stderr.trim().is_empty() {
                        pb.println(format!(
                            "{} Warning in {}:\n{}",
                            "!".yellow(),
                            compile.source.display(),
                            out.stderr.trim_end()
                        ));
                    }
                }
                Err((status, stderr)) => {
                    pb.finish_and_clear();
                    self.enter(BuildState::Failed);
                    report_failure(&compile.line, &status, &stderr);
                    return Err(BuildError::Compile {
                        unit: compile.source.clone(),
                        command: compile.line.display(),
                        status,
                    });
                }
            }
            compiled += 1;
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(compiled)
    }

    fn link(&mut self, plan: &BuildPlan) -> Result<(), BuildError> {
        let line = &plan.link.line;
        if self.options.dry_run {
            println!("   Would execute: {}", line.display());
            return Ok(());
        }

        println!("   {} Linking {}...", "🔗".cyan(), plan.link.output.display());
        if self.options.verbose {
            println!("   {}", line.display());
        }

        if let Err((status, stderr)) = self.invoke(line) {
            self.enter(BuildState::Failed);
            report_failure(line, &status, &stderr);
            return Err(BuildError::Link {
                command: line.display(),
                status,
            });
        }
        Ok(())
    }

    /// Runs one tool to completion; `Err` carries the failure and its stderr.
    fn invoke(&mut self, line: &CommandLine) -> Result<ToolOutput, (ToolStatus, String)> {
        match self.runner.run(line) {
            Ok(out) if out.success() => Ok(out),
            Ok(out) => Err((out.status(), out.stderr)),
            Err(e) => Err((ToolStatus::NotLaunched(e.to_string()), String::new())),
        }
    }
}

/// Tool output and a hint. The command and status travel in the returned
/// [`BuildError`] and are printed once by the caller.
fn report_failure(line: &CommandLine, status: &ToolStatus, stderr: &str) {
    if !stderr.trim().is_empty() {
        println!("{}", stderr.trim_end());
    }

    let hint = match status {
        ToolStatus::NotLaunched(_) => Some(FeedbackAnalyzer::launch_hint(&line.program)),
        _ => FeedbackAnalyzer::analyze(stderr),
    };
    if let Some(hint) = hint {
        println!("{} {}", "💡".yellow(), hint);
    }
}

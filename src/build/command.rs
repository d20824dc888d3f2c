//! Compiler and linker command composition.
//!
//! Commands are ordered token lists, never shell strings. Composition is pure:
//! the same config and units always yield the same tokens.

use super::discover::{Axis, SourceUnit};
use crate::config::{BuildConfig, LayoutMode};
use std::path::{Path, PathBuf};

/// Suffix appended to the lower-cased game name to form the binary name.
pub const OUTPUT_TAG: &str = "c9x";

/// A fully expanded subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Space-joined form for status output and logs.
    pub fn display(&self) -> String {
        let mut s = self.program.clone();
        for arg in &self.args {
            s.push(' ');
            s.push_str(arg);
        }
        s
    }

    /// Program followed by its arguments.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.args.len() + 1);
        tokens.push(self.program.clone());
        tokens.extend(self.args.iter().cloned());
        tokens
    }
}

/// Compiles one unit to its object artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    pub source: PathBuf,
    pub axis: Axis,
    pub artifact: PathBuf,
    pub line: CommandLine,
}

/// Links every artifact into the output binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCommand {
    pub output: PathBuf,
    pub line: CommandLine,
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Preprocessor defines for the active selectors.
pub fn defines(config: &BuildConfig) -> Vec<String> {
    let mut defs = vec![format!("-DQ_GAMENAME=\"{}\"", config.game_name())];
    if config.layout == LayoutMode::Versioned {
        defs.push(format!(
            "-DQ_ENGINE_VERSION=\"{}\"",
            config.engine_version()
        ));
        // Game module and renderer are linked into the binary, not loaded
        defs.push("-DGAME_HARD_LINKED".to_string());
        defs.push("-DREF_HARD_LINKED".to_string());
    }
    defs
}

/// `<game>-c9x`, in the project root.
pub fn output_name(config: &BuildConfig) -> PathBuf {
    PathBuf::from(format!("{}-{}", config.game_dir_name(), OUTPUT_TAG))
}

pub fn compile_command(config: &BuildConfig, unit: &SourceUnit) -> CompileCommand {
    let artifact = unit.artifact();

    let mut args = Vec::new();
    args.extend(config.cflags.iter().cloned());
    args.extend(defines(config));
    args.extend(config.includes.iter().cloned());
    args.push("-c".to_string());
    args.push(path_arg(&unit.source));
    args.push("-o".to_string());
    args.push(path_arg(&artifact));

    CompileCommand {
        source: unit.source.clone(),
        axis: unit.axis,
        artifact,
        line: CommandLine {
            program: config.compiler.clone(),
            args,
        },
    }
}

pub fn link_command(config: &BuildConfig, units: &[SourceUnit]) -> LinkCommand {
    let output = output_name(config);

    let mut args: Vec<String> = units.iter().map(|u| path_arg(&u.artifact())).collect();
    args.push("-o".to_string());
    args.push(path_arg(&output));
    args.extend(config.ldflags.iter().cloned());

    LinkCommand {
        output,
        line: CommandLine {
            program: config.linker.clone(),
            args,
        },
    }
}

/// Everything one build needs to run, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub units: Vec<SourceUnit>,
    pub compiles: Vec<CompileCommand>,
    pub link: LinkCommand,
}

impl BuildPlan {
    pub fn new(config: &BuildConfig, units: Vec<SourceUnit>) -> Self {
        let compiles = units.iter().map(|u| compile_command(config, u)).collect();
        let link = link_command(config, &units);
        Self {
            units,
            compiles,
            link,
        }
    }

    /// Every path `clean` is responsible for: unit artifacts, then the binary.
    pub fn artifacts(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.compiles.iter().map(|c| c.artifact.clone()).collect();
        paths.push(self.link.output.clone());
        paths
    }
}

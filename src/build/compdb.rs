//! `compile_commands.json` emission for editor tooling.

use super::command::BuildPlan;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

pub const COMPDB_FILE: &str = "compile_commands.json";

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct CompdbEntry {
    pub directory: String,
    pub arguments: Vec<String>,
    pub file: String,
    pub output: String,
}

pub fn entries(plan: &BuildPlan, directory: &Path) -> Vec<CompdbEntry> {
    let directory = directory.to_string_lossy().to_string();
    plan.compiles
        .iter()
        .map(|c| CompdbEntry {
            directory: directory.clone(),
            arguments: c.line.tokens(),
            file: c.source.to_string_lossy().to_string(),
            output: c.artifact.to_string_lossy().to_string(),
        })
        .collect()
}

/// Writes the database into `root`.
pub fn write(plan: &BuildPlan, root: &Path) -> io::Result<()> {
    let directory = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let json = serde_json::to_string_pretty(&entries(plan, &directory))?;
    fs::write(root.join(COMPDB_FILE), json)
}

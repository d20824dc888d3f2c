//! In-memory stand-ins for the filesystem and the toolchain.

use crate::build::{CommandLine, SourceTree, ToolOutput, ToolRunner};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

type Artifacts = Rc<RefCell<BTreeSet<PathBuf>>>;

/// Source directories with fixed listings plus a set of artifact files.
#[derive(Default)]
pub struct MemoryTree {
    dirs: BTreeMap<PathBuf, Vec<String>>,
    artifacts: Artifacts,
    locked: BTreeSet<PathBuf>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files are listed back in the order given here.
    pub fn with_dir(mut self, dir: &str, files: &[&str]) -> Self {
        self.dirs.insert(
            PathBuf::from(dir),
            files.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    pub fn with_artifact(self, path: &str) -> Self {
        self.artifacts.borrow_mut().insert(PathBuf::from(path));
        self
    }

    /// Removing `path` fails with permission denied.
    pub fn deny_removal(mut self, path: &str) -> Self {
        self.locked.insert(PathBuf::from(path));
        self
    }

    pub fn has_artifact(&self, path: &str) -> bool {
        self.artifacts.borrow().contains(Path::new(path))
    }

    pub fn artifact_paths(&self) -> Vec<PathBuf> {
        self.artifacts.borrow().iter().cloned().collect()
    }
}

impl SourceTree for MemoryTree {
    fn list_sources(&self, dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
        let files = self
            .dirs
            .get(dir)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))?;
        Ok(files
            .iter()
            .map(Path::new)
            .filter(|f| f.extension().is_some_and(|e| e == ext))
            .map(|f| {
                if dir == Path::new(".") {
                    f.to_path_buf()
                } else {
                    dir.join(f)
                }
            })
            .collect())
    }

    fn remove_artifact(&self, path: &Path) -> io::Result<bool> {
        if self.locked.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"));
        }
        Ok(self.artifacts.borrow_mut().remove(path))
    }
}

/// Records every command; a successful run "writes" the `-o` target into the
/// tree it was created from.
pub struct ScriptedRunner {
    artifacts: Artifacts,
    commands: Vec<CommandLine>,
    fail_source: Option<String>,
    fail_link: bool,
    unlaunchable: bool,
}

impl ScriptedRunner {
    pub fn new(tree: &MemoryTree) -> Self {
        Self {
            artifacts: Rc::clone(&tree.artifacts),
            commands: Vec::new(),
            fail_source: None,
            fail_link: false,
            unlaunchable: false,
        }
    }

    /// The compile of `source` exits with status 1.
    pub fn fail_on(mut self, source: &str) -> Self {
        self.fail_source = Some(source.to_string());
        self
    }

    pub fn fail_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    pub fn unlaunchable(mut self) -> Self {
        self.unlaunchable = true;
        self
    }

    pub fn commands(&self) -> &[CommandLine] {
        &self.commands
    }

    /// Sources of every compile invocation, in call order.
    pub fn compiled_sources(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|cmd| {
                let pos = cmd.args.iter().position(|a| a == "-c")?;
                cmd.args.get(pos + 1).cloned()
            })
            .collect()
    }

    pub fn link_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| !cmd.args.iter().any(|a| a == "-c"))
            .count()
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&mut self, cmd: &CommandLine) -> io::Result<ToolOutput> {
        if self.unlaunchable {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such program"));
        }
        self.commands.push(cmd.clone());

        let is_compile = cmd.args.iter().any(|a| a == "-c");
        let failed = if is_compile {
            self.fail_source
                .as_ref()
                .is_some_and(|src| cmd.args.iter().any(|a| a == src))
        } else {
            self.fail_link
        };
        if failed {
            return Ok(ToolOutput {
                code: Some(1),
                stderr: "error: scripted failure".to_string(),
            });
        }

        if let Some(pos) = cmd.args.iter().position(|a| a == "-o")
            && let Some(target) = cmd.args.get(pos + 1)
        {
            self.artifacts.borrow_mut().insert(PathBuf::from(target));
        }
        Ok(ToolOutput {
            code: Some(0),
            stderr: String::new(),
        })
    }
}

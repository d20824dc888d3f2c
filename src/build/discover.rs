//! Source set discovery.
//!
//! The directory axes scanned depend on the layout mode and are always
//! visited in the same order. Within one directory, files come back in
//! file-name order.

use crate::config::{BuildConfig, LayoutMode};
use crate::error::BuildError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of compilation units.
pub const SOURCE_EXT: &str = "c";
/// Extension of object artifacts.
pub const OBJECT_EXT: &str = "o";

/// The component group a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Core,
    VersionShared,
    VersionClient,
    VersionServer,
    Game,
    Platform,
    Renderer,
}

impl Axis {
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Core => "core",
            Axis::VersionShared => "version-shared",
            Axis::VersionClient => "version-client",
            Axis::VersionServer => "version-server",
            Axis::Game => "game",
            Axis::Platform => "platform",
            Axis::Renderer => "renderer",
        }
    }
}

/// One source file mapped to one object artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub source: PathBuf,
    pub axis: Axis,
}

impl SourceUnit {
    pub fn new(source: impl Into<PathBuf>, axis: Axis) -> Self {
        Self {
            source: source.into(),
            axis,
        }
    }

    /// Sibling of the source with the object extension.
    pub fn artifact(&self) -> PathBuf {
        self.source.with_extension(OBJECT_EXT)
    }
}

/// Filesystem access needed by discovery and cleaning.
pub trait SourceTree {
    /// Files directly inside `dir` whose extension is `ext`, in a stable
    /// order. Returned paths keep `dir` as their prefix (a `.` dir yields
    /// bare file names). A missing directory is an error.
    fn list_sources(&self, dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>>;

    /// Removes `path` if present. Returns whether something was removed.
    fn remove_artifact(&self, path: &Path) -> io::Result<bool>;
}

/// The real tree under a project root. Paths handed in and out are relative
/// to `root`.
#[derive(Debug, Clone)]
pub struct DiskTree {
    root: PathBuf,
}

impl DiskTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

}

impl SourceTree for DiskTree {
    fn list_sources(&self, dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
        let abs = self.root.join(dir);
        if !abs.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", abs.display()),
            ));
        }

        // Symlinked units are followed so shared sources are compiled too
        let mut files = Vec::new();
        for entry in WalkDir::new(&abs)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().is_some_and(|e| e == ext) {
                let name = entry.file_name();
                // Command tokens are strings; a lossy name would point at no file
                if name.to_str().is_none() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("{} is not a valid UTF-8 file name", path.display()),
                    ));
                }
                if dir == Path::new(".") || dir.as_os_str().is_empty() {
                    files.push(PathBuf::from(name));
                } else {
                    files.push(dir.join(name));
                }
            }
        }
        Ok(files)
    }

    fn remove_artifact(&self, path: &Path) -> io::Result<bool> {
        match fs::remove_file(self.root.join(path)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Directory axes for `config`, in scan order.
pub fn axes(config: &BuildConfig) -> Vec<(Axis, PathBuf)> {
    let game = Path::new("game").join(config.game_dir_name());
    let platform = Path::new("sys").join(config.platform_dir_name());

    match config.layout {
        LayoutMode::Simple => vec![
            (Axis::Core, PathBuf::from(".")),
            (Axis::Game, game),
            (Axis::Platform, platform),
        ],
        LayoutMode::Versioned => {
            let version = PathBuf::from(config.engine_version());
            vec![
                (Axis::VersionShared, version.join("common")),
                (Axis::VersionClient, version.join("client")),
                (Axis::VersionServer, version.join("server")),
                (Axis::Game, game),
                (Axis::Platform, platform),
                (
                    Axis::Renderer,
                    version
                        .join("render")
                        .join(format!("ref_{}", config.renderer_dir_name())),
                ),
            ]
        }
    }
}

/// Enumerates every compilation unit for `config`.
///
/// Fails on the first axis directory that cannot be listed, before anything
/// is compiled.
pub fn discover(config: &BuildConfig, tree: &dyn SourceTree) -> Result<Vec<SourceUnit>, BuildError> {
    let mut units = Vec::new();
    for (axis, dir) in axes(config) {
        let files = tree
            .list_sources(&dir, SOURCE_EXT)
            .map_err(|source| BuildError::Discovery {
                dir: dir.clone(),
                source,
            })?;
        units.extend(files.into_iter().map(|f| SourceUnit::new(f, axis)));
    }
    Ok(units)
}

//! Library-level tests of the versioned layout against a real directory tree.

use c9x_build::build::{
    Axis, BuildState, CommandLine, DiskTree, Driver, DriverOptions, Mode, ToolOutput, ToolRunner,
    discover,
};
use c9x_build::config::{BuildConfig, KEY_LAYOUT, KEY_RENDERER, MapSource};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Touches the `-o` target of every command under `root`.
struct TouchRunner {
    root: PathBuf,
    calls: Vec<CommandLine>,
}

impl ToolRunner for TouchRunner {
    fn run(&mut self, cmd: &CommandLine) -> io::Result<ToolOutput> {
        self.calls.push(cmd.clone());
        if let Some(pos) = cmd.args.iter().position(|a| a == "-o") {
            fs::write(self.root.join(&cmd.args[pos + 1]), b"")?;
        }
        Ok(ToolOutput {
            code: Some(0),
            stderr: String::new(),
        })
    }
}

fn write_sources(root: &Path, dir: &str, files: &[&str]) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    for f in files {
        fs::write(dir.join(f), "/* */\n").unwrap();
    }
}

fn versioned_tree(root: &Path) {
    write_sources(root, "q2/common", &["cvar.c", "cmd.c", "common.h"]);
    write_sources(root, "q2/client", &["cl_main.c"]);
    write_sources(root, "q2/server", &["sv_main.c"]);
    write_sources(root, "game/quake", &["g_main.c"]);
    write_sources(root, "sys/sdl", &["sys_sdl.c", "vid_sdl.c"]);
    write_sources(root, "q2/render/ref_gl", &["gl_rmain.c"]);
    // Stray sources outside the configured axes are ignored
    write_sources(root, ".", &["stray.c"]);
    write_sources(root, "q2/render/ref_soft", &["r_main.c"]);
}

fn versioned_config() -> BuildConfig {
    BuildConfig::resolve(
        &MapSource::new()
            .with(KEY_LAYOUT, "versioned")
            .with(KEY_RENDERER, "GL"),
    )
    .unwrap()
}

#[test]
fn test_versioned_discovery_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    versioned_tree(dir.path());

    let tree = DiskTree::new(dir.path());
    let units = discover(&versioned_config(), &tree).unwrap();
    let sources: Vec<_> = units.iter().map(|u| u.source.clone()).collect();
    assert_eq!(
        sources,
        vec![
            PathBuf::from("q2/common/cmd.c"),
            PathBuf::from("q2/common/cvar.c"),
            PathBuf::from("q2/client/cl_main.c"),
            PathBuf::from("q2/server/sv_main.c"),
            PathBuf::from("game/quake/g_main.c"),
            PathBuf::from("sys/sdl/sys_sdl.c"),
            PathBuf::from("sys/sdl/vid_sdl.c"),
            PathBuf::from("q2/render/ref_gl/gl_rmain.c"),
        ]
    );
    assert_eq!(units[7].axis, Axis::Renderer);
}

#[test]
fn test_versioned_build_and_rebuild_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    versioned_tree(dir.path());
    let tree = DiskTree::new(dir.path());
    let mut runner = TouchRunner {
        root: dir.path().to_path_buf(),
        calls: Vec::new(),
    };

    let mut driver = Driver::new(versioned_config(), &tree, &mut runner, DriverOptions::default());
    let report = driver.run(Mode::Build).unwrap();
    assert_eq!(driver.state(), BuildState::Done);
    assert_eq!(report.compiled, 8);
    drop(driver);

    assert!(dir.path().join("q2/render/ref_gl/gl_rmain.o").exists());
    assert!(dir.path().join("quake-c9x").exists());
    let first = &runner.calls[0];
    assert!(first.args.contains(&"-DQ_ENGINE_VERSION=\"q2\"".to_string()));
    assert!(first.args.contains(&"-DGAME_HARD_LINKED".to_string()));
    assert!(first.args.contains(&"-DREF_HARD_LINKED".to_string()));

    let mut driver = Driver::new(versioned_config(), &tree, &mut runner, DriverOptions::default());
    let report = driver.run(Mode::Rebuild).unwrap();
    assert_eq!(report.removed.len(), 9);
    assert_eq!(report.compiled, 8);
    drop(driver);
    assert_eq!(runner.calls.len(), 18);
}

#[test]
fn test_missing_renderer_directory() {
    let dir = tempfile::tempdir().unwrap();
    versioned_tree(dir.path());
    let config = BuildConfig::resolve(
        &MapSource::new()
            .with(KEY_LAYOUT, "versioned")
            .with(KEY_RENDERER, "vulkan"),
    )
    .unwrap();
    let tree = DiskTree::new(dir.path());
    let err = discover(&config, &tree).unwrap_err();
    assert!(err.to_string().contains("ref_vulkan"));
}

//! Configuration resolution.
//!
//! Every tunable is looked up by key in a [`ConfigSource`] and falls back to
//! a fixed default when the key is missing or empty. The CLI layers the
//! process environment over an optional `c9x.toml`:
//!
//! ```toml
//! [build]
//! cc = "clang"
//! gamename = "HIPNOTIC"
//! layout = "versioned"
//! ```
//!
//! The resolved [`BuildConfig`] is built once per invocation and passed down
//! explicitly. Nothing below this module reads the environment.

use crate::error::BuildError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const KEY_CC: &str = "CC";
pub const KEY_LD: &str = "LD";
pub const KEY_CFLAGS: &str = "CFLAGS";
pub const KEY_LDFLAGS: &str = "LDFLAGS";
pub const KEY_INCLUDES: &str = "INCLUDES";
pub const KEY_GAMENAME: &str = "GAMENAME";
pub const KEY_SYS_BACKEND: &str = "SYS_BACKEND";
pub const KEY_ENGINE_VERSION: &str = "ENGINE_VERSION";
pub const KEY_RENDERER: &str = "RENDERER";
pub const KEY_LAYOUT: &str = "LAYOUT";

pub const DEFAULT_CC: &str = "cc";
pub const DEFAULT_LD: &str = "cc";
pub const DEFAULT_CFLAGS: &str = "-O1 -g -w --std=c9x";
pub const DEFAULT_LDFLAGS: &str = "-lm -lSDL2 -g";
pub const DEFAULT_GAMENAME: &str = "QUAKE";
pub const DEFAULT_SYS_BACKEND: &str = "SDL";
pub const DEFAULT_ENGINE_VERSION: &str = "Q2";
pub const DEFAULT_RENDERER: &str = "SOFT";

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = "c9x.toml";

/// A key/value lookup the resolver reads from.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory values, mostly for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MapSource(BTreeMap<String, String>);

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// First source with a non-empty value wins.
pub struct Layered<'a> {
    layers: Vec<&'a dyn ConfigSource>,
}

impl<'a> Layered<'a> {
    pub fn new(layers: Vec<&'a dyn ConfigSource>) -> Self {
        Self { layers }
    }
}

impl ConfigSource for Layered<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.layers
            .iter()
            .filter_map(|layer| layer.get(key))
            .find(|v| !v.trim().is_empty())
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    build: FileBuildSection,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileBuildSection {
    cc: Option<String>,
    ld: Option<String>,
    cflags: Option<String>,
    ldflags: Option<String>,
    includes: Option<String>,
    gamename: Option<String>,
    sys_backend: Option<String>,
    engine_version: Option<String>,
    renderer: Option<String>,
    layout: Option<String>,
}

/// Values from the `[build]` table of a `c9x.toml`.
#[derive(Debug, Default)]
pub struct FileSource {
    build: FileBuildSection,
}

impl FileSource {
    pub fn parse(content: &str) -> Result<Self, BuildError> {
        let file: FileConfig = toml::from_str(content)
            .map_err(|e| BuildError::Config(format!("{} is malformed: {}", CONFIG_FILE, e)))?;
        Ok(Self { build: file.build })
    }

    /// Loads `path` if it exists; a missing file yields an empty source.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            BuildError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }
}

impl ConfigSource for FileSource {
    fn get(&self, key: &str) -> Option<String> {
        let b = &self.build;
        let value = match key {
            KEY_CC => &b.cc,
            KEY_LD => &b.ld,
            KEY_CFLAGS => &b.cflags,
            KEY_LDFLAGS => &b.ldflags,
            KEY_INCLUDES => &b.includes,
            KEY_GAMENAME => &b.gamename,
            KEY_SYS_BACKEND => &b.sys_backend,
            KEY_ENGINE_VERSION => &b.engine_version,
            KEY_RENDERER => &b.renderer,
            KEY_LAYOUT => &b.layout,
            _ => return None,
        };
        value.clone()
    }
}

/// Which set of directory axes is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Current directory, game module, platform backend
    #[default]
    Simple,
    /// Version shared/client/server trees, game module, platform backend, renderer
    Versioned,
}

impl LayoutMode {
    fn parse(value: &str) -> Result<Self, BuildError> {
        match value.to_lowercase().as_str() {
            "simple" => Ok(LayoutMode::Simple),
            "versioned" => Ok(LayoutMode::Versioned),
            other => Err(BuildError::Config(format!(
                "unknown {} '{}' (expected 'simple' or 'versioned')",
                KEY_LAYOUT, other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Simple => "simple",
            LayoutMode::Versioned => "versioned",
        }
    }
}

/// Resolved settings for one invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub compiler: String,
    pub linker: String,
    pub cflags: Vec<String>,
    pub ldflags: Vec<String>,
    /// Always starts with `-I.`
    pub includes: Vec<String>,
    pub layout: LayoutMode,
    game: String,
    platform: String,
    engine_version: String,
    renderer: String,
}

fn lookup(source: &dyn ConfigSource, key: &str, default: &str) -> String {
    match source.get(key) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

fn split_flags(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

impl BuildConfig {
    /// Resolves every option against `source`, falling back to defaults.
    ///
    /// Selectors are not checked against the tree; a bad module name only
    /// surfaces when its directory is listed.
    pub fn resolve(source: &dyn ConfigSource) -> Result<Self, BuildError> {
        let mut includes = vec!["-I.".to_string()];
        if let Some(extra) = source.get(KEY_INCLUDES) {
            for path in extra.split_whitespace() {
                if path.starts_with("-I") {
                    includes.push(path.to_string());
                } else {
                    includes.push(format!("-I{}", path));
                }
            }
        }

        let layout = match source.get(KEY_LAYOUT) {
            Some(v) if !v.trim().is_empty() => LayoutMode::parse(v.trim())?,
            _ => LayoutMode::default(),
        };

        Ok(Self {
            compiler: lookup(source, KEY_CC, DEFAULT_CC),
            linker: lookup(source, KEY_LD, DEFAULT_LD),
            cflags: split_flags(&lookup(source, KEY_CFLAGS, DEFAULT_CFLAGS)),
            ldflags: split_flags(&lookup(source, KEY_LDFLAGS, DEFAULT_LDFLAGS)),
            includes,
            layout,
            game: lookup(source, KEY_GAMENAME, DEFAULT_GAMENAME),
            platform: lookup(source, KEY_SYS_BACKEND, DEFAULT_SYS_BACKEND),
            engine_version: lookup(source, KEY_ENGINE_VERSION, DEFAULT_ENGINE_VERSION),
            renderer: lookup(source, KEY_RENDERER, DEFAULT_RENDERER),
        })
    }

    /// Game module name as supplied (used for the `Q_GAMENAME` define).
    pub fn game_name(&self) -> &str {
        &self.game
    }

    pub fn game_dir_name(&self) -> String {
        self.game.to_lowercase()
    }

    pub fn platform_dir_name(&self) -> String {
        self.platform.to_lowercase()
    }

    pub fn engine_version(&self) -> String {
        self.engine_version.to_lowercase()
    }

    pub fn renderer_dir_name(&self) -> String {
        self.renderer.to_lowercase()
    }

    /// Key/value pairs for display, in resolution order.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            (KEY_CC, self.compiler.clone()),
            (KEY_LD, self.linker.clone()),
            (KEY_CFLAGS, self.cflags.join(" ")),
            (KEY_LDFLAGS, self.ldflags.join(" ")),
            (KEY_INCLUDES, self.includes.join(" ")),
            (KEY_LAYOUT, self.layout.as_str().to_string()),
            (KEY_GAMENAME, self.game.clone()),
            (KEY_SYS_BACKEND, self.platform.clone()),
            (KEY_ENGINE_VERSION, self.engine_version.clone()),
            (KEY_RENDERER, self.renderer.clone()),
        ]
    }
}

//! # c9x-build - Engine Build Orchestrator
//!
//! Builds the c9x engine tree into a single executable. The source set is
//! assembled from independently selected groups: the core engine, a game
//! module, a platform backend and, in the versioned layout, an engine version
//! tree with its renderer backend.
//!
//! ## Pipeline
//!
//! 1. [`config`] resolves every tunable into an immutable [`config::BuildConfig`]
//! 2. [`build::discover`] lists the compilation units across the directory axes
//! 3. [`build::BuildPlan`] composes one compiler command per unit and one link
//! 4. [`build::Driver`] compiles in order, stops at the first failure, links
//!
//! Every build recompiles the whole source set; there is no incremental
//! tracking.

/// Build pipeline: discovery, command composition, driver.
pub mod build;

/// Configuration resolution (environment and `c9x.toml`).
pub mod config;

/// Error types.
pub mod error;

/// Terminal UI utilities (tables).
pub mod ui;

#[cfg(test)]
pub(crate) mod testutil;

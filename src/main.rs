//! # c9x-build CLI Entry Point
//!
//! ```text
//! c9x-build              compile every unit, then link
//! c9x-build --clean      remove objects and the binary
//! c9x-build --rebuild    clean, then build
//! ```
//!
//! Settings come from the environment (`CC`, `LD`, `CFLAGS`, `LDFLAGS`,
//! `INCLUDES`, `GAMENAME`, `SYS_BACKEND`, `ENGINE_VERSION`, `RENDERER`,
//! `LAYOUT`), then from `c9x.toml`, then from built-in defaults. Any failure
//! exits with status 1.

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;

use c9x_build::build::{DiskTree, Driver, DriverOptions, Mode, SystemRunner};
use c9x_build::config::{BuildConfig, CONFIG_FILE, ConfigSource, EnvSource, FileSource, Layered};
use c9x_build::ui;

#[derive(Parser)]
#[command(name = "c9x-build")]
#[command(about = "Build orchestrator for the c9x engine tree", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Remove all object files and the output binary, then exit
    #[arg(long, conflicts_with = "rebuild")]
    clean: bool,
    /// Clean, then build from scratch
    #[arg(long)]
    rebuild: bool,
    /// Project root containing the engine sources
    #[arg(short = 'C', long, default_value = ".")]
    directory: PathBuf,
    /// Configuration file (default: c9x.toml in the project root)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Show what would be executed without running
    #[arg(long)]
    dry_run: bool,
    /// Show every command before running it
    #[arg(short, long)]
    verbose: bool,
    /// Write compile_commands.json for editor tooling
    #[arg(long)]
    compile_commands: bool,
    /// Print the resolved configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.clean {
            Mode::Clean
        } else if self.rebuild {
            Mode::Rebuild
        } else {
            Mode::Build
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        println!("{} {:#}", "x".red(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let root = &cli.directory;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| root.join(CONFIG_FILE));

    let file = FileSource::load(&config_path)?;
    let env = EnvSource;
    let source = Layered::new(vec![&env as &dyn ConfigSource, &file]);
    let config = BuildConfig::resolve(&source)?;

    if cli.print_config {
        let mut table = ui::Table::new("Setting", "Value");
        for (key, value) in config.summary() {
            table.add_row(key, &value);
        }
        table.print();
        return Ok(());
    }

    let mode = cli.mode();
    let options = DriverOptions {
        verbose: cli.verbose,
        dry_run: cli.dry_run,
        compile_commands: cli.compile_commands.then(|| root.clone()),
    };
    if cli.dry_run {
        println!("{} DRY RUN: nothing will be executed", "!".yellow());
    }

    let tree = DiskTree::new(root);
    let mut runner = SystemRunner::new(root);
    let mut driver = Driver::new(config, &tree, &mut runner, options);

    let plan = driver.plan()?;
    println!(
        "{} Game: {} | Platform: {} | Layout: {} | {} units",
        "🚀".blue(),
        driver.config().game_name().bold(),
        driver.config().platform_dir_name(),
        driver.config().layout.as_str(),
        plan.units.len()
    );

    driver.execute(mode, &plan)?;
    Ok(())
}

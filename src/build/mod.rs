mod command;
mod compdb;
mod discover;
mod driver;
mod feedback;
mod runner;

pub use command::{
    BuildPlan, CommandLine, CompileCommand, LinkCommand, OUTPUT_TAG, compile_command, defines,
    link_command, output_name,
};
pub use compdb::{COMPDB_FILE, CompdbEntry};
pub use discover::{
    Axis, DiskTree, OBJECT_EXT, SOURCE_EXT, SourceTree, SourceUnit, axes, discover,
};
pub use driver::{BuildReport, BuildState, Driver, DriverOptions, Mode};
pub use feedback::FeedbackAnalyzer;
pub use runner::{SystemRunner, ToolOutput, ToolRunner};

use crate::config::{KEY_CC, KEY_INCLUDES, KEY_LDFLAGS, KEY_SYS_BACKEND};
use colored::*;

/// Turns well-known compiler and linker failures into a hint naming the
/// setting to change.
pub struct FeedbackAnalyzer;

impl FeedbackAnalyzer {
    pub fn analyze(output: &str) -> Option<String> {
        // 1. No entry point: usually the platform backend is missing or wrong
        if output.contains("undefined reference to `main'")
            || output.contains("undefined reference to 'main'")
            || output.contains("entry point must be defined")
        {
            return Some(format!(
                "The link has no {} function.\nThe entry point lives in the platform backend; check {}.",
                "main()".bold().yellow(),
                KEY_SYS_BACKEND.bold().green()
            ));
        }

        // 2. Unresolved symbols or libraries
        if output.contains("undefined reference to")
            || output.contains("cannot find -l")
            || output.contains("library not found for")
        {
            return Some(format!(
                "It looks like a {} error.\nA library may be missing from {}.",
                "Linker".bold().red(),
                KEY_LDFLAGS.bold().yellow()
            ));
        }

        // 3. Missing header
        if (output.contains("fatal error: ") && output.contains("No such file or directory"))
            || output.contains("file not found")
        {
            return Some(format!(
                "It looks like a {} error.\nAdd the header's directory to {}.",
                "Missing Header".bold().red(),
                KEY_INCLUDES.bold().yellow()
            ));
        }

        None
    }

    /// Hint for a tool that could not be started at all.
    pub fn launch_hint(program: &str) -> String {
        format!(
            "'{}' could not be started. Set {} (or LD) to an installed toolchain.",
            program,
            KEY_CC.bold().yellow()
        )
    }
}

use std::fmt;
use std::path::PathBuf;

/// Error type for a single build invocation.
///
/// Every variant is fatal: the driver never retries and never continues past
/// the first failure.
#[derive(Debug)]
pub enum BuildError {
    /// Configuration could not be read or holds an unusable value
    Config(String),
    /// A directory axis implied by the selectors could not be listed
    Discovery {
        dir: PathBuf,
        source: std::io::Error,
    },
    /// The compiler rejected a unit (or could not be launched)
    Compile {
        unit: PathBuf,
        command: String,
        status: ToolStatus,
    },
    /// The linker failed (or could not be launched)
    Link { command: String, status: ToolStatus },
    /// An artifact exists but could not be removed
    Clean {
        path: PathBuf,
        source: std::io::Error,
    },
    /// IO error
    Io(std::io::Error),
}

/// How a tool invocation ended when it did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// Process ran and exited with this code
    Exited(i32),
    /// Process was terminated without an exit code (signal)
    Terminated,
    /// Process could not be started
    NotLaunched(String),
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::Exited(code) => write!(f, "exit status {}", code),
            ToolStatus::Terminated => write!(f, "terminated by signal"),
            ToolStatus::NotLaunched(msg) => write!(f, "failed to launch: {}", msg),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Config(msg) => write!(f, "Configuration error: {}", msg),
            BuildError::Discovery { dir, source } => write!(
                f,
                "Source directory '{}' could not be read: {}",
                dir.display(),
                source
            ),
            BuildError::Compile {
                unit,
                command,
                status,
            } => write!(
                f,
                "Compiling {} failed ({})\n  {}",
                unit.display(),
                status,
                command
            ),
            BuildError::Link { command, status } => {
                write!(f, "Linking failed ({})\n  {}", status, command)
            }
            BuildError::Clean { path, source } => {
                write!(f, "Failed to remove {}: {}", path.display(), source)
            }
            BuildError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Discovery { source, .. } | BuildError::Clean { source, .. } => {
                Some(source)
            }
            BuildError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BuildError {
    fn from(e: std::io::Error) -> Self {
        BuildError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_shows_command_and_status() {
        let err = BuildError::Compile {
            unit: PathBuf::from("game/quake/b.c"),
            command: "cc -c game/quake/b.c -o game/quake/b.o".to_string(),
            status: ToolStatus::Exited(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("game/quake/b.c"));
        assert!(msg.contains("exit status 1"));
        assert!(msg.contains("cc -c game/quake/b.c -o game/quake/b.o"));
    }

    #[test]
    fn test_discovery_error_exposes_source() {
        use std::error::Error;
        let err = BuildError::Discovery {
            dir: PathBuf::from("sys/dos"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("sys/dos"));
        assert!(err.source().is_some());
    }
}

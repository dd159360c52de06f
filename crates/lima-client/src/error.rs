//! Error types for limactl operations.

use thiserror::Error;

/// Result type alias for limactl operations.
pub type Result<T> = std::result::Result<T, LimaError>;

/// Errors that can occur when invoking limactl.
#[derive(Debug, Error)]
pub enum LimaError {
    /// The limactl binary could not be launched at all.
    #[error("limactl not available: {message}")]
    NotInstalled {
        /// Launch failure reported by the OS.
        message: String,
    },

    /// limactl ran but exited with a non-zero status.
    #[error("`limactl {command}` failed: {stderr}")]
    CommandFailed {
        /// The subcommand and arguments that were run.
        command: String,
        /// Trimmed stderr output of the failed invocation.
        stderr: String,
    },

    /// One line of `limactl list` output was not a valid VM record.
    #[error("failed to parse VM record `{line}`: {source}")]
    Parse {
        /// The offending output line.
        line: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_installed() {
        let err = LimaError::NotInstalled {
            message: "No such file or directory".into(),
        };
        assert_eq!(
            err.to_string(),
            "limactl not available: No such file or directory"
        );
    }

    #[test]
    fn display_command_failed() {
        let err = LimaError::CommandFailed {
            command: "stop default".into(),
            stderr: "instance not running".into(),
        };
        assert_eq!(
            err.to_string(),
            "`limactl stop default` failed: instance not running"
        );
    }

    #[test]
    fn display_parse_names_line() {
        let source = serde_json::from_str::<serde_json::Value>("{oops")
            .expect_err("should not parse");
        let err = LimaError::Parse {
            line: "{oops".into(),
            source,
        };
        assert!(err.to_string().contains("{oops"));
    }
}

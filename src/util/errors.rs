//! Domain error types.
//!
//! Operations return `anyhow::Result`; these variants are raised into it so
//! callers can classify a failure with `downcast_ref::<NoirError>()`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Errors surfaced to the user.
#[derive(Debug, Error)]
pub enum NoirError {
    /// A user-fixable configuration or workspace problem.
    #[error("{}", ConfigMessage { message, items })]
    Config {
        message: String,
        items: Vec<String>,
        help: Option<String>,
    },

    /// An external process could not be spawned or exited non-zero.
    #[error("`{command}` failed{}", ExitSuffix { status: *status, stderr })]
    Toolchain {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("circuit `{name}` has not been compiled: {} does not exist", path.display())]
    ArtifactNotFound { name: String, path: PathBuf },

    #[error("{} is not a valid compiled circuit: {reason}", path.display())]
    ArtifactParse {
        name: String,
        path: PathBuf,
        reason: String,
    },
}

impl NoirError {
    /// A config error with no item list.
    pub fn config(message: impl Into<String>) -> Self {
        NoirError::Config {
            message: message.into(),
            items: Vec::new(),
            help: None,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            NoirError::Config {
                message,
                items,
                help,
            } => {
                let mut diag = Diagnostic::error(message.clone());
                for item in items {
                    diag = diag.with_context(item.clone());
                }
                if let Some(help) = help {
                    diag = diag.with_suggestion(help.clone());
                }
                diag
            }
            NoirError::Toolchain {
                command,
                status,
                stderr,
            } => {
                let mut diag = Diagnostic::error(format!("`{}` failed", command));
                if let Some(code) = status {
                    diag = diag.with_context(format!("exit code {}", code));
                }
                for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
                    diag = diag.with_context(line.to_string());
                }
                diag.with_suggestion(suggestions::TOOLCHAIN_FAILED)
            }
            NoirError::ArtifactNotFound { name, path } => {
                Diagnostic::error(format!("circuit `{}` has not been compiled", name))
                    .with_location(path.clone())
                    .with_suggestion(suggestions::NOT_COMPILED)
            }
            NoirError::ArtifactParse { path, reason, .. } => {
                Diagnostic::error(format!("{} is not a valid compiled circuit", path.display()))
                    .with_context(reason.clone())
                    .with_suggestion(suggestions::REBUILD)
            }
        }
    }
}

struct ConfigMessage<'a> {
    message: &'a str,
    items: &'a [String],
}

impl fmt::Display for ConfigMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for item in self.items {
            write!(f, "\n- {}", item)?;
        }
        Ok(())
    }
}

struct ExitSuffix<'a> {
    status: Option<i32>,
    stderr: &'a str,
}

impl fmt::Display for ExitSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.status {
            write!(f, " with exit code {}", code)?;
        }
        if !self.stderr.is_empty() {
            write!(f, "\n{}", self.stderr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_lists_every_item() {
        let err = NoirError::Config {
            message: "You are missing these Noir folders in the root Nargo.toml:".into(),
            items: vec!["a".into(), "b".into()],
            help: None,
        };

        assert_eq!(
            err.to_string(),
            "You are missing these Noir folders in the root Nargo.toml:\n- a\n- b"
        );
    }

    #[test]
    fn test_toolchain_error_display() {
        let err = NoirError::Toolchain {
            command: "nargo compile".into(),
            status: Some(1),
            stderr: "error: oops".into(),
        };
        assert_eq!(err.to_string(), "`nargo compile` failed with exit code 1\nerror: oops");
    }

    #[test]
    fn test_artifact_not_found_diagnostic() {
        let err = NoirError::ArtifactNotFound {
            name: "my_circuit".into(),
            path: PathBuf::from("noir/target/my_circuit.json"),
        };

        let out = err.to_diagnostic().format(false);
        assert!(out.contains("circuit `my_circuit` has not been compiled"));
        assert!(out.contains("noir/target/my_circuit.json"));
        assert!(out.contains("noirkit build"));
    }
}

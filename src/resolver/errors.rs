//! Configuration error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Fatal error while resolving host configuration.
///
/// Every variant reflects a static misconfiguration of the machine, so none
/// of them is retried: configuration stops at the first one.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigError {
    /// No usable install anywhere in the fallback chain.
    #[error("{component} {requested} requested, but no path for this or an earlier version given in the host config")]
    #[diagnostic(code(hostconf::config::missing_dependency))]
    MissingDependency {
        component: String,
        requested: String,
        tried: Vec<String>,
    },

    /// A mandatory library has no path at all.
    #[error("{component} required, but no path given in the host config")]
    #[diagnostic(code(hostconf::config::not_configured))]
    NotConfigured { component: String },

    /// A configured path does not exist.
    #[error("cannot use {component} from {}: path does not exist", path.display())]
    #[diagnostic(code(hostconf::config::path_not_found))]
    PathNotFound { component: String, path: PathBuf },

    /// A directory the resolver derived from an install is missing.
    #[error("{component} {what} directory {} not found", path.display())]
    #[diagnostic(code(hostconf::config::directory_not_found))]
    DirectoryNotFound {
        component: String,
        what: String,
        path: PathBuf,
    },

    /// The version header is missing or has no version line.
    #[error("{message}: {}", path.display())]
    #[diagnostic(code(hostconf::config::version_header))]
    VersionHeader { path: PathBuf, message: String },

    /// The requested version is not one the resolver knows about.
    #[error("unrecognised {component} version requested: {version}")]
    #[diagnostic(code(hostconf::config::unknown_version))]
    UnknownVersion { component: String, version: String },

    /// A version string that could not be interpreted.
    #[error("invalid {component} version `{version}`")]
    #[diagnostic(code(hostconf::config::invalid_version))]
    InvalidVersion { component: String, version: String },

    /// Preferred versions were given but the machine cannot honour them.
    #[error("machine configuration `{machine}` has no support for setting preferred library versions")]
    #[diagnostic(code(hostconf::config::unsupported_preferences))]
    UnsupportedPreferences {
        machine: String,
        preferences: Vec<String>,
    },

    /// A compiled library artifact could not be found on disk.
    #[error("{component} library {library} not found in {}", path.display())]
    #[diagnostic(code(hostconf::config::library_not_found))]
    LibraryNotFound {
        component: String,
        library: String,
        path: PathBuf,
    },

    #[error("failed to read {}", path.display())]
    #[diagnostic(code(hostconf::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Shorthand for a path that must exist but doesn't.
    pub fn path_not_found(component: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ConfigError::PathNotFound {
            component: component.into(),
            path: path.into(),
        }
    }

    /// Shorthand for a derived directory that is missing.
    pub fn directory_not_found(
        component: impl Into<String>,
        what: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        ConfigError::DirectoryNotFound {
            component: component.into(),
            what: what.into(),
            path: path.into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::MissingDependency {
                component, tried, ..
            } => {
                let mut diag = Diagnostic::error(self.to_string());
                if !tried.is_empty() {
                    diag = diag.with_context(format!("versions tried: {}", tried.join(", ")));
                }
                diag.with_suggestion(format!(
                    "Set the install path for {} in the machine file",
                    component
                ))
                .with_suggestion(suggestions::LIST_MACHINES)
            }

            ConfigError::NotConfigured { component } => Diagnostic::error(self.to_string())
                .with_suggestion(format!(
                    "Set the install path for {} in the machine file",
                    component
                ))
                .with_suggestion(suggestions::LIST_MACHINES),

            ConfigError::PathNotFound { path, .. } | ConfigError::DirectoryNotFound { path, .. } => {
                Diagnostic::error(self.to_string())
                    .with_location(path)
                    .with_suggestion("Check the path in the machine file")
            }

            ConfigError::VersionHeader { path, .. } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_suggestion("Point the CVODE location at its install prefix"),

            ConfigError::UnknownVersion { .. } | ConfigError::InvalidVersion { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::BUILD_TYPE)
            }

            ConfigError::UnsupportedPreferences { preferences, .. } => {
                Diagnostic::error(self.to_string())
                    .with_context(format!("preferences: {}", preferences.join(", ")))
                    .with_suggestion("Drop the `_hostconfig` section from the build type")
                    .with_suggestion("Give the machine file a [locations] table")
            }

            ConfigError::LibraryNotFound { path, .. } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_suggestion("Check that the library was built with this toolchain"),

            ConfigError::Io { path, source } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_diagnostic() {
        let err = ConfigError::MissingDependency {
            component: "PETSc".to_string(),
            requested: "3.1".to_string(),
            tried: vec!["3.1".to_string(), "3.0".to_string()],
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("PETSc 3.1 requested"));
        assert!(output.contains("versions tried: 3.1, 3.0"));
        assert!(output.contains("help: consider:"));
    }

    #[test]
    fn test_path_not_found_message() {
        let err = ConfigError::path_not_found("Boost", "/opt/boost");
        assert_eq!(
            err.to_string(),
            "cannot use Boost from /opt/boost: path does not exist"
        );
        assert!(err.to_diagnostic().format(false).contains("--> /opt/boost"));
    }
}

//! Build descriptions.
//!
//! A build type names the compiler family and the flavour of libraries the
//! build wants. It can be given on the command line as individual flags or as
//! a compact build string:
//!
//! ```text
//! GccOpt
//! IntelProduction
//! Profile_hostconfig,petsc=3.0,boost=1.40
//! ```
//!
//! The part after `_hostconfig,` lists preferred library versions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::version::BuildVariant;

/// Compiler family used for the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerFamily {
    #[default]
    Gcc,
    Intel,
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerFamily::Gcc => write!(f, "gcc"),
            CompilerFamily::Intel => write!(f, "intel"),
        }
    }
}

impl FromStr for CompilerFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcc" | "gnu" => Ok(CompilerFamily::Gcc),
            "intel" | "icpc" => Ok(CompilerFamily::Intel),
            other => Err(format!("unknown compiler family `{}`", other)),
        }
    }
}

/// Preferred library versions, keyed by library name.
pub type PreferredVersions = BTreeMap<String, String>;

/// The build being configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildType {
    pub compiler: CompilerFamily,
    pub optimised: bool,
    pub profile: bool,
    pub production: bool,
    /// Dump the resolved configuration
    pub debug: bool,
    pub using_dealii: bool,
    /// Link the `.g` debugging builds of Deal.II
    pub dealii_debugging: bool,
    pub preferred_versions: PreferredVersions,
    /// Tool name to command
    pub tools: BTreeMap<String, String>,
}

impl Default for BuildType {
    fn default() -> Self {
        BuildType {
            compiler: CompilerFamily::Gcc,
            optimised: false,
            profile: false,
            production: false,
            debug: false,
            using_dealii: false,
            dealii_debugging: false,
            preferred_versions: PreferredVersions::new(),
            tools: default_tools(),
        }
    }
}

fn default_tools() -> BTreeMap<String, String> {
    [
        ("cxx", "g++"),
        ("ar", "ar"),
        ("mpicxx", "mpicxx"),
        ("mpirun", "mpirun"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl BuildType {
    pub fn new(compiler: CompilerFamily) -> Self {
        BuildType {
            compiler,
            ..Default::default()
        }
    }

    /// Library flavour matching the build flags.
    pub fn variant(&self) -> BuildVariant {
        BuildVariant::from_flags(self.optimised, self.profile, self.production)
    }

    /// Add a preferred version for a library.
    pub fn prefer(&mut self, library: impl Into<String>, version: impl Into<String>) {
        self.preferred_versions.insert(library.into(), version.into());
    }

    /// Log everything about this build at debug level.
    pub fn dump_debug_info(&self) {
        tracing::debug!("build: {}", self);
        tracing::debug!("variant: {}", self.variant());
        for (name, cmd) in &self.tools {
            tracing::debug!("tool {} = {}", name, cmd);
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family = match self.compiler {
            CompilerFamily::Gcc => "Gcc",
            CompilerFamily::Intel => "Intel",
        };
        write!(f, "{}", family)?;
        if self.production {
            write!(f, "Production")?;
        } else if self.profile {
            write!(f, "Profile")?;
        } else if self.optimised {
            write!(f, "Opt")?;
        }
        if self.using_dealii {
            write!(f, "Dealii")?;
        }
        if !self.preferred_versions.is_empty() {
            write!(f, "_hostconfig")?;
            for (lib, version) in &self.preferred_versions {
                write!(f, ",{}={}", lib, version)?;
            }
        }
        Ok(())
    }
}

/// Error parsing a build string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid build type `{input}`: {reason}")]
pub struct BuildTypeParseError {
    pub input: String,
    pub reason: String,
}

impl FromStr for BuildType {
    type Err = BuildTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason: String| BuildTypeParseError {
            input: s.to_string(),
            reason,
        };

        let mut parts = s.split('_');
        let head = parts.next().unwrap_or_default();

        let mut build = BuildType::default();
        let mut rest = head;
        for (prefix, family) in [("Gcc", CompilerFamily::Gcc), ("Intel", CompilerFamily::Intel)] {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                build.compiler = family;
                rest = stripped;
                break;
            }
        }

        while !rest.is_empty() {
            let (consumed, flag) = [
                ("Production", "production"),
                ("Profile", "profile"),
                ("Opt", "opt"),
                ("Dealii", "dealii"),
                ("Debug", "debug"),
            ]
            .into_iter()
            .find(|(token, _)| rest.starts_with(token))
            .ok_or_else(|| err(format!("unrecognised component `{}`", rest)))?;

            match flag {
                "production" => {
                    build.production = true;
                    build.optimised = true;
                }
                "profile" => build.profile = true,
                "opt" => build.optimised = true,
                "dealii" => build.using_dealii = true,
                _ => build.debug = true,
            }
            rest = &rest[consumed.len()..];
        }

        // Anything after the first underscore is either `ndebug` style
        // suffixes we ignore, or a `hostconfig,lib=ver,...` section.
        for part in parts {
            let mut items = part.split(',');
            if items.next() != Some("hostconfig") {
                continue;
            }
            for item in items.filter(|i| !i.is_empty()) {
                let (lib, version) = item
                    .split_once('=')
                    .ok_or_else(|| err(format!("expected `lib=version`, got `{}`", item)))?;
                // '-' is accepted in place of '.' in versions
                build.prefer(lib, version.replace('-', "."));
            }
        }

        Ok(build)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_build() {
        let build = BuildType::default();
        assert_eq!(build.compiler, CompilerFamily::Gcc);
        assert_eq!(build.variant(), BuildVariant::Debug);
        assert_eq!(build.tools.get("mpicxx").map(String::as_str), Some("mpicxx"));
    }

    #[test]
    fn test_parse_simple() {
        let build: BuildType = "GccOpt".parse().unwrap();
        assert!(build.optimised);
        assert_eq!(build.variant(), BuildVariant::Optimized);

        let build: BuildType = "IntelProduction".parse().unwrap();
        assert_eq!(build.compiler, CompilerFamily::Intel);
        assert!(build.production);
        assert_eq!(build.variant(), BuildVariant::Production);

        let build: BuildType = "Profile".parse().unwrap();
        assert_eq!(build.compiler, CompilerFamily::Gcc);
        assert_eq!(build.variant(), BuildVariant::Profile);
    }

    #[test]
    fn test_parse_hostconfig_preferences() {
        let build: BuildType = "GccOpt_hostconfig,petsc=3-0,boost=1-40".parse().unwrap();
        assert_eq!(
            build.preferred_versions.get("petsc").map(String::as_str),
            Some("3.0")
        );
        assert_eq!(
            build.preferred_versions.get("boost").map(String::as_str),
            Some("1.40")
        );
    }

    #[test]
    fn test_parse_ignores_other_suffixes() {
        let build: BuildType = "GccOpt_ndebug".parse().unwrap();
        assert!(build.optimised);
        assert!(build.preferred_versions.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!("GccFast".parse::<BuildType>().is_err());
        assert!("Gcc_hostconfig,petsc".parse::<BuildType>().is_err());
    }

    #[test]
    fn test_display_round_trip_shape() {
        let mut build = BuildType::new(CompilerFamily::Intel);
        build.optimised = true;
        build.prefer("petsc", "3.0");
        assert_eq!(build.to_string(), "IntelOpt_hostconfig,petsc=3.0");
    }
}

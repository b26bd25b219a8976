//! Library versions, fallback chains and build variants.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported PETSc release series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PetscVersion {
    #[serde(rename = "2.2")]
    V2_2,
    #[serde(rename = "2.3")]
    V2_3,
    #[serde(rename = "3.0")]
    V3_0,
    #[serde(rename = "3.1")]
    V3_1,
}

impl PetscVersion {
    /// Newest first.
    pub const CHAIN: [PetscVersion; 4] = [
        PetscVersion::V3_1,
        PetscVersion::V3_0,
        PetscVersion::V2_3,
        PetscVersion::V2_2,
    ];

    /// The fallback chain starting at `self` and walking down to the oldest release.
    pub fn chain(self) -> VersionChain<PetscVersion> {
        VersionChain::new(Self::CHAIN.to_vec()).starting_at(&self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PetscVersion::V2_2 => "2.2",
            PetscVersion::V2_3 => "2.3",
            PetscVersion::V3_0 => "3.0",
            PetscVersion::V3_1 => "3.1",
        }
    }

    /// Whether this release uses the 3.x `<arch>/{include,lib}` layout.
    pub fn is_v3(&self) -> bool {
        matches!(self, PetscVersion::V3_0 | PetscVersion::V3_1)
    }
}

impl fmt::Display for PetscVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetscVersion {
    type Err = String;

    /// Only the first three characters are significant, so `3.0.0-p12` selects 3.0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let prefix: String = s.chars().take(3).collect();
        match prefix.as_str() {
            "2.2" => Ok(PetscVersion::V2_2),
            "2.3" => Ok(PetscVersion::V2_3),
            "3.0" => Ok(PetscVersion::V3_0),
            "3.1" => Ok(PetscVersion::V3_1),
            _ => Err(s.to_string()),
        }
    }
}

/// An ordered list of acceptable versions, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChain<V> {
    versions: Vec<V>,
}

impl<V: PartialEq + Clone> VersionChain<V> {
    pub fn new(versions: Vec<V>) -> Self {
        VersionChain { versions }
    }

    /// Drop every version ahead of `start`. If `start` is not in the chain
    /// the chain becomes empty.
    pub fn starting_at(mut self, start: &V) -> Self {
        match self.versions.iter().position(|v| v == start) {
            Some(idx) => {
                self.versions.drain(..idx);
            }
            None => self.versions.clear(),
        }
        self
    }

    pub fn versions(&self) -> &[V] {
        &self.versions
    }

    /// Walk the chain and return the first version whose install path is
    /// configured and is an existing directory.
    pub fn select<P, F>(&self, mut install_path: F) -> Option<(V, P)>
    where
        P: AsRef<Path>,
        F: FnMut(&V) -> Option<P>,
    {
        for version in &self.versions {
            match install_path(version) {
                Some(path) if path.as_ref().is_dir() => return Some((version.clone(), path)),
                Some(path) => {
                    tracing::debug!(
                        "skipping version: {} is not a directory",
                        path.as_ref().display()
                    );
                }
                None => {}
            }
        }
        None
    }
}

/// Named flavour of a compiled library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    #[default]
    Debug,
    Optimized,
    Profile,
    Production,
}

impl BuildVariant {
    /// Select the variant from build flags. Production beats profile beats optimised.
    pub fn from_flags(optimised: bool, profile: bool, production: bool) -> Self {
        if production {
            BuildVariant::Production
        } else if profile {
            BuildVariant::Profile
        } else if optimised {
            BuildVariant::Optimized
        } else {
            BuildVariant::Debug
        }
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildVariant::Debug => write!(f, "debug"),
            BuildVariant::Optimized => write!(f, "optimized"),
            BuildVariant::Profile => write!(f, "profile"),
            BuildVariant::Production => write!(f, "production"),
        }
    }
}

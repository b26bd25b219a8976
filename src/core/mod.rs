//! Core data structures for hostconf.
//!
//! This module contains the foundational types used throughout hostconf:
//! - Configuration profiles (where a machine keeps its libraries)
//! - Link parameter accumulators
//! - Build types and variants
//! - Version fallback chains

pub mod accumulator;
pub mod build;
pub mod profile;
pub mod version;

pub use accumulator::LinkParameters;
pub use build::{BuildType, CompilerFamily, PreferredVersions};
pub use profile::{ConfigProfile, Feature};
pub use version::{BuildVariant, PetscVersion, VersionChain};

//! hostconf - host-specific library resolution for C++ scientific builds
//!
//! Given a machine profile saying where PETSc, Deal.II, Boost, HDF5 and
//! friends are installed, and a description of the build, this crate works
//! out the include paths, library paths, link libraries, tool commands and
//! preprocessor defines the build should use.

pub mod core;
pub mod machines;
pub mod ops;
pub mod resolver;
pub mod util;

/// Fake library installs for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use core::{BuildType, ConfigProfile, LinkParameters};
pub use machines::{Machine, MachineRegistry};
pub use resolver::{configure, ConfigError, Configuration, ConfigureOptions};
pub use util::context::GlobalContext;

//! Test utilities for hostconf unit tests.
//!
//! Resolution is driven entirely by what exists on disk, so most tests build
//! a fake install tree inside a `TempDir` and point a profile at it.
//!
//! # Example
//!
//! ```rust,ignore
//! use hostconf::test_support::PetscInstall;
//!
//! #[test]
//! fn test_example() {
//!     let tmp = tempfile::TempDir::new().unwrap();
//!     let petsc = PetscInstall::v3(tmp.path().join("petsc"), "linux-gnu").create();
//!     // Point a profile at `petsc` and resolve...
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;

/// Assertion helpers for testing.
pub mod assertions {
    use std::path::Path;

    /// Assert that a result is Err and return the error.
    pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>) -> E {
        match result {
            Ok(v) => panic!("expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    }

    /// Assert that `paths` appear in `haystack` in the given relative order.
    pub fn assert_in_order<P: AsRef<Path>>(haystack: &[P], paths: &[&Path]) {
        let mut last = None;
        for path in paths {
            let idx = haystack
                .iter()
                .position(|p| p.as_ref() == *path)
                .unwrap_or_else(|| panic!("{} not present", path.display()));
            if let Some(prev) = last {
                assert!(idx > prev, "{} out of order", path.display());
            }
            last = Some(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::assertions::*;
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    #[test]
    fn test_petsc_fixture_layouts() {
        let tmp = TempDir::new().unwrap();

        let v3 = PetscInstall::v3(tmp.path().join("v3"), "arch")
            .with_bundled_mpi()
            .create();
        assert!(v3.join("include").is_dir());
        assert!(v3.join("arch/lib").is_dir());
        assert!(v3.join("arch/bin/mpirun").is_file());

        let v23 = PetscInstall::v2_3(tmp.path().join("v23"), "arch").create();
        assert!(v23.join("lib/arch").is_dir());
        assert!(v23.join("bmake/arch").is_dir());

        let v22 = PetscInstall::v2_2(tmp.path().join("v22"), "arch", "libg_c++").create();
        assert!(v22.join("lib/libg_c++/arch").is_dir());
    }

    #[test]
    fn test_dealii_fixture() {
        let tmp = TempDir::new().unwrap();
        let base = DealiiInstall::new(tmp.path().join("deal.II"), "6.1.0").create();
        assert_eq!(
            std::fs::read_to_string(base.join("Version")).unwrap().trim(),
            "6.1.0"
        );
        assert!(base.join("lib").is_dir());
    }

    #[test]
    fn test_assert_in_order() {
        let paths = vec![PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")];
        assert_in_order(&paths, &[Path::new("/a"), Path::new("/c")]);

        let err: Result<(), &str> = Err("boom");
        assert_eq!(assert_err(err), "boom");
    }
}

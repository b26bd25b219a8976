//! Auxiliary libraries installed in non-standard locations.
//!
//! Each override first removes whatever the profile already says about the
//! library: entries matching an identifying substring, and entries under the
//! base path of any earlier override of the same library. It then appends
//! entries for the new base path. Applying an override twice therefore leaves
//! only the second location behind.

use std::path::Path;

use glob::Pattern;
use serde::{Deserialize, Serialize};

use super::{check_path_exists, ConfigError};
use crate::core::accumulator::{remove_libraries_with_prefix, remove_matching_paths};
use crate::core::profile::ConfigProfile;
use crate::util::fs::glob_paths;

/// An auxiliary library that can be relocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    /// Boost, with a version such as `1.36` or `1.33.1`
    Boost { version: String },
    Hdf5,
    Xerces,
    #[serde(rename = "parmetis")]
    ParMetis,
    /// CodeSynthesis XSD
    Xsd,
}

/// Point the profile at a library installed under `base`.
pub fn add_non_standard_location(
    profile: &mut ConfigProfile,
    location: &Location,
    base: &Path,
) -> Result<(), ConfigError> {
    match location {
        Location::Boost { version } => add_boost(profile, base, version),
        Location::Hdf5 => add_hdf5(profile, base),
        Location::Xerces => add_xerces(profile, base),
        Location::ParMetis => add_parmetis(profile, base),
        Location::Xsd => add_xsd(profile, base),
    }
}

/// Boost libraries whose link names must match the installed suffix.
const BOOST_LIBS: [&str; 1] = ["boost_serialization"];

/// Use Boost from `base`, which must contain `include` and `lib`.
///
/// Boost encodes the toolchain in library file names
/// (`libboost_serialization-gcc43-mt.so`), so the suffix is discovered from
/// the first matching shared library, or static library if there are none.
pub fn add_boost(profile: &mut ConfigProfile, base: &Path, version: &str) -> Result<(), ConfigError> {
    check_path_exists(base, "Boost")?;

    forget_previous(profile, "boost", base);
    remove_libraries_with_prefix(&mut profile.other_libraries, "boost_");
    remove_matching_paths(&mut profile.other_includepaths, "boost");
    remove_matching_paths(&mut profile.other_libpaths, "boost");

    let include = if boost_has_flat_includes(version)? {
        base.join("include")
    } else {
        base.join("include")
            .join(format!("boost-{}", version.replace('.', "_")))
    };
    profile.other_includepaths.push(include);

    let lib_path = base.join("lib");
    profile.other_libpaths.push(lib_path.clone());

    let suffix = boost_suffix(&lib_path, BOOST_LIBS[0])?;
    tracing::debug!("Boost library suffix: `{}`", suffix);
    profile
        .other_libraries
        .extend(BOOST_LIBS.iter().map(|lib| format!("{}{}", lib, suffix)));
    Ok(())
}

/// Boost 1.40 and later install headers directly under `include`.
fn boost_has_flat_includes(version: &str) -> Result<bool, ConfigError> {
    // Only the leading `major.minor` matters, so `1.33.1` compares as 1.33.
    let head: String = version.chars().take(4).collect();
    head.parse::<f64>()
        .map(|v| v >= 1.40)
        .map_err(|_| ConfigError::InvalidVersion {
            component: "Boost".to_string(),
            version: version.to_string(),
        })
}

fn boost_suffix(lib_path: &Path, lib: &str) -> Result<String, ConfigError> {
    let stem = format!("lib{}", lib);
    let prefix = Pattern::escape(&lib_path.join(&stem).display().to_string());

    let mut found = None;
    for ext in ["so", "a"] {
        let pattern = format!("{}*.{}", prefix, ext);
        let matches = glob_paths(&pattern).map_err(|e| ConfigError::LibraryNotFound {
            component: "Boost".to_string(),
            library: format!("{} ({:#})", lib, e),
            path: lib_path.to_path_buf(),
        })?;
        if let Some(first) = matches.into_iter().next() {
            found = Some(first);
            break;
        }
    }

    let artifact = found.ok_or_else(|| ConfigError::LibraryNotFound {
        component: "Boost".to_string(),
        library: lib.to_string(),
        path: lib_path.to_path_buf(),
    })?;

    let file_name = artifact
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let rest = file_name.strip_prefix(&stem).unwrap_or_default();
    Ok(rest
        .rsplit_once('.')
        .map(|(suffix, _ext)| suffix.to_string())
        .unwrap_or_default())
}

/// Use HDF5 from `base`.
pub fn add_hdf5(profile: &mut ConfigProfile, base: &Path) -> Result<(), ConfigError> {
    replace_include_and_lib(profile, base, "HDF5", "hdf5")?;
    add_libraries_once(profile, "hdf5", &["hdf5", "z"]);
    Ok(())
}

/// Use Xerces-C from `base`.
pub fn add_xerces(profile: &mut ConfigProfile, base: &Path) -> Result<(), ConfigError> {
    replace_include_and_lib(profile, base, "Xerces", "xerces")?;
    add_libraries_once(profile, "xerces-c", &["xerces-c"]);
    Ok(())
}

/// Use ParMETIS from `base`. Headers and libraries live side by side.
pub fn add_parmetis(profile: &mut ConfigProfile, base: &Path) -> Result<(), ConfigError> {
    check_path_exists(base, "ParMetis")?;
    forget_previous(profile, "parmetis", base);
    remove_matching_paths(&mut profile.other_includepaths, "ParMetis");
    remove_matching_paths(&mut profile.other_libpaths, "ParMetis");
    profile.other_includepaths.push(base.to_path_buf());
    profile.other_libpaths.push(base.to_path_buf());
    add_libraries_once(profile, "parmetis", &["parmetis", "metis"]);
    Ok(())
}

/// Use CodeSynthesis XSD from `base`. Header-only, plus the `xsd` tool.
pub fn add_xsd(profile: &mut ConfigProfile, base: &Path) -> Result<(), ConfigError> {
    check_path_exists(base, "XSD")?;
    forget_previous(profile, "xsd", base);
    remove_matching_paths(&mut profile.other_includepaths, "libxsd");
    profile.other_includepaths.push(base.join("libxsd"));
    profile.tools.insert(
        "xsd".to_string(),
        base.join("bin").join("xsd").display().to_string(),
    );
    Ok(())
}

fn replace_include_and_lib(
    profile: &mut ConfigProfile,
    base: &Path,
    component: &str,
    needle: &str,
) -> Result<(), ConfigError> {
    check_path_exists(base, component)?;
    forget_previous(profile, needle, base);
    remove_matching_paths(&mut profile.other_includepaths, needle);
    remove_matching_paths(&mut profile.other_libpaths, needle);
    profile.other_includepaths.push(base.join("include"));
    profile.other_libpaths.push(base.join("lib"));
    Ok(())
}

/// Drop paths under the base of the previous override of `library`, and
/// record `base` as the current one.
fn forget_previous(profile: &mut ConfigProfile, library: &str, base: &Path) {
    let Some(previous) = profile
        .override_bases
        .insert(library.to_string(), base.to_path_buf())
    else {
        return;
    };
    profile.other_includepaths.retain(|p| !p.starts_with(&previous));
    profile.other_libpaths.retain(|p| !p.starts_with(&previous));
}

fn add_libraries_once(profile: &mut ConfigProfile, marker: &str, libs: &[&str]) {
    if !profile.other_libraries.iter().any(|l| l == marker) {
        profile
            .other_libraries
            .extend(libs.iter().map(|l| l.to_string()));
    }
}

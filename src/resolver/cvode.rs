//! CVODE (SUNDIALS) version detection.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::bytes::Regex;

use super::ConfigError;

// Matched against raw bytes: headers may carry non-UTF-8 comments.
static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^#define SUNDIALS_PACKAGE_VERSION "(\d+)\.(\d+)\.(\d+)""#)
        .unwrap_or_else(|e| panic!("invalid version pattern: {}", e))
});

/// Location of the SUNDIALS configuration header under an include directory.
pub fn config_header(include_path: &Path) -> PathBuf {
    include_path.join("sundials").join("sundials_config.h")
}

/// Read the packed SUNDIALS version (`major*10000 + minor*100 + patch`)
/// from a `sundials_config.h` header.
///
/// The first matching `#define` wins.
pub fn parse_version_header(path: &Path) -> Result<u32, ConfigError> {
    let contents = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::VersionHeader {
            path: path.to_path_buf(),
            message: "unable to find sundials_config.h to read CVODE version".to_string(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let header_error = |message: String| ConfigError::VersionHeader {
        path: path.to_path_buf(),
        message,
    };

    for line in contents.split(|b| *b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let Some(caps) = VERSION_LINE.captures(line) else {
            continue;
        };
        let part = |i: usize| -> Result<u32, ConfigError> {
            let digits = String::from_utf8_lossy(&caps[i]);
            digits
                .parse::<u32>()
                .map_err(|_| header_error(format!("version component `{}` out of range", digits)))
        };
        let (major, minor, patch) = (part(1)?, part(2)?, part(3)?);
        return major
            .checked_mul(10000)
            .and_then(|v| v.checked_add(minor.checked_mul(100)?))
            .and_then(|v| v.checked_add(patch))
            .ok_or_else(|| {
                header_error(format!(
                    "version {}.{}.{} out of range",
                    major, minor, patch
                ))
            });
    }

    Err(header_error(
        "unable to find version string within sundials_config.h".to_string(),
    ))
}

/// Detect the CVODE version installed under `include_path`.
pub fn determine_cvode_version(include_path: &Path) -> Result<u32, ConfigError> {
    let header = config_header(include_path);
    let version = parse_version_header(&header)?;
    tracing::debug!("CVODE version {} from {}", version, header.display());
    Ok(version)
}

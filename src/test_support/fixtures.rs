//! Fake library installs for resolution tests.

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum PetscLayout {
    /// `lib/<libdir>/<build>`, `bmake/<build>`
    V2_2 { libdir: String },
    /// `lib/<build>`, `bmake/<build>`
    V2_3,
    /// `<build>/{lib,include}`
    V3,
}

/// A PETSc install tree.
#[derive(Debug, Clone)]
pub struct PetscInstall {
    base: PathBuf,
    build_name: String,
    layout: PetscLayout,
    bundled_mpi: bool,
}

impl PetscInstall {
    /// PETSc 2.2; `libdir` is `libO_c++` (optimised) or `libg_c++` (debug).
    pub fn v2_2(base: impl Into<PathBuf>, build_name: &str, libdir: &str) -> Self {
        Self::with_layout(
            base,
            build_name,
            PetscLayout::V2_2 {
                libdir: libdir.to_string(),
            },
        )
    }

    pub fn v2_3(base: impl Into<PathBuf>, build_name: &str) -> Self {
        Self::with_layout(base, build_name, PetscLayout::V2_3)
    }

    /// PETSc 3.0 or 3.1.
    pub fn v3(base: impl Into<PathBuf>, build_name: &str) -> Self {
        Self::with_layout(base, build_name, PetscLayout::V3)
    }

    fn with_layout(base: impl Into<PathBuf>, build_name: &str, layout: PetscLayout) -> Self {
        PetscInstall {
            base: base.into(),
            build_name: build_name.to_string(),
            layout,
            bundled_mpi: false,
        }
    }

    /// Add `mpicxx` and `mpirun` under `<build>/bin` (3.x only).
    pub fn with_bundled_mpi(mut self) -> Self {
        self.bundled_mpi = true;
        self
    }

    /// Create the tree and return its base path.
    pub fn create(self) -> PathBuf {
        let base = &self.base;
        mkdir(&base.join("include"));
        match &self.layout {
            PetscLayout::V2_2 { libdir } => {
                mkdir(&base.join("lib").join(libdir).join(&self.build_name));
                mkdir(&base.join("bmake").join(&self.build_name));
            }
            PetscLayout::V2_3 => {
                mkdir(&base.join("lib").join(&self.build_name));
                mkdir(&base.join("bmake").join(&self.build_name));
            }
            PetscLayout::V3 => {
                let arch = base.join(&self.build_name);
                mkdir(&arch.join("lib"));
                mkdir(&arch.join("include"));
                if self.bundled_mpi {
                    mkdir(&arch.join("bin"));
                    touch(&arch.join("bin/mpicxx"));
                    touch(&arch.join("bin/mpirun"));
                }
            }
        }
        self.base
    }
}

/// A Deal.II install tree.
#[derive(Debug, Clone)]
pub struct DealiiInstall {
    base: PathBuf,
    version: String,
}

impl DealiiInstall {
    pub fn new(base: impl Into<PathBuf>, version: &str) -> Self {
        DealiiInstall {
            base: base.into(),
            version: version.to_string(),
        }
    }

    pub fn create(self) -> PathBuf {
        mkdir(&self.base.join("lib"));
        for dir in ["base/include", "lac/include", "deal.II/include"] {
            mkdir(&self.base.join(dir));
        }
        fs::write(self.base.join("Version"), format!("{}\n", self.version))
            .expect("failed to write Version");
        self.base
    }
}

/// Write `<include_dir>/sundials/sundials_config.h` declaring `version`.
pub fn write_sundials_header(include_dir: &Path, version: &str) -> PathBuf {
    let dir = include_dir.join("sundials");
    mkdir(&dir);
    let header = dir.join("sundials_config.h");
    fs::write(
        &header,
        format!(
            "/* SUNDIALS configuration header */\n\
             #define SUNDIALS_PACKAGE_VERSION \"{}\"\n\
             #define SUNDIALS_DOUBLE_PRECISION 1\n",
            version
        ),
    )
    .expect("failed to write sundials_config.h");
    header
}

fn mkdir(path: &Path) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("failed to create {}: {}", path.display(), e));
}

fn touch(path: &Path) {
    fs::write(path, "").unwrap_or_else(|e| panic!("failed to create {}: {}", path.display(), e));
}

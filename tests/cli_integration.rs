//! CLI integration tests for hostconf.
//!
//! Each test builds a fake install tree and a machine file in a temporary
//! project, then runs the binary against it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the hostconf binary command, isolated from the user's environment.
fn hostconf(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hostconf").unwrap();
    cmd.current_dir(project)
        .arg("--no-color")
        .arg("--root")
        .arg(project)
        .env("HOME", project)
        .env_remove("HOSTCONF_MACHINE")
        .env_remove("XTPE_COMPILE_TARGET");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Lay out a PETSc 3.x install with a single architecture.
fn petsc_install(base: &Path, arch: &str) -> PathBuf {
    fs::create_dir_all(base.join("include")).unwrap();
    fs::create_dir_all(base.join(arch).join("include")).unwrap();
    fs::create_dir_all(base.join(arch).join("lib")).unwrap();
    base.to_path_buf()
}

fn write_machine(project: &Path, id: &str, content: &str) {
    let dir = project.join(".hostconf/machines");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.toml", id)), content).unwrap();
}

/// A project with a `lab` machine pointing at PETSc 3.1.
fn lab_project() -> (TempDir, PathBuf) {
    let tmp = temp_dir();
    let petsc = petsc_install(&tmp.path().join("petsc-3.1"), "linux-gnu");
    write_machine(
        tmp.path(),
        "lab",
        r#"
description = "Lab workstation"
petsc_path = "petsc-3.1"
other_libraries = ["xerces-c", "hdf5", "z"]
ccflags = "-Wno-deprecated"

[features]
vtk = true
"#,
    );
    (tmp, petsc)
}

// ============================================================================
// hostconf flags
// ============================================================================

#[test]
fn test_flags_for_machine_file() {
    let (tmp, petsc) = lab_project();

    hostconf(tmp.path())
        .args(["--machine", "lab", "flags"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "-I{}",
            petsc.join("linux-gnu/include").display()
        )))
        .stdout(predicate::str::contains("-DCHASTE_VTK"))
        .stdout(predicate::str::contains("-Wno-deprecated"))
        .stdout(predicate::str::contains(
            "-lpetsc -lxerces-c -lhdf5 -lz -lblas -llapack -ldl",
        ));
}

#[test]
fn test_flags_link_only() {
    let (tmp, _) = lab_project();

    hostconf(tmp.path())
        .args(["--machine", "lab", "flags", "--link"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-ldl"))
        .stdout(predicate::str::contains("-I").not());
}

#[test]
fn test_machine_from_project_config() {
    let (tmp, _) = lab_project();
    fs::write(tmp.path().join(".hostconf/config.toml"), "machine = \"lab\"\n").unwrap();

    hostconf(tmp.path())
        .args(["flags", "--compile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-DCHASTE_VTK"));
}

// ============================================================================
// hostconf configure
// ============================================================================

#[test]
fn test_configure_json() {
    let (tmp, petsc) = lab_project();

    let output = hostconf(tmp.path())
        .args(["--machine", "lab", "configure", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["machine"], "lab");
    assert_eq!(json["petsc_version"], "3.1");
    assert_eq!(
        json["lib_paths"][0],
        petsc.join("linux-gnu/lib").display().to_string()
    );
    assert_eq!(json["libraries"].as_array().unwrap().last().unwrap(), "dl");
    assert_eq!(json["tools"]["cxx"], "g++");
}

#[test]
fn test_configure_falls_back_to_older_petsc() {
    let tmp = temp_dir();
    let petsc = tmp.path().join("petsc-2.3");
    fs::create_dir_all(petsc.join("include")).unwrap();
    fs::create_dir_all(petsc.join("bmake/linux-gnu")).unwrap();
    fs::create_dir_all(petsc.join("lib/linux-gnu")).unwrap();
    write_machine(tmp.path(), "old", "petsc_2_3_path = \"petsc-2.3\"\n");

    hostconf(tmp.path())
        .args(["--machine", "old", "configure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PETSc:    2.3"))
        .stdout(predicate::str::contains(
            "petscts petscsnes petscksp petscdm petscmat petscvec petsc",
        ));
}

#[test]
fn test_configure_missing_petsc_reports_diagnostic() {
    let tmp = temp_dir();
    write_machine(tmp.path(), "bare", "");

    hostconf(tmp.path())
        .args(["--machine", "bare", "configure"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: PETSc 3.1 requested, but no path for this or an earlier version given in the host config",
        ))
        .stderr(predicate::str::contains("help: consider:"))
        .stderr(predicate::str::contains("Run with `--verbose`"));
}

#[test]
fn test_configure_rejects_unsupported_preferences() {
    let (tmp, _) = lab_project();

    hostconf(tmp.path())
        .args(["--machine", "lab", "configure", "--prefer", "boost=1.36"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "has no support for setting preferred library versions",
        ));
}

#[test]
fn test_invalid_build_string() {
    let (tmp, _) = lab_project();

    hostconf(tmp.path())
        .args(["--machine", "lab", "configure", "-b", "ClangOpt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid build type `ClangOpt`"));
}

// ============================================================================
// hostconf linkplan
// ============================================================================

#[test]
fn test_linkplan_numbers_libraries() {
    let (tmp, _) = lab_project();

    hostconf(tmp.path())
        .args(["--machine", "lab", "linkplan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. -lpetsc"))
        .stdout(predicate::str::contains("7. -ldl"));
}

// ============================================================================
// hostconf machines
// ============================================================================

#[test]
fn test_machines_lists_builtins_and_files() {
    let (tmp, _) = lab_project();

    hostconf(tmp.path())
        .args(["--machine", "lab", "machines"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default"))
        .stdout(predicate::str::contains("ubuntu"))
        .stdout(predicate::str::contains("* lab"))
        .stdout(predicate::str::contains("Lab workstation"));
}

// ============================================================================
// hostconf cvode-version
// ============================================================================

#[test]
fn test_cvode_version() {
    let tmp = temp_dir();
    let include = tmp.path().join("sundials/include");
    fs::create_dir_all(include.join("sundials")).unwrap();
    fs::write(
        include.join("sundials/sundials_config.h"),
        "#define SUNDIALS_PACKAGE_VERSION \"2.4.0\"\n",
    )
    .unwrap();

    hostconf(tmp.path())
        .args(["cvode-version", "sundials/include"])
        .assert()
        .success()
        .stdout("20400\n");
}

#[test]
fn test_cvode_version_missing_header() {
    let tmp = temp_dir();

    hostconf(tmp.path())
        .args(["cvode-version", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sundials_config.h"));
}

// ============================================================================
// hostconf completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();

    hostconf(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hostconf"));
}

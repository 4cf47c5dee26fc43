//! Exit-code contract of the `kodegen_bundler_nsis` binary.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// Copies the demo project and pre-stages its tree.
fn demo_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/demo/pyproject.toml");
    fs::copy(fixture, dir.path().join("pyproject.toml")).unwrap();

    let bdist = dir.path().join("build").join("bdist.nsis");
    for file in ["package/foo/__init__.py", "package/foo/bar.py", "scripts/run.py"] {
        let path = bdist.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
    fs::create_dir_all(dir.path().join("nsis")).unwrap();
    dir
}

#[test]
fn test_missing_makensis_still_exits_zero() {
    let project = demo_project();

    cargo_bin_cmd!("kodegen_bundler_nsis")
        .arg("--source")
        .arg(project.path())
        .arg("--nsis-dir")
        .arg(project.path().join("nsis"))
        .args(["--skip-install", "--keep-temp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("possible error during NSIS compilation"));

    let script = project.path().join("build").join("bdist.nsis").join("setup.nsi");
    assert!(script.is_file());
    let text = fs::read_to_string(script).unwrap();
    // no-target-optimize from [tool.nsis]
    assert!(text.contains(";!define MISC_OPTIMIZE"));
    assert!(text.contains("Author: Demo Author"));
}

#[test]
fn test_flags_override_configured_versions() {
    let project = demo_project();

    cargo_bin_cmd!("kodegen_bundler_nsis")
        .arg("--source")
        .arg(project.path())
        .arg("-n")
        .arg(project.path().join("nsis"))
        .args(["--skip-install", "-v", "2.6", "--bits", "64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("python_2_6_64"))
        .stdout(predicate::str::contains("python_2_7").not());
}

#[test]
fn test_no_target_versions_fails() {
    let project = demo_project();
    fs::write(
        project.path().join("pyproject.toml"),
        "[project]\nname = \"demo\"\nversion = \"1.0\"\n",
    )
    .unwrap();

    cargo_bin_cmd!("kodegen_bundler_nsis")
        .arg("--source")
        .arg(project.path())
        .arg("--skip-install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"))
        .stderr(predicate::str::contains("nothing was staged"));
}

#[test]
fn test_malformed_version_fails() {
    let project = demo_project();

    cargo_bin_cmd!("kodegen_bundler_nsis")
        .arg("--source")
        .arg(project.path())
        .args(["--skip-install", "-v", "27"])
        .assert()
        .failure();
}

#[test]
fn test_missing_pyproject_fails() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("kodegen_bundler_nsis")
        .arg("--source")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("pyproject.toml"));
}

#[cfg(not(windows))]
#[test]
fn test_native_extensions_fail_off_windows() {
    let project = demo_project();
    let mut manifest = fs::read_to_string(project.path().join("pyproject.toml")).unwrap();
    manifest.push_str(
        "\n[[tool.setuptools.ext-modules]]\nname = \"demo._speedups\"\nsources = [\"speedups.c\"]\n",
    );
    fs::write(project.path().join("pyproject.toml"), manifest).unwrap();

    cargo_bin_cmd!("kodegen_bundler_nsis")
        .arg("--source")
        .arg(project.path())
        .arg("--skip-install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("native extensions"));
}

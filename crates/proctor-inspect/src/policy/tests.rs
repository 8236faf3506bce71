//! Unit tests for content policies.

use std::fs;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

#[fixture]
fn workdir() -> TempDir {
    TempDir::new().expect("temp dir")
}

fn write_script(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write script");
    path
}

#[rstest]
#[case(r"input\(", "name = input()\n", true)]
#[case(r"input\(", "name = 'fixed'\n", false)]
#[case(r"^import os$", "import sys\nimport os\n", false)]
#[case(r"(?m)^import os$", "import sys\nimport os\n", true)]
#[case("print", "x = 1\nprint(x)\n", true)]
#[case("", "", true)]
fn matches_anywhere_in_source(
    #[case] pattern: &str,
    #[case] source: &str,
    #[case] expected: bool,
) {
    let policy = ContentPolicy::new(pattern).expect("compile");
    assert_eq!(policy.matches(source), expected);
    assert_eq!(policy.as_str(), pattern);
}

#[rstest]
#[case("(")]
#[case("[a-")]
#[case(r"\")]
fn invalid_patterns_are_rejected(#[case] pattern: &str) {
    let err = ContentPolicy::new(pattern).expect_err("should not compile");
    let InspectError::InvalidPattern {
        pattern: reported, ..
    } = err
    else {
        panic!("expected InvalidPattern, got {err:?}");
    };
    assert_eq!(reported, pattern);
}

#[rstest]
fn scan_ignores_parseability(workdir: TempDir) {
    let path = write_script(&workdir, "broken.py", "def broken(\n    input(\n");
    assert!(scan_script(&path, r"input\(").expect("scan"));
    assert!(!scan_script(&path, "lambda").expect("scan"));
}

#[rstest]
fn scan_rejects_wrong_extension_before_compiling(workdir: TempDir) {
    let path = write_script(&workdir, "notes.txt", "input()\n");
    let err = scan_script(&path, "(").expect_err("should fail");
    assert!(
        matches!(err, InspectError::InvalidInputKind(_)),
        "expected InvalidInputKind, got {err:?}"
    );
}

#[rstest]
fn scan_compiles_before_reading(workdir: TempDir) {
    let missing = workdir.path().join("missing.py");
    let err = scan_script(&missing, "(").expect_err("should fail");
    assert!(
        matches!(err, InspectError::InvalidPattern { .. }),
        "expected InvalidPattern, got {err:?}"
    );
}

#[rstest]
fn scan_reports_unreadable_script(workdir: TempDir) {
    let missing = workdir.path().join("missing.py");
    let err = scan_script(&missing, "x").expect_err("should fail");
    assert!(
        matches!(err, InspectError::Read { .. }),
        "expected Read, got {err:?}"
    );
}

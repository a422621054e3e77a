//! CLI tests.
//!
//! These spawn the `pbxgraft` binary in a scratch directory and check what it
//! prints and what it leaves on disk.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const FIXTURE: &str = include_str!("fixtures/Demo.pbxproj");

const MANIFEST: &str = r#"{
    "project": "Demo.xcodeproj/project.pbxproj",
    "files": [ { "path": "Services/Foo.swift", "group": "SVCGROUP" } ],
    "new_groups": [
        { "id": "SYNCGROUP", "name": "Sync", "path": "Services/Sync",
          "parent": "SVCGROUP", "files": ["Services/Sync/SyncButton.swift"] }
    ]
}"#;

/// Lay out a project and manifest in a fresh directory.
fn setup(project: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::create_dir(dir.path().join("Demo.xcodeproj")).unwrap();
    fs::write(dir.path().join("Demo.xcodeproj/project.pbxproj"), project).unwrap();
    fs::write(dir.path().join("pbxgraft.json"), MANIFEST).unwrap();
    dir
}

fn pbxgraft(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pbxgraft"))
        .args(args)
        .current_dir(dir)
        .env_remove("PBXGRAFT_MANIFEST")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run pbxgraft")
}

fn project_text(dir: &Path) -> String {
    fs::read_to_string(dir.join("Demo.xcodeproj/project.pbxproj")).unwrap()
}

#[test]
fn test_adds_files_from_local_manifest() {
    let dir = setup(FIXTURE);

    let output = pbxgraft(dir.path(), &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Adding Foo.swift to SVCGROUP"));
    assert!(stdout.contains("Adding SyncButton.swift to new group SYNCGROUP"));
    assert!(stdout.contains("Added 2 files."));

    let text = project_text(dir.path());
    assert!(text.contains("SYNCGROUP /* Sync */ = {"));
}

#[test]
fn test_second_run_reports_skips() {
    let dir = setup(FIXTURE);

    assert!(pbxgraft(dir.path(), &[]).status.success());
    let after_first = project_text(dir.path());

    let output = pbxgraft(dir.path(), &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Skipping Foo.swift - already exists"));
    assert!(stdout.contains("Nothing to add."));
    assert_eq!(project_text(dir.path()), after_first);
}

#[test]
fn test_missing_marker_fails_without_writing() {
    let broken = FIXTURE.replace("/* End PBXFileReference section */", "");
    let dir = setup(&broken);

    let output = pbxgraft(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("PBXFileReference section"));
    assert_eq!(project_text(dir.path()), broken);
}

#[test]
fn test_dry_run_and_tree() {
    let dir = setup(FIXTURE);

    let output = pbxgraft(dir.path(), &["--dry-run", "--tree"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would add 2 files (dry run)."));
    assert!(stdout.contains("SVCGROUP\n├── + Foo.swift\n└── + Sync/\n    └── + SyncButton.swift\n"));
    assert_eq!(project_text(dir.path()), FIXTURE);
}

#[test]
fn test_explicit_project_overrides_manifest() {
    let dir = setup(FIXTURE);
    fs::write(dir.path().join("Other.pbxproj"), FIXTURE).unwrap();

    let output = pbxgraft(dir.path(), &["--project", "Other.pbxproj"]);
    assert!(output.status.success());

    let other = fs::read_to_string(dir.path().join("Other.pbxproj")).unwrap();
    assert!(other.contains("Foo.swift"));
    assert_eq!(project_text(dir.path()), FIXTURE);
}

//! Common test helper functions shared across test modules.
use std::{fs, path::Path};

use crate::{
    analyzer::{CommitClassifier, ReleaseType},
    plugin::{ReleaseRecord, RunOptions},
    vcs::{CommitRecord, MockVcs},
    version::{VersionFormat, VersionResolver, YearMonth},
    workspace::Package,
};

/// Builds a newest-first commit log from messages, with ids `c0`, `c1`, ...
///
/// # Example
/// ```ignore
/// let log = create_test_commits(&["feat: x", "chore: y"]);
/// ```
pub fn create_test_commits(messages: &[&str]) -> Vec<CommitRecord> {
    messages
        .iter()
        .enumerate()
        .map(|(i, message)| CommitRecord {
            id: format!("c{i}"),
            message: message.to_string(),
        })
        .collect()
}

/// Creates run options for `main` in three-part mode, not a dry run.
pub fn create_test_run_options(root: &Path) -> RunOptions {
    RunOptions {
        root: root.to_path_buf(),
        branch: "main".into(),
        dry_run: false,
        remote: "origin".into(),
        version_format: VersionFormat::ThreePart,
        auto_update_month: false,
    }
}

/// Creates a minor release record at `25.08.1` for a package.
pub fn create_test_release_record(
    name: &str,
    path: &str,
    scoped: bool,
) -> ReleaseRecord {
    create_test_release(Package::new(name, path), scoped)
}

/// Like [`create_test_release_record`], for a prepared package.
pub fn create_test_release(package: Package, scoped: bool) -> ReleaseRecord {
    let analysis = CommitClassifier::new()
        .classify(&create_test_commits(&["feat: thing"]), None)
        .unwrap();

    let resolution = VersionResolver::new(
        VersionFormat::ThreePart,
        false,
        YearMonth::new(25, 8),
    )
    .resolve(ReleaseType::Minor, None, &[]);

    ReleaseRecord::new(package, resolution, analysis, scoped)
}

/// Writes `content` to `rel` under `root`, creating parent directories.
pub fn write_test_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Writes a root `package.json` for a single package named `app`.
pub fn create_test_single_package(root: &Path, version: Option<&str>) {
    let content = match version {
        Some(version) => format!(r#"{{"name": "app", "version": "{version}"}}"#),
        None => r#"{"name": "app"}"#.to_string(),
    };
    write_test_file(root, "package.json", &content);
}

/// Writes an npm workspaces monorepo with one package per name under
/// `packages/`.
pub fn create_test_monorepo(root: &Path, names: &[&str]) {
    write_test_file(
        root,
        "package.json",
        r#"{"name": "root", "private": true, "workspaces": ["packages/*"]}"#,
    );

    for name in names {
        write_test_file(
            root,
            &format!("packages/{name}/package.json"),
            &format!(r#"{{"name": "{name}"}}"#),
        );
    }
}

/// A repository on `main` whose history is `commits` (newest first) for any
/// range, with `tags` (newest first) and `changed` files since the latest
/// tag. The working tree is clean and tag and commit
/// mutations succeed without changing anything.
pub fn create_test_vcs(commits: &[&str], tags: &[&str], changed: &[&str]) -> MockVcs {
    let commits = create_test_commits(commits);
    let tags = tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();
    let changed = changed.iter().map(|f| f.to_string()).collect::<Vec<_>>();
    let latest = tags.first().cloned();

    let mut vcs = MockVcs::new();
    vcs.expect_get_commits()
        .returning(move |_| Ok(commits.clone()));
    vcs.expect_get_tags().returning(move || Ok(tags.clone()));
    vcs.expect_get_changed_files()
        .returning(move |_| Ok(changed.clone()));
    vcs.expect_latest_tag().returning(move || Ok(latest.clone()));
    vcs.expect_current_branch().returning(|| Ok("main".into()));
    vcs.expect_is_clean().returning(|| Ok(true));
    vcs.expect_create_tag().returning(|_| Ok(()));
    vcs.expect_push_tag().returning(|_, _| Ok(()));
    vcs.expect_commit_paths().returning(|_, _| Ok(None));
    vcs.expect_push_branch().returning(|_, _| Ok(()));
    vcs
}

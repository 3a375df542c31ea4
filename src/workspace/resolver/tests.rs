use std::fs;
use tempfile::TempDir;

use super::*;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn add_package(root: &Path, dir: &str, name: &str) {
    write(
        root,
        &format!("{dir}/package.json"),
        &format!(r#"{{"name": "{name}", "version": "25.07.1"}}"#),
    );
}

fn paths(workspace: &Workspace) -> Vec<&str> {
    workspace.packages.iter().map(|p| p.path.as_str()).collect()
}

#[test]
fn single_package_without_workspace_config() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "package.json", r#"{"name": "app", "version": "25.07.3"}"#);

    let workspace = WorkspaceResolver::new(dir.path()).resolve();

    assert_eq!(workspace.kind, WorkspaceKind::Single);
    assert!(!workspace.is_monorepo());
    assert_eq!(workspace.packages.len(), 1);
    assert_eq!(workspace.packages[0].name, "app");
    assert_eq!(workspace.packages[0].path, ".");
    assert_eq!(workspace.packages[0].version.as_deref(), Some("25.07.3"));
}

#[test]
fn single_package_without_descriptor_uses_directory_name() {
    let dir = TempDir::new().unwrap();
    let workspace = WorkspaceResolver::new(dir.path()).resolve();

    let expected = dir
        .path()
        .canonicalize()
        .unwrap()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();

    assert_eq!(workspace.packages[0].name, expected);
    assert_eq!(workspace.packages[0].version, None);
}

#[test]
fn package_json_workspaces_expand_wildcards() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "package.json",
        r#"{"name": "root", "private": true, "workspaces": ["packages/*", "tools/cli"]}"#,
    );
    add_package(dir.path(), "packages/ui", "ui");
    add_package(dir.path(), "packages/core", "core");
    add_package(dir.path(), "tools/cli", "cli");
    fs::create_dir_all(dir.path().join("packages/no-descriptor")).unwrap();

    let workspace = WorkspaceResolver::new(dir.path()).resolve();

    assert_eq!(workspace.kind, WorkspaceKind::PackageJson);
    assert_eq!(paths(&workspace), vec!["packages/core", "packages/ui", "tools/cli"]);
    assert_eq!(workspace.packages[0].name, "core");
}

#[test]
fn package_json_workspaces_object_form() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "package.json",
        r#"{"workspaces": {"packages": ["libs/**"]}}"#,
    );
    add_package(dir.path(), "libs/a", "a");

    let workspace = WorkspaceResolver::new(dir.path()).resolve();
    assert_eq!(paths(&workspace), vec!["libs/a"]);
}

#[test]
fn pnpm_workspace_yaml() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "pnpm-workspace.yaml",
        "packages:\n  - 'apps/*'\n  - '!apps/ignored'\n",
    );
    add_package(dir.path(), "apps/web", "web");

    let workspace = WorkspaceResolver::new(dir.path()).resolve();

    assert_eq!(workspace.kind, WorkspaceKind::Pnpm);
    assert_eq!(paths(&workspace), vec!["apps/web"]);
}

#[test]
fn nx_takes_priority_and_uses_conventional_dirs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "nx.json", "{}");
    write(dir.path(), "pnpm-workspace.yaml", "packages:\n  - 'other/*'\n");
    add_package(dir.path(), "apps/web", "web");
    add_package(dir.path(), "libs/shared", "shared");
    add_package(dir.path(), "other/skip", "skip");

    let workspace = WorkspaceResolver::new(dir.path()).resolve();

    assert_eq!(workspace.kind, WorkspaceKind::Nx);
    assert_eq!(paths(&workspace), vec!["apps/web", "libs/shared"]);
}

#[test]
fn nx_workspace_layout_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "nx.json",
        r#"{"workspaceLayout": {"appsDir": "services", "libsDir": "modules"}}"#,
    );
    add_package(dir.path(), "services/api", "api");
    add_package(dir.path(), "modules/db", "db");
    add_package(dir.path(), "apps/web", "web");

    let workspace = WorkspaceResolver::new(dir.path()).resolve();
    assert_eq!(paths(&workspace), vec!["modules/db", "services/api"]);
}

#[test]
fn turbo_reads_descriptor_workspaces() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "turbo.json", r#"{"tasks": {}}"#);
    write(
        dir.path(),
        "package.json",
        r#"{"name": "root", "workspaces": ["pkgs/*"]}"#,
    );
    add_package(dir.path(), "pkgs/one", "one");
    add_package(dir.path(), "packages/two", "two");

    let workspace = WorkspaceResolver::new(dir.path()).resolve();

    assert_eq!(workspace.kind, WorkspaceKind::Turbo);
    assert_eq!(paths(&workspace), vec!["pkgs/one"]);
}

#[test]
fn turbo_falls_back_to_conventional_dirs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "turbo.json", "{}");
    add_package(dir.path(), "packages/two", "two");

    let workspace = WorkspaceResolver::new(dir.path()).resolve();
    assert_eq!(paths(&workspace), vec!["packages/two"]);
}

#[test]
fn duplicate_patterns_are_deduplicated() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "package.json",
        r#"{"workspaces": ["packages/*", "packages/core", "./packages/core"]}"#,
    );
    add_package(dir.path(), "packages/core", "core");

    let workspace = WorkspaceResolver::new(dir.path()).resolve();
    assert_eq!(paths(&workspace), vec!["packages/core"]);
}

#[test_log::test]
fn malformed_config_degrades_to_single_package() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "nx.json", "{ this is not json");
    write(dir.path(), "package.json", r#"{"name": "fallback"}"#);

    let workspace = WorkspaceResolver::new(dir.path()).resolve();

    assert_eq!(workspace.kind, WorkspaceKind::Single);
    assert_eq!(workspace.packages[0].name, "fallback");
}

#[test_log::test]
fn malformed_pnpm_yaml_degrades_to_single_package() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pnpm-workspace.yaml", "packages: [unclosed");

    let workspace = WorkspaceResolver::new(dir.path()).resolve();
    assert_eq!(workspace.kind, WorkspaceKind::Single);
}

#[test_log::test]
fn empty_monorepo_degrades_to_single_package() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "package.json",
        r#"{"name": "root", "workspaces": ["packages/*"]}"#,
    );

    let workspace = WorkspaceResolver::new(dir.path()).resolve();

    assert_eq!(workspace.kind, WorkspaceKind::Single);
    assert_eq!(workspace.packages[0].name, "root");
    assert_eq!(workspace.packages[0].path, ".");
}

#[test]
fn package_without_name_uses_directory_name() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "package.json", r#"{"workspaces": ["packages/*"]}"#);
    write(dir.path(), "packages/nameless/package.json", r#"{"version": "25.01.1"}"#);

    let workspace = WorkspaceResolver::new(dir.path()).resolve();
    assert_eq!(workspace.packages[0].name, "nameless");
}

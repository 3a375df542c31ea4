use std::{borrow::Cow, path::Path};

/// Normalizes a path by replacing backslashes with forward slashes and removing
/// all "./" sequences. Uses Cow to avoid allocation when path is already
/// normalized.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path.contains('\\') || path.contains("./") {
        Cow::Owned(path.replace("\\", "/").replace("./", ""))
    } else {
        Cow::Borrowed(path)
    }
}

/// Repo-relative, forward-slash form of `path`. Returns "." for the root
/// itself.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let display = relative.display().to_string();
    let normalized = normalize_path(&display);
    let trimmed = normalized.trim_end_matches('/');

    if trimmed.is_empty() {
        ".".into()
    } else {
        trimmed.to_string()
    }
}

/// Whether `file` lives under the directory `dir`, comparing whole path
/// components. "." contains everything.
pub fn is_within(dir: &str, file: &str) -> bool {
    let dir = normalize_path(dir);
    let dir = dir.trim_end_matches('/');

    if dir.is_empty() || dir == "." {
        return true;
    }

    Path::new(normalize_path(file).as_ref()).starts_with(dir)
}

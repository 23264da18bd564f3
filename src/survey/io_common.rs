use std::path::{Path, PathBuf};

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Resolves a path of the configuration against the directory of the configuration file.
/// Absolute paths are kept as they are.
pub fn resolve_path(root: &Path, path: &str) -> String {
    let p: PathBuf = root.join(path);
    p.as_path().display().to_string()
}

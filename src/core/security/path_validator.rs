//! Plugin file name validation.
//!
//! Uploaded plugin names must be a single plain file name, and the resolved
//! path must stay inside the plugin directory. Symlinks are refused unless
//! the configuration allows them, and even then must point inside it.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Errors that can occur during plugin path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Invalid file name '{name}'")]
    InvalidFileName { name: String },

    #[error("Path '{path}' is outside plugin directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' is not allowed")]
    SymlinkNotAllowed { path: PathBuf },

    #[error("Symlink '{path}' points outside plugin directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Validate a client-supplied file name.
///
/// The name must be a single normal path component: no separators, no `.`
/// or `..`, no drive prefix and no leading dot.
pub fn validate_file_name(name: &str) -> Result<&str, PathSecurityError> {
    let invalid = || PathSecurityError::InvalidFileName {
        name: name.to_string(),
    };

    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(invalid()),
    }
}

/// Resolve a file name inside the plugin directory.
///
/// The file does not need to exist, which lets uploads resolve their
/// destination before writing. When it does exist and is a symlink, it is
/// rejected unless `allow_symlinks` is set, and even then its target must
/// stay inside `root`.
///
/// # Examples
///
/// ```rust,ignore
/// let path = resolve_plugin_path(Path::new("plugins"), "network.toml", false)?;
/// ```
pub fn resolve_plugin_path(
    root: &Path,
    file_name: &str,
    allow_symlinks: bool,
) -> Result<PathBuf, PathSecurityError> {
    let file_name = validate_file_name(file_name)?;

    let canonical_root = root.canonicalize().map_err(|e| PathSecurityError::IoError {
        path: root.to_path_buf(),
        error: e,
    })?;

    let path = canonical_root.join(file_name);

    if path.is_symlink() {
        if !allow_symlinks {
            return Err(PathSecurityError::SymlinkNotAllowed { path });
        }

        let target = path
            .canonicalize()
            .map_err(|_| PathSecurityError::SymlinkOutsideRoot { path: path.clone() })?;
        if !is_within_root(&target, &canonical_root) {
            return Err(PathSecurityError::SymlinkOutsideRoot { path });
        }
    }

    if !is_within_root(&path, &canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path,
            root: canonical_root,
        });
    }

    Ok(path)
}

/// Checks if a path is within (or equal to) a root directory
pub fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("network.toml").is_ok());
        assert!(validate_file_name("my plugin.toml").is_ok());

        for bad in ["", ".", "..", "../x.toml", "a/b.toml", "a\\b.toml", ".hidden.toml"] {
            assert!(
                matches!(
                    validate_file_name(bad),
                    Err(PathSecurityError::InvalidFileName { .. })
                ),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_new_file_within_root() {
        let temp_dir = TempDir::new().unwrap();

        let path = resolve_plugin_path(temp_dir.path(), "text.toml", false).unwrap();
        assert!(path.starts_with(temp_dir.path().canonicalize().unwrap()));
        assert!(path.ends_with("text.toml"));
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();

        let result = resolve_plugin_path(temp_dir.path(), "../escape.toml", false);
        assert!(matches!(
            result,
            Err(PathSecurityError::InvalidFileName { .. })
        ));
    }

    #[test]
    fn test_resolve_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let result = resolve_plugin_path(&missing, "a.toml", false);
        assert!(matches!(result, Err(PathSecurityError::IoError { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_rejected_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.toml");
        fs::write(&target, "[plugin]").unwrap();
        std::os::unix::fs::symlink(&target, temp_dir.path().join("link.toml")).unwrap();

        let result = resolve_plugin_path(temp_dir.path(), "link.toml", false);
        assert!(matches!(
            result,
            Err(PathSecurityError::SymlinkNotAllowed { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_within_root_allowed() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.toml");
        fs::write(&target, "[plugin]").unwrap();
        std::os::unix::fs::symlink(&target, temp_dir.path().join("link.toml")).unwrap();

        let path = resolve_plugin_path(temp_dir.path(), "link.toml", true).unwrap();
        assert!(path.ends_with("link.toml"));
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_outside_root_rejected() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("secret.toml");
        fs::write(&target, "[plugin]").unwrap();
        std::os::unix::fs::symlink(&target, root.path().join("link.toml")).unwrap();

        let result = resolve_plugin_path(root.path(), "link.toml", true);
        assert!(matches!(
            result,
            Err(PathSecurityError::SymlinkOutsideRoot { .. })
        ));
    }
}

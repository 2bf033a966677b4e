//! Shell-like path expansion for paths taken from the configuration file.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the home directory.
///
/// Absolute and relative paths are returned unchanged; blank input yields an
/// empty path.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();
    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Like [`expand`], then resolves a relative result against `base_dir`.
///
/// Used for configuration paths, which are relative to the file they appear
/// in.
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);
    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_blank_is_empty() {
        assert_eq!(expand(""), PathBuf::new());
        assert_eq!(expand("   "), PathBuf::new());
    }

    #[test]
    fn test_expand_leaves_plain_paths_alone() {
        assert_eq!(expand("/srv/wallpapers"), PathBuf::from("/srv/wallpapers"));
        assert_eq!(expand("wallpapers/cache"), PathBuf::from("wallpapers/cache"));
    }

    #[test]
    fn test_expand_tilde() {
        let result = expand("~/Pictures/albumwall");
        assert!(!result.to_string_lossy().starts_with('~'));
        assert!(result.ends_with("Pictures/albumwall"));
    }

    #[test]
    fn test_expand_and_resolve_relative() {
        let base = PathBuf::from("/home/me/.config/albumwall");
        assert_eq!(
            expand_and_resolve(" images ", &base),
            PathBuf::from("/home/me/.config/albumwall/images")
        );
    }

    #[test]
    fn test_expand_and_resolve_keeps_absolute_and_home_paths() {
        let base = PathBuf::from("/base");
        assert_eq!(expand_and_resolve("/abs/dir", &base), PathBuf::from("/abs/dir"));

        let home = expand_and_resolve("~/dir", &base);
        assert!(!home.starts_with("/base"));
        assert!(home.ends_with("dir"));
    }

    #[test]
    fn test_expand_and_resolve_blank_stays_empty() {
        assert_eq!(expand_and_resolve("", Path::new("/base")), PathBuf::new());
    }
}

//! Path utilities for tilde expansion and display shortening.

use std::path::{Path, PathBuf};

/// Expand tilde (~) in a path to the user's home directory.
///
/// # Examples
/// - `~/Documents` -> `/home/user/Documents`
/// - `~` -> `/home/user`
/// - `/absolute/path` -> `/absolute/path` (unchanged)
/// - `relative/path` -> `relative/path` (unchanged)
///
/// If the home directory cannot be determined, the path is returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(suffix) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            home.join(suffix.trim_start_matches('/'))
        } else {
            PathBuf::from(path)
        }
    } else {
        PathBuf::from(path)
    }
}

/// Replace a leading `home` with `~`. Without a home directory, or when home
/// is the filesystem root, the path is shown as-is.
pub fn contract_tilde(path: &Path, home: Option<&Path>) -> String {
    let home = home.filter(|h| h.parent().is_some());
    match home.and_then(|h| path.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

/// Split a path into a directory prefix (with trailing slash, home
/// shortened) and its final component, for the title bar.
///
/// - `/home/u/src/main.rs` -> `("~/src/", "main.rs")`
/// - `/etc` -> `("/", "etc")`
/// - `/` -> `("", "/")`
pub fn split_for_display(path: &Path, home: Option<&Path>) -> (String, String) {
    let Some(name) = path.file_name() else {
        return (String::new(), path.display().to_string());
    };
    let base = name.to_string_lossy().into_owned();

    let dir = match path.parent() {
        Some(parent) => contract_tilde(parent, home),
        None => return (String::new(), base),
    };

    if dir.is_empty() {
        (String::new(), base)
    } else if dir.ends_with('/') {
        (dir, base)
    } else {
        (format!("{}/", dir), base)
    }
}

/// [`split_for_display`] using the current user's home directory
pub fn display_parts(path: &Path) -> (String, String) {
    let home = dirs::home_dir();
    split_for_display(path, home.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_with_path() {
        let result = expand_tilde("~/Documents/test.txt");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(result, home.join("Documents/test.txt"));
        }
    }

    #[test]
    fn test_expand_tilde_unchanged() {
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
        assert_eq!(expand_tilde("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn test_contract_tilde() {
        let home = Path::new("/home/u");
        assert_eq!(contract_tilde(Path::new("/home/u"), Some(home)), "~");
        assert_eq!(contract_tilde(Path::new("/home/u/src"), Some(home)), "~/src");
        // Only whole components match
        assert_eq!(
            contract_tilde(Path::new("/home/user2/x"), Some(home)),
            "/home/user2/x"
        );
        assert_eq!(contract_tilde(Path::new("/home/u/src"), None), "/home/u/src");
    }

    #[test]
    fn test_root_home_is_not_contracted() {
        let root = Some(Path::new("/"));
        assert_eq!(contract_tilde(Path::new("/etc"), root), "/etc");
        assert_eq!(contract_tilde(Path::new("/"), root), "/");
        assert_eq!(
            split_for_display(Path::new("/etc/hosts"), root),
            ("/etc/".to_string(), "hosts".to_string())
        );
        assert_eq!(
            split_for_display(Path::new("/etc"), root),
            ("/".to_string(), "etc".to_string())
        );
    }

    #[test]
    fn test_split_for_display() {
        let home = Some(Path::new("/home/u"));
        assert_eq!(
            split_for_display(Path::new("/home/u/src/main.rs"), home),
            ("~/src/".to_string(), "main.rs".to_string())
        );
        assert_eq!(
            split_for_display(Path::new("/home/u/notes"), home),
            ("~/".to_string(), "notes".to_string())
        );
        assert_eq!(
            split_for_display(Path::new("/etc"), home),
            ("/".to_string(), "etc".to_string())
        );
        assert_eq!(
            split_for_display(Path::new("/"), home),
            (String::new(), "/".to_string())
        );
        assert_eq!(
            split_for_display(Path::new("/var/log/syslog"), None),
            ("/var/log/".to_string(), "syslog".to_string())
        );
    }
}

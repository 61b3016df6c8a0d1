//! Handing files to external programs
//!
//! The editor runs in the foreground and owns the terminal until it exits;
//! the platform opener is detached.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Split an editor command such as `code --wait` into program and arguments
pub fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Run `editor` on `path` and wait for it to exit.
///
/// The caller is responsible for giving the terminal back first.
pub fn run_editor(editor: &str, path: &Path) -> io::Result<ExitStatus> {
    let (program, args) = split_command(editor).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "empty editor command")
    })?;

    tracing::info!("Launching editor {:?} on {:?}", editor, path);
    let status = Command::new(program).args(args).arg(path).status()?;
    if !status.success() {
        tracing::warn!("Editor {:?} exited with {}", editor, status);
    }
    Ok(status)
}

/// Open `path` with the platform's default handler without waiting
pub fn open_detached(path: &Path) {
    tracing::info!("Opening {:?}", path);
    if let Err(e) = open::that_detached(path) {
        tracing::warn!("Failed to open {:?}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("vim"), Some(("vim", vec![])));
        assert_eq!(
            split_command("  code --wait  -n "),
            Some(("code", vec!["--wait", "-n"]))
        );
        assert_eq!(split_command("   "), None);
    }

    #[test]
    fn test_run_editor_rejects_empty_command() {
        let err = run_editor("", Path::new("/tmp/x")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_editor_waits_for_exit() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("file.txt");
        std::fs::write(&path, "x").unwrap();

        assert!(run_editor("true", &path).unwrap().success());
        assert!(!run_editor("false", &path).unwrap().success());
    }

    #[test]
    fn test_run_editor_missing_program() {
        assert!(run_editor("term-finder-no-such-editor", Path::new("x")).is_err());
    }
}

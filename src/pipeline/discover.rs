//! Locate album pages, conversation folders, and message pages.

use std::path::{Path, PathBuf};

use crate::error::{RescueError, Result};

/// Page every conversation folder must contain.
pub const FIRST_MESSAGE_PAGE: &str = "messages0.html";

const MESSAGE_PAGE_PREFIX: &str = "messages";
const PAGE_SUFFIX: &str = ".html";

/// Fail early if the archive root is missing or not a directory.
pub fn check_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(RescueError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(RescueError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// All `*.html` files directly under `root`, in name order.
pub fn album_pages(root: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<PathBuf> = list_dir(root)?
        .into_iter()
        .filter(|p| p.is_file() && has_name(p, |name| name.ends_with(PAGE_SUFFIX)))
        .collect();
    pages.sort();
    Ok(pages)
}

/// All subdirectories of `root`, in name order.
pub fn chat_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = list_dir(root)?.into_iter().filter(|p| p.is_dir()).collect();
    dirs.sort();
    Ok(dirs)
}

/// All `messagesN.html` files in a conversation folder, by page index.
pub fn message_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<(u64, PathBuf)> = list_dir(dir)?
        .into_iter()
        .filter(|p| p.is_file())
        .filter_map(|p| {
            let index = p.file_name()?.to_str().and_then(message_page_index)?;
            Some((index, p))
        })
        .collect();
    pages.sort();
    Ok(pages.into_iter().map(|(_, p)| p).collect())
}

/// `"messages50.html"` -> `Some(50)`.
pub fn message_page_index(file_name: &str) -> Option<u64> {
    let digits = file_name
        .strip_prefix(MESSAGE_PAGE_PREFIX)?
        .strip_suffix(PAGE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| RescueError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RescueError::io(dir, e))?;
        paths.push(entry.path());
    }
    Ok(paths)
}

fn has_name(path: &Path, pred: impl Fn(&str) -> bool) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(pred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_message_page_index() {
        assert_eq!(message_page_index("messages0.html"), Some(0));
        assert_eq!(message_page_index("messages150.html"), Some(150));
        assert_eq!(message_page_index("messages.html"), None);
        assert_eq!(message_page_index("messages-1.html"), None);
        assert_eq!(message_page_index("messages1.htm"), None);
        assert_eq!(message_page_index("index.html"), None);
    }

    #[test]
    fn test_message_pages_sorted_numerically() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["messages100.html", "messages0.html", "messages50.html", "notes.html"] {
            touch(&tmp.path().join(name));
        }
        let names: Vec<String> = message_pages(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["messages0.html", "messages50.html", "messages100.html"]);
    }

    #[test]
    fn test_album_pages_and_chat_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("b.html"));
        touch(&tmp.path().join("a.html"));
        touch(&tmp.path().join("style.css"));
        std::fs::create_dir(tmp.path().join("2000001")).unwrap();

        let pages = album_pages(tmp.path()).unwrap();
        assert_eq!(pages, [tmp.path().join("a.html"), tmp.path().join("b.html")]);

        let dirs = chat_dirs(tmp.path()).unwrap();
        assert_eq!(dirs, [tmp.path().join("2000001")]);
    }

    #[test]
    fn test_check_root() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(check_root(tmp.path()).is_ok());
        assert!(matches!(
            check_root(&tmp.path().join("missing")),
            Err(RescueError::RootNotFound(_))
        ));
        let file = tmp.path().join("file.html");
        touch(&file);
        assert!(matches!(check_root(&file), Err(RescueError::NotADirectory(_))));
    }
}

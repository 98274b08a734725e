//! Input folder discovery
//!
//! Every image under the root is grouped by its immediate parent directory.
//! Folders come out sorted by path, files sorted by name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::types::{BatchError, FolderBatchItem, Result, IMAGE_EXTENSIONS};

/// Whether `path` has a supported image extension
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Scan `root` recursively and build one pending item per image folder.
///
/// Symlinks are not followed, so a link back to an ancestor cannot repeat a
/// folder. Unreadable entries are logged and skipped.
pub fn discover_folders(root: &Path) -> Result<Vec<FolderBatchItem>> {
    if !root.is_dir() {
        return Err(BatchError::InputNotFound(root.to_path_buf()));
    }

    let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_image_file(entry.path()) {
            continue;
        }
        if let Some(parent) = entry.path().parent() {
            groups
                .entry(parent.to_path_buf())
                .or_default()
                .push(entry.into_path());
        }
    }

    Ok(groups
        .into_iter()
        .map(|(dir, mut files)| {
            files.sort();
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.display().to_string());
            debug!(folder = %name, files = files.len(), "Discovered folder");
            FolderBatchItem::new(name, dir, files)
        })
        .collect())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a.PNG")));
        assert!(is_image_file(Path::new("dir/b.jpeg")));
        assert!(is_image_file(Path::new("c.webp")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("noext")));
    }

    #[test]
    fn test_groups_by_parent_sorted() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b_folder")).unwrap();
        fs::create_dir_all(root.join("a_folder/nested")).unwrap();
        fs::write(root.join("b_folder/2.png"), b"").unwrap();
        fs::write(root.join("b_folder/1.jpg"), b"").unwrap();
        fs::write(root.join("b_folder/readme.txt"), b"").unwrap();
        fs::write(root.join("a_folder/x.png"), b"").unwrap();
        fs::write(root.join("a_folder/nested/y.png"), b"").unwrap();
        fs::write(root.join("a_folder/.hidden.png"), b"").unwrap();

        let items = discover_folders(root).unwrap();
        let names: Vec<_> = items.iter().map(|i| i.folder.as_str()).collect();
        assert_eq!(names, vec!["a_folder", "nested", "b_folder"]);

        let b = &items[2];
        let files: Vec<_> = b
            .files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, vec!["1.jpg", "2.png"]);
        assert_eq!(items[0].files.len(), 1);
    }

    #[test]
    fn test_images_at_root_form_a_folder() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("solo.png"), b"").unwrap();
        let items = discover_folders(dir.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].files.len(), 1);
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(
            discover_folders(Path::new("/nonexistent/input")),
            Err(BatchError::InputNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_not_followed() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("look")).unwrap();
        fs::write(root.join("look/a.png"), b"").unwrap();
        std::os::unix::fs::symlink(root, root.join("look/loop")).unwrap();
        std::os::unix::fs::symlink(root.join("look/a.png"), root.join("look/alias.png"))
            .unwrap();

        let items = discover_folders(root).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].folder, "look");
        assert_eq!(items[0].files, vec![root.join("look/a.png")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdir_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("ok")).unwrap();
        fs::create_dir_all(root.join("locked")).unwrap();
        fs::write(root.join("ok/a.png"), b"").unwrap();
        fs::write(root.join("locked/b.png"), b"").unwrap();
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000)).unwrap();

        let result = discover_folders(root);
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();

        let items = result.unwrap();
        assert!(items.iter().any(|i| i.folder == "ok"));
    }

    #[test]
    fn test_empty_root() {
        let dir = tempdir().unwrap();
        assert!(discover_folders(dir.path()).unwrap().is_empty());
    }
}

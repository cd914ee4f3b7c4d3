/*
File: odm-aio/src/fs.rs
Purpose: Primitive synchronous filesystem operations.
*/
use std::{
    fs::{self, Permissions},
    io::{self, Write},
    path::Path,
};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

use odm_common::error::{OdmError, Result};
use odm_common::model::ListingEntry;
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

/// Directories are created owner-rwx, group/other-rx.
pub const DIR_MODE: u32 = 0o755;
/// Materialized files are owner-rw, group/other-r.
pub const FILE_MODE: u32 = 0o644;

/// Checks if a path exists (resolving symlinks).
pub fn check_path_exists(path: &Path) -> bool {
    path.exists()
}

/// Checks if a path points to a directory (resolving symlinks).
pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

/// Checks if a path points to a regular file (resolving symlinks).
pub fn is_file(path: &Path) -> bool {
    path.is_file()
}

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    debug!("Creating directory recursively: {}", path.display());
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        OdmError::storage(path, format!("cannot create directory: {e}"))
    })
}

/// Reads the entire contents of a file into a byte vector.
pub fn read_to_bytes(path: &Path) -> Result<Vec<u8>> {
    debug!("Reading file to bytes: {}", path.display());
    fs::read(path).map_err(|e| {
        error!("Failed read file {}: {}", path.display(), e);
        OdmError::from(e)
    })
}

/// Sets file permissions (Unix only). Mode is standard Unix octal mode.
#[cfg(unix)]
pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    debug!("Setting permissions on {}: {:o}", path.display(), mode);
    fs::set_permissions(path, Permissions::from_mode(mode)).map_err(|e| {
        error!("Failed set permissions on {}: {}", path.display(), e);
        OdmError::from(e)
    })
}

#[cfg(not(unix))]
pub fn set_permissions(path: &Path, _mode: u32) -> Result<()> {
    warn!(
        "Setting permissions not fully supported on this platform: {}",
        path.display()
    );
    Ok(())
}

/// Writes `content` to a hidden temporary file next to `final_path`.
/// Nothing is visible at `final_path` until [`persist_temp_file`] runs; a
/// dropped temp file is removed.
pub fn write_temp_file(final_path: &Path, content: &[u8]) -> Result<NamedTempFile> {
    let dir = final_path.parent().ok_or_else(|| {
        OdmError::storage(final_path, "cannot get parent directory")
    })?;
    create_dir_all(dir)?;

    let prefix = format!(
        ".{}.",
        final_path.file_name().unwrap_or_default().to_string_lossy()
    );
    let mut temp_file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| OdmError::storage(dir, format!("cannot create temporary file: {e}")))?;

    debug!(
        "Writing {} bytes for {} via temp file {}",
        content.len(),
        final_path.display(),
        temp_file.path().display()
    );

    let write = |f: &mut NamedTempFile| -> io::Result<()> {
        f.write_all(content)?;
        f.flush()?;
        f.as_file().sync_all()
    };
    write(&mut temp_file).map_err(|e| {
        error!("Failed writing temp file {}: {}", temp_file.path().display(), e);
        OdmError::storage(final_path, format!("cannot write file: {e}"))
    })?;
    Ok(temp_file)
}

/// Atomically moves a temp file over `final_path` and applies [`FILE_MODE`].
pub fn persist_temp_file(temp_file: NamedTempFile, final_path: &Path) -> Result<()> {
    let temp_path = temp_file.path().to_path_buf();
    temp_file.persist(final_path).map_err(|e| {
        error!(
            "Failed to persist temporary file {} over {}: {}",
            temp_path.display(),
            final_path.display(),
            e.error
        );
        OdmError::storage(final_path, format!("cannot write file: {}", e.error))
    })?;

    if let Err(e) = set_permissions(final_path, FILE_MODE) {
        warn!(
            "Failed to set default permissions on new file {}: {}",
            final_path.display(),
            e
        );
    }
    Ok(())
}

/// Atomically writes data to a file using a temporary file.
pub fn atomic_write_file(final_path: &Path, content: &[u8]) -> Result<()> {
    let temp_file = write_temp_file(final_path, content)?;
    persist_temp_file(temp_file, final_path)
}

/// Lists the direct children of a directory, classified by metadata.
/// Skips entries that cause errors during reading.
pub fn list_directory_entries(dir_path: &Path) -> Result<Vec<ListingEntry>> {
    debug!("Listing directory entries for: {}", dir_path.display());
    let read_dir = fs::read_dir(dir_path).map_err(|e| {
        error!("Failed to read directory {}: {}", dir_path.display(), e);
        OdmError::from(e)
    })?;

    let mut entries = Vec::new();
    for entry_res in read_dir {
        let entry = match entry_res {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error reading entry in {}: {}", dir_path.display(), e);
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        // file_type() does not follow symlinks; metadata() does
        match fs::metadata(entry.path()) {
            Ok(meta) => entries.push(ListingEntry {
                name,
                is_dir: meta.is_dir(),
            }),
            Err(e) => warn!(
                "Failed to get file type for {} in {}: {}",
                entry.path().display(),
                dir_path.display(),
                e
            ),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_all_is_a_no_op_when_present() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("Zend/Filter/Word");
        create_dir_all(&nested).unwrap();
        create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn directories_and_files_get_default_modes() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Zend");
        create_dir_all(&dir).unwrap();
        let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        // umask may only remove bits
        assert_eq!(mode & !DIR_MODE, 0);
        assert_ne!(mode & 0o700, 0);

        let file = dir.join("View.php");
        atomic_write_file(&file, b"x").unwrap();
        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, FILE_MODE);
    }

    #[test]
    fn dropped_temp_file_leaves_nothing_behind() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("Zend/View.php");
        let temp = write_temp_file(&target, b"<?php").unwrap();
        assert!(!target.exists());
        drop(temp);
        assert!(!target.exists());
        assert!(list_directory_entries(&root.path().join("Zend"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn atomic_write_replaces_existing_content() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("View.php");
        atomic_write_file(&target, b"old").unwrap();
        atomic_write_file(&target, b"new").unwrap();
        assert_eq!(read_to_bytes(&target).unwrap(), b"new");
    }

    #[test]
    fn lists_children_by_metadata() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("Helper")).unwrap();
        fs::write(root.path().join("Abstract.php"), b"").unwrap();
        let mut entries = list_directory_entries(root.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            entries,
            vec![ListingEntry::file("Abstract.php"), ListingEntry::dir("Helper")]
        );
    }

    #[test]
    fn listing_a_missing_directory_fails() {
        let root = tempfile::tempdir().unwrap();
        assert!(list_directory_entries(&root.path().join("nope")).is_err());
    }
}

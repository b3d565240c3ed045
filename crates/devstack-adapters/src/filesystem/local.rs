//! Local filesystem adapter using std::fs.
//!
//! Writes are all-or-nothing: content lands in a temporary file in the
//! target directory which is then renamed over the destination. A reader
//! (or an interrupted run) sees either the previous complete file or the
//! new complete file, never a truncated one.

use std::io;
use std::path::{Path, PathBuf};

use devstack_core::{
    application::ports::{FileMode, Filesystem},
    error::DevstackResult,
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }

    fn temp_path(path: &Path) -> PathBuf {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".into());
        path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> DevstackResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_atomic(&self, path: &Path, content: &str, mode: FileMode) -> DevstackResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| map_io_error(parent, e, "create parent directory"))?;
            }
        }

        let temp = Self::temp_path(path);
        std::fs::write(&temp, content).map_err(|e| map_io_error(&temp, e, "write file"))?;

        #[cfg(unix)]
        if mode == FileMode::Secret {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            if let Err(e) = std::fs::set_permissions(&temp, perms) {
                let _ = std::fs::remove_file(&temp);
                return Err(map_io_error(&temp, e, "set permissions"));
            }
        }
        #[cfg(not(unix))]
        let _ = mode;

        std::fs::rename(&temp, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            map_io_error(path, e, "rename into place")
        })
    }

    fn read_to_string(&self, path: &Path) -> DevstackResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn file_size(&self, path: &Path) -> DevstackResult<u64> {
        std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| map_io_error(path, e, "read metadata"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> devstack_core::error::DevstackError {
    use devstack_core::application::ApplicationError;

    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

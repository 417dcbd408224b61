//! Filesystem access needed by the downloads screen: existence checks and deletion.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::types::errors::DownloadsError;

/// The two filesystem operations the downloads screen performs.
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &str) -> bool;
    /// Removes the file at `path`. A file that is already gone is not an error.
    fn delete(&self, path: &str) -> Result<(), DownloadsError>;
}

/// [`FileSystem`] over `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn delete(&self, path: &str) -> Result<(), DownloadsError> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!(path, "deleted downloaded file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DownloadsError::FileSystem {
                path: path.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

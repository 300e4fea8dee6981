use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::{validate_key, BlobStore};
use crate::error::StorageError;

/// Filesystem-backed store rooted at a directory. Never presigns.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path an object key maps to.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl BlobStore for LocalBlobStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = self.path_for(key)?;
        let write_err = |source| StorageError::Write {
            key: key.to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&path, bytes).map_err(write_err)?;

        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    fn presign(&self, _key: &str, _ttl: Duration) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_put_creates_directories() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let locator = store.put("2024/04/payslip_E001.pdf", b"%PDF-1.7").unwrap();

        let stored = dir.path().join("2024/04/payslip_E001.pdf");
        assert_eq!(locator, stored.to_string_lossy());
        assert_eq!(fs::read(stored).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn test_put_overwrites() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        store.put("a.txt", b"one").unwrap();
        store.put("a.txt", b"two").unwrap();
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"two");
    }

    #[test]
    fn test_invalid_key_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        assert!(matches!(
            store.put("../escape.pdf", b"x"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_never_presigns() {
        let store = LocalBlobStore::new("data");
        assert_eq!(store.presign("a.pdf", Duration::from_secs(60)), None);
    }
}

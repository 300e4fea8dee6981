//! Blob storage for rendered and imported documents.

mod local;

pub use local::LocalBlobStore;

use std::time::Duration;

use crate::error::StorageError;

/// Key-addressed object storage.
pub trait BlobStore {
    /// Store `bytes` under `key`, returning a locator for the object.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Time-limited URL for `key`, if the backend supports one.
    fn presign(&self, key: &str, ttl: Duration) -> Option<String>;
}

/// Reject keys that are empty, absolute, or climb out of the root.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let escapes = key
        .split(['/', '\\'])
        .any(|segment| segment == "..");
    if key.trim().is_empty() || key.starts_with('/') || key.starts_with('\\') || escapes {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Key of a computed payslip artifact.
pub fn payslip_key(year: i32, month: u32, code: &str) -> String {
    format!("{}/{:02}/payslip_{}.pdf", year, month, code)
}

/// Key of an imported source document.
pub fn import_key(year: i32, month: u32, code: &str, extension: &str) -> String {
    format!("imports/{}/{:02}/{}.{}", year, month, code, extension)
}

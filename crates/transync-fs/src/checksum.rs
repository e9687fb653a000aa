//! SHA-256 fingerprint utilities
//!
//! Provides a single canonical fingerprint format (`sha256:<hex>`) used as the
//! backend half of a synchronization watermark.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of raw content.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(compute_checksum(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_has_prefix() {
        assert!(compute_checksum(b"hello world").starts_with("sha256:"));
    }

    #[test]
    fn different_content_different_checksum() {
        assert_ne!(compute_checksum(b"aaa"), compute_checksum(b"bbb"));
    }

    #[test]
    fn checksum_known_value() {
        assert_eq!(
            compute_checksum(b"hello world"),
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn file_checksum_matches_content_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.po");
        std::fs::write(&path, "msgid \"a\"\n").unwrap();

        assert_eq!(
            compute_file_checksum(&path).unwrap(),
            compute_checksum(b"msgid \"a\"\n")
        );
    }

    #[test]
    fn file_checksum_of_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = compute_file_checksum(&dir.path().join("missing.po")).unwrap_err();
        assert!(err.is_not_found());
    }
}

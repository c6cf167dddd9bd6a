use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

/// SHA-256 of the file's bytes, hex encoded.
pub fn content_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Content hashes of documents already filed during one run.
#[derive(Debug, Default)]
pub struct SeenHashes {
    hashes: HashSet<String>,
}

impl SeenHashes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    /// Record a hash; returns `false` if it was already present.
    pub fn insert(&mut self, hash: String) -> bool {
        self.hashes.insert(hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_bytes_hash_equal() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        std::fs::write(&a, b"%PDF-1.7 same bytes").unwrap();
        std::fs::write(&b, b"%PDF-1.7 same bytes").unwrap();
        assert_eq!(content_hash(&a).unwrap(), content_hash(&b).unwrap());
    }

    #[test]
    fn test_one_byte_difference() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        std::fs::write(&a, b"%PDF-1.7 bytes A").unwrap();
        std::fs::write(&b, b"%PDF-1.7 bytes B").unwrap();
        assert_ne!(content_hash(&a).unwrap(), content_hash(&b).unwrap());
    }

    #[test]
    fn test_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.pdf");
        std::fs::write(&empty, b"").unwrap();
        assert_eq!(
            content_hash(&empty).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(content_hash(Path::new("/nonexistent/x.pdf")).is_err());
    }

    #[test]
    fn test_seen_hashes() {
        let mut seen = SeenHashes::new();
        assert!(seen.is_empty());
        assert!(seen.insert("abc".into()));
        assert!(!seen.insert("abc".into()));
        assert!(seen.contains("abc"));
        assert!(!seen.contains("abd"));
        assert_eq!(seen.len(), 1);
    }
}

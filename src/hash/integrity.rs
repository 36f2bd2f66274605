//! File checksums using SHA-256 or BLAKE3
//!
//! The digest is computed in a single streaming pass over the file and
//! returned as a lowercase hex string.

use crate::config::HashAlgorithm;
use crate::error::{IoResultExt, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Read buffer used when hashing files
const HASH_BUFFER_SIZE: usize = 1024 * 1024;

/// Hash result as hex string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResult {
    /// The hash algorithm used
    pub algorithm: HashAlgorithm,
    /// Hash value as lowercase hex string
    pub hash: String,
    /// Number of bytes hashed
    pub size: u64,
}

impl HashResult {
    /// Create a new hash result
    pub fn new(algorithm: HashAlgorithm, hash: String, size: u64) -> Self {
        Self { algorithm, hash, size }
    }
}

impl std::fmt::Display for HashResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Unified hasher over the supported algorithms
pub enum Hasher {
    /// SHA-256
    Sha256(sha2::Sha256),
    /// BLAKE3
    Blake3(Box<blake3::Hasher>),
}

impl Hasher {
    /// Create a new hasher for the given algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => {
                use sha2::Digest;
                Self::Sha256(sha2::Sha256::new())
            }
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    /// Get the algorithm this hasher uses
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Sha256(_) => HashAlgorithm::Sha256,
            Self::Blake3(_) => HashAlgorithm::Blake3,
        }
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => {
                use sha2::Digest;
                h.update(data);
            }
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    /// Finalize and get the hash as hex string
    pub fn finalize(self) -> String {
        match self {
            Self::Sha256(h) => {
                use sha2::Digest;
                hex::encode(h.finalize())
            }
            Self::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

/// Compute the checksum of a file
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<HashResult> {
    hash_file_with_buffer(path, algorithm, HASH_BUFFER_SIZE)
}

/// Compute the checksum of a file with a custom buffer size
pub fn hash_file_with_buffer(
    path: &Path,
    algorithm: HashAlgorithm,
    buffer_size: usize,
) -> Result<HashResult> {
    let file = File::open(path).with_path(path)?;
    let mut reader = BufReader::with_capacity(buffer_size, file);
    let mut hasher = Hasher::new(algorithm);
    let mut buffer = vec![0u8; buffer_size];
    let mut size = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).with_path(path),
        };

        hasher.update(&buffer[..bytes_read]);
        size += bytes_read as u64;
    }

    Ok(HashResult::new(algorithm, hasher.finalize(), size))
}

/// Compute the checksum of data in memory
pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm) -> HashResult {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    HashResult::new(algorithm, hasher.finalize(), data.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const SHA256_ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn create_test_file(dir: &Path, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join("test.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_known_sha256_vectors() {
        assert_eq!(hash_bytes(b"", HashAlgorithm::Sha256).hash, SHA256_EMPTY);
        assert_eq!(hash_bytes(b"abc", HashAlgorithm::Sha256).hash, SHA256_ABC);
    }

    #[test]
    fn test_hash_file_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        let path = create_test_file(dir.path(), &content);

        for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            let first = hash_file(&path, algorithm).unwrap();
            let second = hash_file(&path, algorithm).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.size, content.len() as u64);
            assert_eq!(first.hash.len(), algorithm.output_size() * 2);
            assert_eq!(first.hash, first.hash.to_lowercase());
        }
    }

    #[test]
    fn test_hash_file_matches_memory() {
        let dir = TempDir::new().unwrap();
        let content = b"Test file content for hashing";
        let path = create_test_file(dir.path(), content);

        // Small buffer forces several reads
        let file_hash = hash_file_with_buffer(&path, HashAlgorithm::Blake3, 7).unwrap();
        let memory_hash = hash_bytes(content, HashAlgorithm::Blake3);
        assert_eq!(file_hash.hash, memory_hash.hash);
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), b"");
        let result = hash_file(&path, HashAlgorithm::Sha256).unwrap();
        assert_eq!(result.hash, SHA256_EMPTY);
        assert_eq!(result.size, 0);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.bin");
        let err = hash_file(&missing, HashAlgorithm::Sha256).unwrap_err();
        assert_eq!(err.path(), Some(&missing));
    }
}

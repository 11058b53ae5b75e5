//! Content hashing using blake3.
//!
//! Used to tell whether a sync changed the destination and whether an
//! existing destination still matches the toolchain's glue file.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Convert to hex string.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 16 hex chars are enough to tell versions apart in logs
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Hash an in-memory buffer.
#[inline]
pub fn hash_bytes(data: &[u8]) -> ContentHash {
    ContentHash::new(*blake3::hash(data).as_bytes())
}

/// Compute blake3 hash of file contents.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn compute_file_hash(path: &Path) -> io::Result<Option<ContentHash>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut reader = BufReader::with_capacity(64 * 1024, file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(Some(ContentHash::new(*hasher.finalize().as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_content_hash_display() {
        let hash = ContentHash::new([0xab; 32]);
        assert_eq!(format!("{}", hash), "abababababababab");
        assert_eq!(hash.to_hex().len(), 64);
    }

    #[test]
    fn test_file_hash_matches_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wasm_exec.js");
        fs::write(&path, "console.log('glue')").unwrap();

        let from_file = compute_file_hash(&path).unwrap().unwrap();
        assert_eq!(from_file, hash_bytes(b"console.log('glue')"));

        fs::write(&path, "console.log('other')").unwrap();
        assert_ne!(compute_file_hash(&path).unwrap().unwrap(), from_file);
    }

    #[test]
    fn test_file_hash_nonexistent() {
        let hash = compute_file_hash(Path::new("/nonexistent/wasm_exec.js")).unwrap();
        assert!(hash.is_none());
    }
}

//! Freshness detection: blake3 content hashes of source and destination.

mod hash;

pub use hash::{ContentHash, compute_file_hash, hash_bytes};

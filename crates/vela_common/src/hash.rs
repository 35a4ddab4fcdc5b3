//! Content hashing for fingerprinting designs and output traces.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::Xxh3;

use crate::bits::Bits;

/// A 128-bit XXH3 content hash.
///
/// Two output traces with the same `ContentHash` are assumed identical,
/// which lets determinism checks compare long runs without keeping every
/// sample around.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Incremental hasher over a sequence of sampled signal values.
///
/// Each sample folds in both width and value, so a trace that changes a
/// signal's width hashes differently from one that only changes values.
pub struct TraceHasher {
    state: Xxh3,
    samples: u64,
}

impl TraceHasher {
    /// Creates an empty trace hasher.
    pub fn new() -> Self {
        Self {
            state: Xxh3::new(),
            samples: 0,
        }
    }

    /// Folds one sampled value into the trace.
    pub fn record(&mut self, value: &Bits) {
        self.state.update(&value.width().to_le_bytes());
        self.state.update(&value.as_u64().to_le_bytes());
        self.samples += 1;
    }

    /// Returns the number of samples recorded so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Returns the hash of everything recorded so far.
    pub fn finish(&self) -> ContentHash {
        ContentHash(self.state.digest128().to_le_bytes())
    }
}

impl Default for TraceHasher {
    fn default() -> Self {
        Self::new()
    }
}

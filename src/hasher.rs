//! Incremental SHA-1 wrapper with snapshot-and-resume semantics.
//!
//! The resumable search depends on one property of the underlying
//! hasher: feeding bytes incrementally yields the same digest as feeding
//! them at once. The RustCrypto implementation buffers partial internal
//! blocks, so `update` may be called with arbitrary lengths, and cloning
//! the state captures a midstate that can be finalized or extended later
//! without disturbing the original.

use sha1::{Digest as _, Sha1};

/// Length of a SHA-1 digest in bytes.
pub const DIGEST_LEN: usize = 20;

/// A finalized SHA-1 digest.
pub type Digest = [u8; DIGEST_LEN];

/// Stateful digest engine. `Clone` is the snapshot operation.
#[derive(Clone, Default)]
pub struct PieceHasher {
    inner: Sha1,
}

impl PieceHasher {
    pub fn new() -> Self {
        Self { inner: Sha1::new() }
    }

    /// Absorb bytes of arbitrary length, buffering any partial block.
    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Finalize a copy of the current state and return the digest.
    ///
    /// The stored state is untouched, so a snapshot held in the midstate
    /// table can be finalized any number of times by any number of
    /// workers.
    pub fn finalize_copy(&self) -> Digest {
        self.inner.clone().finalize().into()
    }
}

/// One-shot digest of a byte slice.
pub fn digest_of(bytes: &[u8]) -> Digest {
    Sha1::digest(bytes).into()
}

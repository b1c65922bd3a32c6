//! Midstate table: hasher snapshots at fixed chunk boundaries.
//!
//! Built once per search in a single sequential pass, then shared
//! read-only by every worker. Snapshot `k` covers exactly the first
//! `k * CHUNK_SIZE` bytes of the piece. A piece whose length is not a
//! multiple of the chunk size gets no snapshot inside the partial tail;
//! the verifier hashes the true remaining byte count from the last full
//! boundary instead.

use crate::error::BitrotError;
use crate::hasher::PieceHasher;
use crate::CHUNK_SIZE;

pub struct MidstateTable {
    states: Vec<PieceHasher>,
    chunk_size: usize,
}

impl MidstateTable {
    /// Walk the piece once, snapshotting after every full chunk.
    ///
    /// Cost is O(piece), paid once and amortized across the millions of
    /// candidate flips that resume from these snapshots.
    pub fn build(piece: &[u8]) -> Self {
        Self::build_with_chunk_size(piece, CHUNK_SIZE)
    }

    pub(crate) fn build_with_chunk_size(piece: &[u8], chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be nonzero");
        let full_chunks = piece.len() / chunk_size;
        let mut states = Vec::with_capacity(full_chunks + 1);

        let mut hasher = PieceHasher::new();
        states.push(hasher.clone());
        for k in 0..full_chunks {
            hasher.update(&piece[k * chunk_size..(k + 1) * chunk_size]);
            states.push(hasher.clone());
        }

        Self { states, chunk_size }
    }

    /// Snapshot count, always `full_chunks + 1`.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Resume point for a candidate at `byte_offset`: a clone of the last
    /// snapshot whose coverage strictly precedes the flipped byte, plus
    /// the number of piece bytes that snapshot already covers.
    ///
    /// Resuming from any later snapshot would bake the unflipped byte
    /// into the prefix, so the chunk containing the flip is always
    /// re-hashed.
    pub fn resume_for(&self, byte_offset: usize) -> (PieceHasher, usize) {
        let chunk_index = byte_offset / self.chunk_size;
        let state = self.states[chunk_index].clone();
        (state, chunk_index * self.chunk_size)
    }

    /// Cross-check the table against the piece it claims to describe.
    /// A mismatch is an internal invariant violation, not bad input.
    pub fn check_coverage(&self, piece_len: usize) -> Result<(), BitrotError> {
        let expected = piece_len / self.chunk_size + 1;
        if self.states.len() != expected {
            return Err(BitrotError::Internal(format!(
                "midstate table has {} entries, piece of {} bytes needs {}",
                self.states.len(),
                piece_len,
                expected
            )));
        }
        Ok(())
    }
}

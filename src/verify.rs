//! Per-candidate verification: resume, flip, finalize, compare.

use crate::hasher::Digest;
use crate::midstate::MidstateTable;

/// Flip a single bit in place. Involutive: applying the same index twice
/// restores the original buffer.
///
/// # Panics
/// Panics if `bit_index` lies outside the buffer.
pub fn flip_bit(bytes: &mut [u8], bit_index: u64) {
    let byte_offset = (bit_index / 8) as usize;
    let mask = 1u8 << (bit_index % 8);
    bytes[byte_offset] ^= mask;
}

/// Read-only view of everything a worker needs to test candidates.
///
/// All borrowed data is shared across workers untouched; the only writes
/// a verification performs are to the caller-owned scratch buffer.
pub struct Verifier<'a> {
    piece: &'a [u8],
    midstates: &'a MidstateTable,
    target: &'a Digest,
}

impl<'a> Verifier<'a> {
    pub fn new(piece: &'a [u8], midstates: &'a MidstateTable, target: &'a Digest) -> Self {
        Self {
            piece,
            midstates,
            target,
        }
    }

    /// Test whether flipping `bit_index` makes the piece hash to the
    /// target digest.
    ///
    /// The flip happens in `scratch`, a local copy of the suffix after
    /// the resume point; the shared piece buffer is never written. The
    /// resume point is the last midstate not covering the flipped byte,
    /// so only the candidate's own chunk and everything after it is
    /// re-hashed.
    pub fn matches(&self, bit_index: u64, scratch: &mut Vec<u8>) -> bool {
        let byte_offset = (bit_index / 8) as usize;
        debug_assert!(byte_offset < self.piece.len());

        let (mut state, covered) = self.midstates.resume_for(byte_offset);

        scratch.clear();
        scratch.extend_from_slice(&self.piece[covered..]);
        flip_bit(scratch, bit_index - (covered as u64) * 8);

        state.update(scratch);
        state.finalize_copy() == *self.target
    }
}

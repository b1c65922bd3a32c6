//! Core logic for the bitrot single-bit corruption locator.
//!
//! A "piece" is a block of content-addressed data whose pre-corruption
//! SHA-1 digest is known. When the stored piece no longer hashes to that
//! digest, this crate brute-forces every possible single-bit flip and
//! reports which one restores the expected digest.
//!
//! The search is made tractable by a midstate table: the hasher state is
//! snapshotted every [`CHUNK_SIZE`] bytes, so each candidate flip only
//! re-hashes the suffix after its chunk boundary instead of the whole
//! piece. Candidates are fanned out across worker threads; the only
//! shared mutable state is a single atomic result cell.

pub mod error;
pub mod hasher;
pub mod io_utils;
pub mod midstate;
pub mod search;
pub mod verify;

pub use error::BitrotError;
pub use hasher::{digest_of, Digest, PieceHasher, DIGEST_LEN};
pub use midstate::MidstateTable;
pub use search::{locate_bit_flip, locate_bit_flip_with, SearchOptions, SearchOutcome};
pub use verify::{flip_bit, Verifier};

/// Spacing of midstate snapshots in bytes. Equal to the SHA-1 internal
/// block size, so every snapshot sits on a compression-function boundary
/// and resuming never replays a partial block.
pub const CHUNK_SIZE: usize = 64;

/// Number of candidate bit indices handed to a worker per batch.
pub const BATCH_SIZE: u64 = 4096;

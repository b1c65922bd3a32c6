//! Search dispatcher and result aggregator.
//!
//! The candidate space `[0, piece_len * 8)` is partitioned into
//! fixed-size batches. Worker threads pull batch numbers from a shared
//! atomic cursor until the space is exhausted, verify every candidate in
//! each batch, and claim any match in the shared result cell. The search
//! is exhaustive by design: there is no early exit and no cancellation,
//! so the outcome is deterministic and total latency is bounded by the
//! slowest worker, never by where the flip happens to sit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crate::error::BitrotError;
use crate::hasher::{Digest, DIGEST_LEN};
use crate::midstate::MidstateTable;
use crate::verify::Verifier;
use crate::BATCH_SIZE;

/// Sentinel stored in the result cell while no match has been claimed.
/// Never a valid candidate index and never exposed to callers, who see
/// [`SearchOutcome`] instead.
const NOT_FOUND: u64 = u64::MAX;

/// Outcome of a completed (error-free) search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Absolute index of the bit whose flip reproduces the target digest.
    Found(u64),
    /// Every candidate was tested; none reproduced the target digest.
    NotFound,
}

/// Progress callback: `(candidates_done, candidates_total)`. Called by
/// workers after each finished batch.
pub type ProgressFn<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Tuning knobs for [`locate_bit_flip_with`]. Grouping of workers is a
/// throughput detail only; any worker count produces the same outcome.
#[derive(Default)]
pub struct SearchOptions<'a> {
    /// Worker thread count. Defaults to platform concurrency.
    pub workers: Option<usize>,
    /// Candidates per batch. Defaults to [`BATCH_SIZE`].
    pub batch_size: Option<u64>,
    /// Optional per-batch progress callback.
    pub progress: Option<ProgressFn<'a>>,
}

/// The single writable value shared between workers.
///
/// Claims use a min-reduction, which is idempotent and tolerates several
/// true matches (digest collisions) racing each other: the lowest
/// matching index always wins, so arbitration is deterministic.
struct ResultCell(AtomicU64);

impl ResultCell {
    fn new() -> Self {
        Self(AtomicU64::new(NOT_FOUND))
    }

    fn claim(&self, bit_index: u64) {
        self.0.fetch_min(bit_index, Ordering::Relaxed);
    }

    /// Read after the full barrier; racing with workers would be a bug.
    fn into_outcome(self) -> SearchOutcome {
        match self.0.into_inner() {
            NOT_FOUND => SearchOutcome::NotFound,
            bit => SearchOutcome::Found(bit),
        }
    }
}

/// Locate the single flipped bit that makes `piece` hash to `target`.
///
/// Rejects a wrong-length digest or an empty piece before any midstate
/// or worker resources are touched. Returns [`SearchOutcome::NotFound`]
/// when no single-bit flip reproduces the digest, which in particular is
/// the answer whenever the piece already matches it.
pub fn locate_bit_flip(piece: &[u8], target: &[u8]) -> Result<SearchOutcome, BitrotError> {
    locate_bit_flip_with(piece, target, &SearchOptions::default())
}

/// [`locate_bit_flip`] with explicit worker/batch settings and progress
/// reporting.
pub fn locate_bit_flip_with(
    piece: &[u8],
    target: &[u8],
    options: &SearchOptions,
) -> Result<SearchOutcome, BitrotError> {
    let target: Digest = target.try_into().map_err(|_| {
        BitrotError::Config(format!(
            "expected hash must be {DIGEST_LEN} bytes, got {}",
            target.len()
        ))
    })?;
    if piece.is_empty() {
        return Err(BitrotError::Config("piece is empty".into()));
    }

    let midstates = MidstateTable::build(piece);
    midstates.check_coverage(piece.len())?;

    let total_bits = piece.len() as u64 * 8;
    let batch_size = options.batch_size.unwrap_or(BATCH_SIZE).max(1);
    let num_batches = total_bits.div_ceil(batch_size);
    let workers = options
        .workers
        .unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
        .max(1)
        .min(num_batches as usize);

    let cell = ResultCell::new();
    let cursor = AtomicU64::new(0);
    let done = AtomicU64::new(0);

    thread::scope(|scope| -> Result<(), BitrotError> {
        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let verifier = Verifier::new(piece, &midstates, &target);
            let cell = &cell;
            let cursor = &cursor;
            let done = &done;
            let progress = options.progress;
            let handle = thread::Builder::new()
                .name(format!("bitrot-worker-{worker_id}"))
                .spawn_scoped(scope, move || {
                    run_worker(
                        &verifier, cursor, cell, done, progress, num_batches, batch_size,
                        total_bits,
                    )
                })
                .map_err(|e| BitrotError::Resource(format!("failed to spawn worker: {e}")))?;
            handles.push(handle);
        }

        // Full barrier: the result cell is not read until every batch in
        // every worker has run to completion.
        let mut failed = false;
        for handle in handles {
            failed |= handle.join().is_err();
        }
        if failed {
            return Err(BitrotError::Resource("search worker panicked".into()));
        }
        Ok(())
    })?;

    Ok(cell.into_outcome())
}

#[allow(clippy::too_many_arguments)]
fn run_worker(
    verifier: &Verifier<'_>,
    cursor: &AtomicU64,
    cell: &ResultCell,
    done: &AtomicU64,
    progress: Option<ProgressFn<'_>>,
    num_batches: u64,
    batch_size: u64,
    total_bits: u64,
) {
    let mut scratch = Vec::new();
    loop {
        let batch = cursor.fetch_add(1, Ordering::Relaxed);
        if batch >= num_batches {
            break;
        }
        let start = batch * batch_size;
        let end = (start + batch_size).min(total_bits);
        for bit in start..end {
            if verifier.matches(bit, &mut scratch) {
                cell.claim(bit);
            }
        }
        let finished = done.fetch_add(end - start, Ordering::Relaxed) + (end - start);
        if let Some(report) = progress {
            report(finished, total_bits);
        }
    }
}

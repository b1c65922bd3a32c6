//! CLI for the bitrot locator: read a piece file, decode the expected
//! SHA-1 hex digest, and run the exhaustive single-bit search.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use bitrot::io_utils::{bitrot_cli_error, io_cli_error, simple_cli_error};
use bitrot::{digest_of, locate_bit_flip_with, SearchOptions, SearchOutcome, DIGEST_LEN};

#[derive(Parser)]
#[command(
    name = "bitrot",
    about = "Locate a single flipped bit in a piece whose SHA-1 digest is known"
)]
struct Cli {
    /// Path to the piece file to inspect.
    piece: PathBuf,

    /// Expected SHA-1 digest of the uncorrupted piece, as 40 hex chars.
    expected_hash: String,

    /// Worker thread count (default: platform concurrency).
    #[arg(long)]
    workers: Option<usize>,

    /// Candidate bits per worker batch.
    #[arg(long)]
    batch_size: Option<u64>,

    /// Emit a machine readable JSON report on stdout.
    #[arg(long)]
    json: bool,

    /// Suppress the progress bar.
    #[arg(long)]
    quiet: bool,
}

#[derive(Serialize)]
struct Report {
    piece: String,
    piece_bytes: usize,
    candidates: u64,
    elapsed_ms: u128,
    intact: bool,
    bit_index: Option<u64>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let target = hex::decode(cli.expected_hash.trim())
        .map_err(|_| simple_cli_error("expected hash is not valid hex"))?;
    if target.len() != DIGEST_LEN {
        return Err(simple_cli_error(&format!(
            "expected hash must be {} hex chars ({} bytes), got {} bytes",
            DIGEST_LEN * 2,
            DIGEST_LEN,
            target.len()
        ))
        .into());
    }

    let piece = fs::read(&cli.piece).map_err(|e| io_cli_error("reading piece", &cli.piece, e))?;
    if piece.is_empty() {
        return Err(simple_cli_error("piece file is empty").into());
    }

    let total_bits = piece.len() as u64 * 8;
    let start = Instant::now();

    // Fast path: an intact piece needs no search.
    if digest_of(&piece)[..] == target[..] {
        if cli.json {
            print_report(&cli, piece.len(), total_bits, start, true, None)?;
        } else {
            println!("Piece already matches the expected hash; nothing to repair.");
        }
        return Ok(());
    }

    let bar = search_bar(total_bits, cli.quiet || cli.json);
    let report_progress = |done: u64, _total: u64| bar.set_position(done);
    let options = SearchOptions {
        workers: cli.workers,
        batch_size: cli.batch_size,
        progress: Some(&report_progress),
    };
    let outcome = locate_bit_flip_with(&piece, &target, &options)
        .map_err(|e| bitrot_cli_error("search failed", e))?;
    bar.finish_and_clear();

    let bit_index = match outcome {
        SearchOutcome::Found(bit) => Some(bit),
        SearchOutcome::NotFound => None,
    };
    if cli.json {
        print_report(&cli, piece.len(), total_bits, start, false, bit_index)?;
        return Ok(());
    }
    match bit_index {
        Some(bit) => println!(
            "Corrupted bit located: index {} (byte {}, bit {})",
            bit,
            bit / 8,
            bit % 8
        ),
        None => println!("No single-bit flip reproduces the expected hash."),
    }
    eprintln!(
        "Searched {} candidates in {:.2?}",
        total_bits,
        start.elapsed()
    );
    Ok(())
}

fn print_report(
    cli: &Cli,
    piece_bytes: usize,
    candidates: u64,
    start: Instant,
    intact: bool,
    bit_index: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = Report {
        piece: cli.piece.display().to_string(),
        piece_bytes,
        candidates,
        elapsed_ms: start.elapsed().as_millis(),
        intact,
        bit_index,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn search_bar(total_bits: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total_bits);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} candidates ({eta})")
            .expect("static progress template"),
    );
    bar
}

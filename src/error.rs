use thiserror::Error;

#[derive(Error, Debug)]
pub enum BitrotError {
    /// Invalid input rejected before any search work starts: malformed
    /// hash string, wrong digest length, empty piece.
    #[error("config error: {0}")]
    Config(String),

    /// Worker or allocation failure while a search was in progress.
    /// Distinct from a completed search that found nothing.
    #[error("resource error: {0}")]
    Resource(String),

    /// Internal invariant violation. Always a bug, never recoverable.
    #[error("internal error: {0}")]
    Internal(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

use thiserror::Error;

/// Failure taxonomy for the kill log pipeline. None of these are fatal to
/// the process; each degrades to an empty cycle, a skipped row, or a
/// logged-and-continued send.
#[derive(Error, Debug)]
pub enum DeathwatchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

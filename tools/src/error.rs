use nn::encoding::EncodeError;
use thiserror::Error;

/// Failure of a single puzzle record. Never affects other records
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("malformed FEN '{fen}': {reason}")]
    MalformedFen { fen: String, reason: String },

    #[error("illegal move '{mov}' in position '{fen}'")]
    IllegalMove { mov: String, fen: String },

    #[error("malformed move '{0}'")]
    MalformedMove(String),

    #[error("expected at least 2 moves, found {0}")]
    TooFewMoves(usize),

    /// The line itself could not be split into the needed fields
    #[error("malformed row: {0}")]
    MalformedRow(String),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Failure of a whole conversion run
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("can't read records: {0}")]
    SourceRead(#[source] csv::Error),

    #[error("can't write rows: {0}")]
    SinkWrite(#[source] csv::Error),

    #[error("missing column '{0}' in source header")]
    MissingColumn(&'static str),

    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    #[error("record at line {line}: {source}")]
    Record {
        line: u64,
        #[source]
        source: PuzzleError,
    },
}

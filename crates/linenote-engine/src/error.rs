use linenote_syntax::SyntaxError;
use thiserror::Error;

use crate::io::IoError;
use crate::source::SourceId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to parse {source_id}: {source}")]
    ParseFailure {
        source_id: SourceId,
        source: SyntaxError,
    },

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("No emitter specified")]
    NoSinkConfigured,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

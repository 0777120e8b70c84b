use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unknown column '{column}' for table {table}")]
    UnknownColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("malformed payload encoding: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("corrupt compressed payload: {0}")]
    CorruptPayload(String),

    #[error("payload checksum mismatch")]
    ChecksumMismatch,

    #[error("deletion requires explicit confirmation")]
    ConfirmationRequired,
}

impl Error {
    /// True for failures that come from turning a stored payload back into bytes.
    #[must_use]
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Error::Decode(_) | Error::CorruptPayload(_) | Error::ChecksumMismatch)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

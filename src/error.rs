use thiserror::Error;

pub use color_eyre::eyre::eyre;

use crate::protocol::envelope::{MalformedEnvelope, ServerError};
use crate::types::TypeResolutionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Server Error: {0}")]
    ServerError(#[from] ServerError),

    #[error("Malformed response: {0}")]
    MalformedEnvelope(#[from] MalformedEnvelope),

    #[error("Type resolution error: {0}")]
    TypeResolution(#[from] TypeResolutionError),

    #[error("Bad config error: {0}")]
    BadConfigError(String),

    #[error("Invalid packet")]
    InvalidPacket,

    #[error("Unexpected end of data")]
    UnexpectedEof,

    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] simdutf8::basic::Utf8Error),

    #[error("Library bug: {0}")]
    LibraryBug(color_eyre::Report),
}

impl Error {
    /// The engine's numeric error code, if the server rejected the query
    pub fn server_code(&self) -> Option<u64> {
        match self {
            Error::ServerError(err) => Some(err.code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

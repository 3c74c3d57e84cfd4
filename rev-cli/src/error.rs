use std::io;

use stream_reverse::ReverseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not open '{0}' for reading: {1}")]
    Open(String, #[source] io::Error),

    #[error("Invalid buffer size '{0}'")]
    InvalidBufferSize(String),

    #[error(transparent)]
    Reverse(#[from] ReverseError),
}

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReverseError>;

#[derive(Error, Debug)]
pub enum ReverseError {
    #[error("cannot allocate working buffer, even at {floor} bytes")]
    OutOfMemory { floor: usize },
    #[error("seek error: {0}")]
    Seek(String),
    #[error("read error: {0}")]
    Read(#[source] io::Error),
    #[error("write error: {0}")]
    Write(#[source] io::Error),
    #[error(
        "non-seekable input exceeds the {capacity}-byte working buffer; \
         provide it as a seekable stream instead"
    )]
    BufferTooSmall { capacity: usize },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

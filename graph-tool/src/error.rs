use odata_core::{DecodeError, EncodeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("refusing to write CBOR to a terminal, use --output")]
    BinaryOutput,
}

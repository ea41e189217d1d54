use thiserror::Error;

/// Failures surfaced by the CRP codec
#[derive(Debug, Error)]
pub enum CrpError {
    #[error("Unknown flash address 0x{0:X}, expected 0x10000 or 0x20000")]
    InvalidAddress(u32),
    #[error("Checksum mismatch: file has 0x{stored:04x}, calculated 0x{computed:04x}")]
    ChecksumMismatch { stored: u16, computed: u16 },
    #[error("File truncated: needed {needed} bytes, only {available} available")]
    Truncated { needed: usize, available: usize },
    #[error(
        "Chunk {index} (offset 0x{offset:x}, length 0x{length:x}) lies outside the {file_len} byte file"
    )]
    ChunkOutOfBounds {
        index: u16,
        offset: u32,
        length: u32,
        file_len: usize,
    },
    #[error("Container too large: {0}")]
    ContainerTooLarge(String),
    #[error("Invalid bootloader header: {0}")]
    InvalidHeader(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = CrpError> = std::result::Result<T, E>;

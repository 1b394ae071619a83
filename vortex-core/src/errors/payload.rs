use thiserror::Error;

/// Frame-scoped decode failures. The connection stays open; only the one frame is discarded.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("gzip decompression failed: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("decompressed payload length {len} is not a multiple of 4")]
    Misaligned { len: usize },
}

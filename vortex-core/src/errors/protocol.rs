use thiserror::Error;

/// Connection-scoped framing violations. All are fatal to the one connection, never to the
/// process or to other connections.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("short read mid-frame: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    #[error("io error after {filled} of {expected} header bytes: {source}")]
    Io { filled: usize, expected: usize, #[source] source: std::io::Error },

    #[error("bad frame signature: {0:02x?}")]
    BadSignature([u8; 4]),

    #[error("frame length {len} exceeds MAX_FRAME ({max})")]
    FrameTooLarge { len: u32, max: u32 },
}

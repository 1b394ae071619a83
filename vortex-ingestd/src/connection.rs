//! Per-connection ingest handler: reads framed messages, decompresses them, and offers the
//! decompressed payload to the shared [`FrameSlot`].

use log::{debug, warn};
use std::io;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use vortex_core::constants::FRAME_HEADER_LEN;
use vortex_core::errors::ProtocolError;
use vortex_core::framing::FrameHeader;
use vortex_core::FrameSlot;

/// Drive one connection's protocol loop until the peer closes or a protocol error occurs.
pub async fn handle(mut stream: TcpStream, peer: std::net::SocketAddr, slot: Arc<FrameSlot>) {
    loop {
        let header = match read_header(&mut stream).await {
            Ok(Some(header)) => header,
            Ok(None) => {
                debug!("{peer}: connection closed by peer");
                return;
            }
            Err(e) => {
                warn!("{peer}: closing connection: {e}");
                return;
            }
        };

        let frame_header = match FrameHeader::parse(&header) {
            Ok(h) => h,
            Err(e) => {
                warn!("{peer}: closing connection: {e}");
                return;
            }
        };

        let mut payload = vec![0u8; frame_header.payload_len as usize];
        if let Err(e) = stream.read_exact(&mut payload).await {
            warn!("{peer}: short read of {}-byte payload: {e}", payload.len());
            return;
        }

        match decompress(payload).await {
            Ok(decompressed) => slot.offer(decompressed),
            Err(e) => {
                warn!("{peer}: discarding frame, gzip decompression failed: {e}");
                continue;
            }
        }
    }
}

/// Read the 8-byte frame header. `Ok(None)` means the peer closed cleanly before sending any
/// bytes of a new frame; a clean close after partial bytes is [`ProtocolError::ShortRead`], a
/// connection-scoped protocol violation rather than a transient I/O failure.
async fn read_header(
    stream: &mut TcpStream,
) -> Result<Option<[u8; FRAME_HEADER_LEN]>, ProtocolError> {
    let mut header = [0u8; FRAME_HEADER_LEN];
    let mut filled = 0;
    while filled < header.len() {
        let n = stream
            .read(&mut header[filled..])
            .await
            .map_err(|source| ProtocolError::Io { filled, expected: header.len(), source })?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(ProtocolError::ShortRead { expected: header.len(), got: filled });
        }
        filled += n;
    }
    Ok(Some(header))
}

/// Gzip-decompress on a blocking-pool thread: frames can run up to `MAX_FRAME` bytes, too large
/// to inflate on the async reactor thread without risking starving other connections.
async fn decompress(compressed: Vec<u8>) -> io::Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        use flate2::read::GzDecoder;
        use std::io::Read;

        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    })
    .await
    .unwrap_or_else(|join_err| Err(io::Error::other(join_err)))
}

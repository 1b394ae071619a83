//! Pure parsing of the wire frame header. Reading the bytes off the socket is the ingest
//! connection handler's job; this module only interprets bytes already in hand.

use crate::constants::{FRAME_HEADER_LEN, FRAME_SIGNATURE, MAX_FRAME};
use crate::errors::ProtocolError;

/// A parsed, validated frame header: just the payload length, since the signature carries no
/// further information once checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub payload_len: u32,
}

impl FrameHeader {
    /// Parse and validate an 8-byte header: 4-byte signature, then a big-endian `u32` length.
    ///
    /// Rejects a mismatched signature or a length over [`MAX_FRAME`]. Does not read the payload.
    pub fn parse(header: &[u8; FRAME_HEADER_LEN]) -> Result<Self, ProtocolError> {
        let sig: [u8; 4] = header[0..4].try_into().expect("slice is exactly 4 bytes");
        if sig != FRAME_SIGNATURE {
            return Err(ProtocolError::BadSignature(sig));
        }

        let len = u32::from_be_bytes(header[4..8].try_into().expect("slice is exactly 4 bytes"));
        if len > MAX_FRAME {
            return Err(ProtocolError::FrameTooLarge { len, max: MAX_FRAME });
        }

        Ok(Self { payload_len: len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_header_parses() {
        let mut header = [0u8; FRAME_HEADER_LEN];
        header[0..4].copy_from_slice(&FRAME_SIGNATURE);
        header[4..8].copy_from_slice(&100u32.to_be_bytes());
        let parsed = FrameHeader::parse(&header).unwrap();
        assert_eq!(parsed.payload_len, 100);
    }

    #[test]
    fn single_flipped_signature_bit_is_rejected() {
        let mut header = [0u8; FRAME_HEADER_LEN];
        header[0..4].copy_from_slice(&[0xFF, 0xFF, 0xFF, 0xFE]);
        header[4..8].copy_from_slice(&0u32.to_be_bytes());
        let err = FrameHeader::parse(&header).unwrap_err();
        assert!(matches!(err, ProtocolError::BadSignature([0xFF, 0xFF, 0xFF, 0xFE])));
    }

    #[test]
    fn zero_length_is_valid() {
        let mut header = [0u8; FRAME_HEADER_LEN];
        header[0..4].copy_from_slice(&FRAME_SIGNATURE);
        header[4..8].copy_from_slice(&0u32.to_be_bytes());
        assert_eq!(FrameHeader::parse(&header).unwrap().payload_len, 0);
    }

    #[test]
    fn length_over_max_frame_is_rejected() {
        let mut header = [0u8; FRAME_HEADER_LEN];
        header[0..4].copy_from_slice(&FRAME_SIGNATURE);
        header[4..8].copy_from_slice(&(MAX_FRAME + 1).to_be_bytes());
        let err = FrameHeader::parse(&header).unwrap_err();
        assert!(matches!(err, ProtocolError::FrameTooLarge { len, max } if len == MAX_FRAME + 1 && max == MAX_FRAME));
    }
}

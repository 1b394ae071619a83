//! Decoding a decompressed frame payload into parallel coordinate/color slices.

use crate::constants::{VOXELS_X, VOXELS_Y, VOXELS_Z};
use crate::errors::PayloadError;

/// A decompressed payload split into four parallel slices, ready for
/// [`crate::SharedFrame::scatter_write`]. Points outside the grid bounds have already been
/// dropped; `rejected` counts how many.
pub struct Points {
    pub xs: Vec<u8>,
    pub ys: Vec<u8>,
    pub zs: Vec<u8>,
    pub cs: Vec<u8>,
    pub rejected: usize,
}

impl Points {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Decode a decompressed payload of 4-byte `(x, y, z, c)` records, dropping any whose coordinates
/// fall outside the grid. Returns [`PayloadError::Misaligned`] if `payload.len()` is not a
/// multiple of 4.
pub fn decode(payload: &[u8]) -> Result<Points, PayloadError> {
    if payload.len() % 4 != 0 {
        return Err(PayloadError::Misaligned { len: payload.len() });
    }

    let record_count = payload.len() / 4;
    let mut xs = Vec::with_capacity(record_count);
    let mut ys = Vec::with_capacity(record_count);
    let mut zs = Vec::with_capacity(record_count);
    let mut cs = Vec::with_capacity(record_count);
    let mut rejected = 0usize;

    for record in payload.chunks_exact(4) {
        let (x, y, z, c) = (record[0], record[1], record[2], record[3]);
        if (x as usize) < VOXELS_X && (y as usize) < VOXELS_Y && (z as usize) < VOXELS_Z {
            xs.push(x);
            ys.push(y);
            zs.push(z);
            cs.push(c);
        } else {
            rejected += 1;
        }
    }

    Ok(Points { xs, ys, zs, cs, rejected })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_in_bounds_point_survives() {
        let points = decode(&[64, 64, 32, 0xFF]).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points.rejected, 0);
        assert_eq!((points.xs[0], points.ys[0], points.zs[0], points.cs[0]), (64, 64, 32, 0xFF));
    }

    #[test]
    fn out_of_bounds_x_is_dropped_and_counted() {
        let payload = [200, 0, 0, 0xAA, 0, 0, 0, 0x55];
        let points = decode(&payload).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points.rejected, 1);
        assert_eq!(points.cs[0], 0x55);
    }

    #[test]
    fn misaligned_payload_is_rejected() {
        let err = decode(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, PayloadError::Misaligned { len: 3 }));
    }

    #[test]
    fn empty_payload_decodes_to_zero_points() {
        let points = decode(&[]).unwrap();
        assert!(points.is_empty());
        assert_eq!(points.rejected, 0);
    }
}

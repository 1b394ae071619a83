//! Typed view over the shared voxel double buffer.
//!
//! The hardware driver creates the named region and scans whichever page `page` currently names.
//! This core opens the region read-write, writes only into the idle page and the `page` byte, and
//! never touches the driver-owned control fields otherwise.

use crate::constants::{
    voxel_index, BPC_OFFSET, FLAGS_OFFSET, PAGE_OFFSET, RPM_OFFSET, SHARED_REGION_SIZE,
    USPF_OFFSET, VOXELS_PER_PAGE,
};
use crate::errors::StartupError;
use memmap2::MmapMut;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};

/// A mapped view of the shared region, owning the mapping for the process lifetime.
///
/// `buffers`/`page` access goes through raw byte indexing into the mapping rather than a
/// `#[repr(C)]` overlay struct: the region is shared with a C driver that defines the layout by
/// byte offset, and the `page` byte in particular is mutated concurrently with the driver's reads,
/// so it is addressed through an `AtomicU8` rather than a plain field.
pub struct SharedFrame {
    map: MmapMut,
}

unsafe impl Send for SharedFrame {}

impl SharedFrame {
    /// Open the named shared region and verify it is at least `expected_size` bytes.
    ///
    /// The region must already exist; this core never creates it (the hardware driver does).
    pub fn open(path: &Path, expected_size: usize) -> Result<Self, StartupError> {
        let file = OpenOptions::new().read(true).write(true).open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StartupError::ShmNotFound { path: path.to_path_buf(), source }
            } else if source.kind() == io::ErrorKind::PermissionDenied {
                StartupError::ShmPermission { path: path.to_path_buf(), source }
            } else {
                StartupError::ShmNotFound { path: path.to_path_buf(), source }
            }
        })?;

        let actual = file
            .metadata()
            .map_err(|source| StartupError::ShmNotFound { path: path.to_path_buf(), source })?
            .len() as usize;
        if actual < expected_size {
            return Err(StartupError::ShmTooSmall { path: path.to_path_buf(), expected: expected_size, actual });
        }

        // SAFETY: the region is backed by a file the driver keeps alive for the process lifetime;
        // concurrent writes from the driver are expected (it owns the active page and the control
        // fields) and are the reason the page byte and the mutated region are not aliased as `&mut`.
        let map = unsafe { MmapMut::map_mut(&file) }
            .map_err(|source| StartupError::ShmNotFound { path: path.to_path_buf(), source })?;

        log::info!("opened shared region {} ({} bytes)", path.display(), actual);
        Ok(Self { map })
    }

    /// Construct a `SharedFrame` over an already-sized, zero-initialized in-memory buffer. Used by
    /// tests that don't want to depend on an external driver creating a real region.
    #[cfg(test)]
    pub fn from_anon(size: usize) -> Self {
        let map = MmapMut::map_anon(size).expect("anonymous mmap");
        Self { map }
    }

    /// Raw view of one page's bytes, for test assertions only.
    #[cfg(test)]
    pub fn bytes_for_test(&self, p: u8) -> &[u8] {
        let start = p as usize * VOXELS_PER_PAGE;
        &self.map[start..start + VOXELS_PER_PAGE]
    }

    #[inline]
    fn page_cell(&self) -> &AtomicU8 {
        // SAFETY: PAGE_OFFSET is in-bounds by construction (checked at `open`), and AtomicU8 has
        // the same layout as u8, so this reinterpretation is valid for a byte the driver also
        // treats as a single-byte field.
        unsafe { &*(self.map.as_ptr().add(PAGE_OFFSET) as *const AtomicU8) }
    }

    /// Read the `page` field. A hint for choosing the write target, not a synchronization barrier.
    pub fn current_page(&self) -> u8 {
        self.page_cell().load(Ordering::Relaxed)
    }

    /// Write `p` into the `page` field as a single-byte store, flipping scanout to page `p`.
    pub fn flip(&self, p: u8) {
        self.page_cell().store(p, Ordering::Relaxed);
    }

    /// Zero the `N` bytes of page `p`.
    pub fn clear_page(&mut self, p: u8) {
        let start = p as usize * VOXELS_PER_PAGE;
        self.map[start..start + VOXELS_PER_PAGE].fill(0);
    }

    /// Write one color byte at the voxel addressed by `(x, y, z)` in page `p`.
    ///
    /// No bounds check: the caller (the Rasterizer) validates coordinates before calling.
    #[inline]
    pub fn write(&mut self, p: u8, x: u8, y: u8, z: u8, c: u8) {
        let i = p as usize * VOXELS_PER_PAGE + voxel_index(x, y, z);
        self.map[i] = c;
    }

    /// Bulk form of [`Self::write`] over parallel coordinate/color slices of equal length.
    ///
    /// Order between points is unspecified; colliding coordinates resolve last-writer-wins by
    /// virtue of iterating the slices in order.
    pub fn scatter_write(&mut self, p: u8, xs: &[u8], ys: &[u8], zs: &[u8], cs: &[u8]) {
        debug_assert_eq!(xs.len(), ys.len());
        debug_assert_eq!(xs.len(), zs.len());
        debug_assert_eq!(xs.len(), cs.len());
        let base = p as usize * VOXELS_PER_PAGE;
        for i in 0..xs.len() {
            let idx = base + voxel_index(xs[i], ys[i], zs[i]);
            self.map[idx] = cs[i];
        }
    }

    /// Bits-per-color hint, owned and written by the driver. Read-only here.
    pub fn bpc(&self) -> u8 {
        self.map[BPC_OFFSET]
    }

    /// Driver flag bits. Read-only here.
    pub fn flags(&self) -> u16 {
        u16::from_ne_bytes([self.map[FLAGS_OFFSET], self.map[FLAGS_OFFSET + 1]])
    }

    /// Mechanical rotation rate hint, in RPM. Read-only here.
    pub fn rpm(&self) -> u16 {
        u16::from_ne_bytes([self.map[RPM_OFFSET], self.map[RPM_OFFSET + 1]])
    }

    /// Microseconds-per-frame hint. Read-only here.
    pub fn uspf(&self) -> u16 {
        u16::from_ne_bytes([self.map[USPF_OFFSET], self.map[USPF_OFFSET + 1]])
    }
}

/// Expected size of the shared region, per the fixed layout in the data model.
pub const EXPECTED_SIZE: usize = SHARED_REGION_SIZE;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{voxel_index, VOXELS_PER_PAGE};

    #[test]
    fn clear_then_write_round_trips() {
        let mut sf = SharedFrame::from_anon(EXPECTED_SIZE);
        sf.clear_page(0);
        sf.write(0, 64, 64, 32, 0xFF);
        let i = voxel_index(64, 64, 32);
        assert_eq!(sf.map[i], 0xFF);
        // every other byte of page 0 is zero
        for (idx, b) in sf.map[..VOXELS_PER_PAGE].iter().enumerate() {
            if idx != i {
                assert_eq!(*b, 0, "unexpected nonzero at {idx}");
            }
        }
    }

    #[test]
    fn scatter_write_last_writer_wins() {
        let mut sf = SharedFrame::from_anon(EXPECTED_SIZE);
        sf.clear_page(0);
        sf.scatter_write(0, &[10, 10], &[10, 10], &[10, 10], &[0x01, 0x02]);
        let i = voxel_index(10, 10, 10);
        assert_eq!(sf.map[i], 0x02);
    }

    #[test]
    fn flip_and_current_page_round_trip() {
        let sf = SharedFrame::from_anon(EXPECTED_SIZE);
        assert_eq!(sf.current_page(), 0);
        sf.flip(1);
        assert_eq!(sf.current_page(), 1);
        sf.flip(0);
        assert_eq!(sf.current_page(), 0);
    }

    #[test]
    fn open_missing_region_fails_loudly() {
        let path = Path::new("/nonexistent/vortex_double_buffer_test");
        let err = SharedFrame::open(path, EXPECTED_SIZE).unwrap_err();
        assert!(matches!(err, StartupError::ShmNotFound { .. }));
    }
}

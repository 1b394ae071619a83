//! The dedicated worker that turns offered payloads into idle-page writes and page flips.

use crate::constants::STATUS_REPORT_INTERVAL;
use crate::frame_slot::{FrameSlot, Taken};
use crate::point;
use crate::shared_frame::SharedFrame;
use log::{info, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Totals accumulated since the last status report, reset after each one.
#[derive(Default)]
struct Stats {
    frames_total: u64,
    frames_since_report: u64,
    points_written: u64,
    points_rejected: u64,
}

/// The rasterizer worker. Holds the shared frame and the slot it consumes from.
pub struct Rasterizer {
    slot: Arc<FrameSlot>,
    frame: SharedFrame,
}

impl Rasterizer {
    pub fn new(slot: Arc<FrameSlot>, frame: SharedFrame) -> Self {
        Self { slot, frame }
    }

    /// Run the take/rasterize/flip loop until the slot closes.
    pub fn run(mut self) {
        let mut stats = Stats::default();

        loop {
            let payload = match self.slot.take() {
                Taken::Payload(p) => p,
                Taken::Closed => {
                    info!("rasterizer stopping: frame slot closed");
                    return;
                }
            };

            let points = match point::decode(&payload) {
                Ok(points) => points,
                Err(e) => {
                    warn!("discarding malformed frame: {e}");
                    continue;
                }
            };

            let write_page = 1 - self.frame.current_page();
            self.frame.clear_page(write_page);
            self.frame.scatter_write(write_page, &points.xs, &points.ys, &points.zs, &points.cs);
            self.frame.flip(write_page);

            stats.frames_total += 1;
            stats.frames_since_report += 1;
            stats.points_written += points.len() as u64;
            stats.points_rejected += points.rejected as u64;

            if stats.frames_since_report == STATUS_REPORT_INTERVAL {
                info!(
                    "rasterizer: {} frames processed ({} points written, {} points rejected since last report)",
                    stats.frames_total, stats.points_written, stats.points_rejected
                );
                stats.frames_since_report = 0;
                stats.points_written = 0;
                stats.points_rejected = 0;
            }
        }
    }
}

/// Spawn the rasterizer on a dedicated named thread.
pub fn spawn(slot: Arc<FrameSlot>, frame: SharedFrame) -> JoinHandle<()> {
    thread::Builder::new()
        .name("rasterizer".into())
        .spawn(move || Rasterizer::new(slot, frame).run())
        .expect("failed to spawn rasterizer thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::voxel_index;
    use crate::shared_frame::{SharedFrame, EXPECTED_SIZE};

    fn test_frame() -> SharedFrame {
        SharedFrame::from_anon(EXPECTED_SIZE)
    }

    #[test]
    fn single_point_frame_flips_and_paints_exactly_one_voxel() {
        let mut frame = test_frame();
        let slot = Arc::new(FrameSlot::new());
        slot.offer(vec![64, 64, 32, 0xFF]);

        let payload = match slot.take() {
            Taken::Payload(p) => p,
            Taken::Closed => panic!("slot should not be closed"),
        };
        let points = point::decode(&payload).unwrap();
        let write_page = 1 - frame.current_page();
        frame.clear_page(write_page);
        frame.scatter_write(write_page, &points.xs, &points.ys, &points.zs, &points.cs);
        frame.flip(write_page);

        assert_eq!(frame.current_page(), write_page);
        let i = voxel_index(64, 64, 32);
        assert_eq!(frame.bytes_for_test(write_page)[i], 0xFF);
        assert_eq!(
            frame.bytes_for_test(write_page).iter().filter(|&&b| b != 0).count(),
            1,
            "exactly one nonzero voxel expected"
        );
    }

    #[test]
    fn out_of_bounds_points_are_rejected_without_aborting_the_frame() {
        let points = point::decode(&[200, 0, 0, 0xAA, 0, 0, 0, 0x55]).unwrap();
        assert_eq!(points.rejected, 1);
        assert_eq!(points.len(), 1);
    }
}

//! Single-slot, newest-wins hand-off between ingest connections and the Rasterizer.

use std::sync::{Condvar, Mutex};

struct Inner {
    payload: Option<Vec<u8>>,
    closed: bool,
}

/// A bounded hand-off of capacity one. `Offer` never blocks and always wins over whatever was
/// previously held; `Take` blocks until a payload is offered or the slot is closed.
pub struct FrameSlot {
    inner: Mutex<Inner>,
    ready: Condvar,
}

/// Result of a [`FrameSlot::take`] call.
pub enum Taken {
    /// A payload was available.
    Payload(Vec<u8>),
    /// The slot was closed and holds nothing further; the caller should stop looping.
    Closed,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner { payload: None, closed: false }), ready: Condvar::new() }
    }

    /// Replace any currently-held payload with `payload`. A no-op after [`Self::close`].
    pub fn offer(&self, payload: Vec<u8>) {
        let mut guard = self.inner.lock().expect("frame slot mutex poisoned");
        if guard.closed {
            return;
        }
        guard.payload = Some(payload);
        self.ready.notify_one();
    }

    /// Block until a payload is available or the slot closes.
    pub fn take(&self) -> Taken {
        let mut guard = self.inner.lock().expect("frame slot mutex poisoned");
        loop {
            if let Some(payload) = guard.payload.take() {
                return Taken::Payload(payload);
            }
            if guard.closed {
                return Taken::Closed;
            }
            guard = self.ready.wait(guard).expect("frame slot mutex poisoned");
        }
    }

    /// Wake any blocked `take` with [`Taken::Closed`] and make subsequent `offer` calls no-ops.
    pub fn close(&self) {
        let mut guard = self.inner.lock().expect("frame slot mutex poisoned");
        guard.closed = true;
        guard.payload = None;
        self.ready.notify_all();
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn offer_then_take_round_trips() {
        let slot = FrameSlot::new();
        slot.offer(vec![1, 2, 3, 4]);
        match slot.take() {
            Taken::Payload(p) => assert_eq!(p, vec![1, 2, 3, 4]),
            Taken::Closed => panic!("expected a payload"),
        }
    }

    #[test]
    fn later_offer_replaces_earlier_unread_one() {
        let slot = FrameSlot::new();
        slot.offer(vec![1]);
        slot.offer(vec![2]);
        slot.offer(vec![3]);
        match slot.take() {
            Taken::Payload(p) => assert_eq!(p, vec![3]),
            Taken::Closed => panic!("expected a payload"),
        }
    }

    #[test]
    fn close_wakes_blocked_take() {
        let slot = Arc::new(FrameSlot::new());
        let waiter = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || matches!(slot.take(), Taken::Closed))
        };
        thread::sleep(Duration::from_millis(20));
        slot.close();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn offer_after_close_is_a_no_op() {
        let slot = FrameSlot::new();
        slot.close();
        slot.offer(vec![9]);
        assert!(matches!(slot.take(), Taken::Closed));
    }
}

//! Cross-platform, fire-once shutdown trigger.
//!
//! Waits for Ctrl-C (and, on Unix, SIGTERM) via `tokio::signal`, then runs the shutdown handler
//! exactly once, the same way on any platform tokio supports.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;

static FIRED: AtomicBool = AtomicBool::new(false);

/// Wait for Ctrl-C (and, on Unix, SIGTERM), then run `on_shutdown` exactly once.
///
/// A signal received while a prior one is still being handled is ignored; the fire-once guard
/// makes a second signal a no-op instead of re-running the shutdown handler.
pub async fn wait_and_fire<F>(on_shutdown: F)
where
    F: FnOnce(),
{
    wait_for_signal().await;
    if FIRED.swap(true, Ordering::SeqCst) {
        return;
    }
    on_shutdown();
}

#[cfg(unix)]
async fn wait_for_signal() {
    let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = signal::ctrl_c().await;
}

//! Single-threaded host loop.
//!
//! The X server calls a driver's read callback from its main loop whenever a
//! registered descriptor is readable.  [`run_until`] does the same on a
//! `tokio` `current_thread` runtime: it waits on the registered descriptor
//! through `AsyncFd` and calls [`Driver::read_input`] on every wake-up,
//! until `shutdown` completes.

use std::future::Future;
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use tokio::io::unix::AsyncFd;
use tokio::io::Interest;
use tracing::{debug, info, trace};

use super::registry::DescriptorRegistry;
use crate::application::lifecycle::{Driver, ReadOutcome};
use crate::application::source::EventSource;

/// A borrowed descriptor; the library context owns and closes it.
struct Watched(RawFd);

impl AsRawFd for Watched {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

/// Runs the read loop until `shutdown` resolves.
///
/// Returns immediately when no descriptor is registered.  The descriptor is
/// read once: `driver` stays borrowed for the whole loop, so no device can be
/// pre-initialised or uninitialised (and no context replaced) until it
/// returns.  The loop also returns once the context is gone.
///
/// # Errors
///
/// Returns the I/O error if the descriptor cannot be registered with the
/// runtime or polling fails.
pub async fn run_until<S, F>(
    driver: &mut Driver<S>,
    registry: &DescriptorRegistry,
    shutdown: F,
) -> io::Result<()>
where
    S: EventSource,
    F: Future<Output = ()>,
{
    let Some(fd) = registry.descriptors().first().copied() else {
        info!("no enabled devices, nothing to poll");
        return Ok(());
    };
    let watched = AsyncFd::with_interest(Watched(fd), Interest::READABLE)?;
    debug!(fd, "polling descriptor");

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => return Ok(()),
            ready = watched.readable() => {
                let mut guard = ready?;
                let outcome = driver.read_input();
                trace!(?outcome, "read callback");
                if matches!(outcome, ReadOutcome::Idle) {
                    // The context is gone; nothing will read this fd again.
                    return Ok(());
                }
                guard.clear_ready();
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

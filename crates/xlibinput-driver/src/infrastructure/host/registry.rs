//! Reference-counted set of enabled descriptors.
//!
//! All devices of one library context share a descriptor, so every device-on
//! registers the same fd again.  The registry counts registrations and only
//! forgets a descriptor when the last device turned off.

use std::collections::HashMap;
use std::os::unix::io::RawFd;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::application::lifecycle::HostEventLoop;

/// Shared handle to the registered descriptors.  Clones see the same set.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    fds: Arc<Mutex<HashMap<RawFd, usize>>>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered descriptors, lowest first.
    pub fn descriptors(&self) -> Vec<RawFd> {
        let mut fds: Vec<RawFd> = match self.fds.lock() {
            Ok(fds) => fds.keys().copied().collect(),
            Err(_) => return Vec::new(),
        };
        fds.sort_unstable();
        fds
    }

    /// How many devices registered `fd`.
    pub fn registrations(&self, fd: RawFd) -> usize {
        self.fds
            .lock()
            .map(|fds| fds.get(&fd).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors().is_empty()
    }
}

impl HostEventLoop for DescriptorRegistry {
    fn add_enabled_descriptor(&self, fd: RawFd) {
        let Ok(mut fds) = self.fds.lock() else {
            warn!(fd, "descriptor registry poisoned");
            return;
        };
        let count = fds.entry(fd).or_insert(0);
        *count += 1;
        debug!(fd, registrations = *count, "descriptor enabled");
    }

    fn remove_enabled_descriptor(&self, fd: RawFd) {
        let Ok(mut fds) = self.fds.lock() else {
            warn!(fd, "descriptor registry poisoned");
            return;
        };
        match fds.get_mut(&fd) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                fds.remove(&fd);
                debug!(fd, "descriptor disabled");
            }
            None => warn!(fd, "removing a descriptor that was never added"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

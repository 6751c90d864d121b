//! Upstream port: the event-source library (libinput) as seen by the driver.
//!
//! The driver never talks to libinput directly.  It goes through the
//! [`EventSource`] and [`SourceDevice`] traits defined here; the
//! infrastructure layer provides the libinput-backed implementation and a
//! scripted mock for tests.
//!
//! # Handle ownership
//!
//! libinput device handles are reference counted.  A [`SourceDevice`] value
//! *is* one reference: cloning takes a reference, dropping releases it.  The
//! lifecycle manager relies on this to express "ref on probe, unref on init"
//! and "ref on enable, unref on disable" as plain ownership moves.

use std::os::unix::io::RawFd;
use std::path::Path;

use thiserror::Error;
use xlibinput_core::{Capabilities, EventKind, LedMask};

/// Identifies one device binding; attached to library devices as user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(pub u32);

impl std::fmt::Display for BindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "binding-{}", self.0)
    }
}

/// Error type for context and device acquisition.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not create the library context: {0}")]
    ContextCreation(String),
    #[error("no device could be added for {0}")]
    DeviceUnavailable(String),
}

/// Result of a failed dispatch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Nothing to read right now; try again on the next poll wake-up.
    #[error("dispatch would block")]
    WouldBlock,
    /// Any other failure, carrying the positive errno value.
    #[error("dispatch failed with errno {0}")]
    Failed(i32),
}

/// One drained event with the binding resolved from the device's user data.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    /// `None` when the originating device carries no user data.
    pub binding: Option<BindingId>,
    pub kind: EventKind,
}

/// A reference-counted library device handle.
pub trait SourceDevice: Clone {
    /// Capability flags reported by the library.
    fn capabilities(&self) -> Capabilities;

    /// Pushes the keyboard LED state to the hardware.
    fn led_update(&self, leds: LedMask);
}

/// The library context: one per driver, shared by all bindings.
pub trait EventSource {
    type Device: SourceDevice;

    /// Opens the node at `path` and adds it to the context.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::DeviceUnavailable`] if the node cannot be opened
    /// or is not an input device.
    fn add_device(&mut self, path: &Path) -> Result<Self::Device, SourceError>;

    /// Removes the device from the context. The handle stays valid for as long
    /// as references to it exist.
    fn remove_device(&mut self, device: &Self::Device);

    /// Attaches `binding` to `device`; events from it resolve to that binding.
    fn set_user_data(&mut self, device: &Self::Device, binding: BindingId);

    /// The pollable descriptor shared by every device of this context.
    fn fd(&self) -> RawFd;

    /// Reads pending kernel events into the library's queue.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::WouldBlock`] when nothing is ready.
    fn dispatch(&mut self) -> Result<(), DispatchError>;

    /// Pops the next queued event; the library event object is released
    /// before this returns.
    fn next_event(&mut self) -> Option<SourceEvent>;
}

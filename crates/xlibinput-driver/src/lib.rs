//! xlibinput-driver library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the driver do? (for beginners)
//!
//! The X server does not read `/dev/input` itself.  It loads an *input
//! driver* per device, and the driver turns kernel input into X events.
//! This driver delegates the hard part (acceleration, tapping, palm
//! detection, ...) to libinput and only translates:
//!
//! 1. At pre-init it checks the device node given by the `Device` option.
//! 2. At init it declares the device to the server: keyboard, pointer with 7
//!    buttons and 4 axes, and/or a 15-finger touchscreen.
//! 3. While the device is on, the server polls libinput's descriptor and
//!    calls the read callback, which drains libinput and posts motion,
//!    button, key and touch events.
//!
//! The `xlibinput-driver` binary (feature `libinput`) plays the server: it
//! runs the same lifecycle against real device nodes and prints what would
//! have been posted.

/// Application layer: lifecycle manager, translator, ports.
pub mod application;

/// Infrastructure layer: event sources, input sinks, host loop, config.
pub mod infrastructure;

pub use application::lifecycle::{Driver, DriverError, ReadOutcome, Status};
pub use application::options::InputOptions;
pub use application::source::BindingId;

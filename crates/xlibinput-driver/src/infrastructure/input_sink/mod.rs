//! Input-sink adapters: the downstream X device.
//!
//! - **`log`** – writes every registered class and posted event as a
//!   `tracing` record or as a JSON line.  The host binary uses it in place of
//!   the X server.
//! - **`mock`** – records every call for assertions.

pub use crate::application::translate::{InputSink, SinkError};

pub mod log;
pub mod mock;

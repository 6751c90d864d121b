//! Event-source adapters.
//!
//! - **`libinput`** – the real source, a libinput path-backend context.
//!   Compiled with the `libinput` cargo feature only, so the rest of the
//!   workspace builds and tests without the system library.
//! - **`mock`** – a scripted source for tests.

pub use crate::application::source::{DispatchError, SourceError};

#[cfg(feature = "libinput")]
pub mod libinput;

pub mod mock;

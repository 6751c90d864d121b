//! Application layer of the driver.
//!
//! # What lives here?
//!
//! - **`source`** – the upstream port: the [`EventSource`](source::EventSource)
//!   and [`SourceDevice`](source::SourceDevice) traits the libinput adapter
//!   implements.
//! - **`translate`** – the downstream port ([`InputSink`](translate::InputSink))
//!   and the event translator that turns libinput events into posting calls.
//! - **`initializers`** – one device-class setup routine per capability.
//! - **`options`** – the host option list handed to pre-init.
//! - **`lifecycle`** – the [`Driver`](lifecycle::Driver): pre-init, device
//!   control, uninit and the read callback.

pub mod initializers;
pub mod lifecycle;
pub mod options;
pub mod source;
pub mod translate;

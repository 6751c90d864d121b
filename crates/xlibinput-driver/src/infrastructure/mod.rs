//! Infrastructure layer of the driver.
//!
//! Contains the adapters behind the application-layer traits.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `xlibinput_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.
//!
//! # Sub-modules
//!
//! - **`event_source`** – the libinput path-backend context (feature
//!   `libinput`) and a scripted `MockEventSource`.
//! - **`input_sink`** – `EventLogSink`, which reports posted events as log
//!   records or JSON lines, and a recording `MockInputSink`.
//! - **`host`** – the descriptor registry and the `tokio` read loop that play
//!   the X server's main loop.
//! - **`storage`** – TOML configuration of the host binary.

pub mod event_source;
pub mod host;
pub mod input_sink;
pub mod storage;

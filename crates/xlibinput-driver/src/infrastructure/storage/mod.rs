//! Storage infrastructure: configuration file loading for the host binary.
//!
//! The driver itself is configured by the server's option lists.  The
//! `xlibinput-driver` binary, which plays the server, reads its device list
//! and output settings from a TOML file handled by `config`.

pub mod config;

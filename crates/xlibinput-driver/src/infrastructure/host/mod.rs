//! Host-side adapters: what the X server's main loop would provide.
//!
//! - **`registry`** – [`DescriptorRegistry`], the set of enabled descriptors
//!   the driver asked the host to poll.
//! - **`runner`** – a single-threaded `tokio` loop that waits for the
//!   registered descriptor to become readable and calls the driver's read
//!   callback.

pub mod registry;
pub mod runner;

pub use registry::DescriptorRegistry;
pub use runner::run_until;

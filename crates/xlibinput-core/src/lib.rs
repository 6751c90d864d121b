//! # xlibinput-core
//!
//! Shared foundation of the xlibinput driver: the numeric types, event model,
//! code tables and device-class descriptors the driver moves between libinput
//! and the X server.
//!
//! This crate has zero dependencies on OS APIs, libinput or the X server.
//!
//! # Architecture overview (for beginners)
//!
//! The driver sits between two libraries it does not own:
//!
//! ```text
//! /dev/input/eventN ──> libinput ──(EventKind)──> translator ──(post_*)──> X server
//! ```
//!
//! - **`fixed`** – libinput's 24.8 fixed-point numbers and their truncating
//!   conversions.
//! - **`event`** – the libinput events the driver understands, detached from
//!   the library's event objects.
//! - **`codes`** – kernel button/key codes to X button ordinals and keycodes.
//! - **`device`** – capability flags and keyboard LED bit layouts.
//! - **`class`** – the pointer, keyboard and touch classes registered with the
//!   server during device init.
//! - **`posting`** – valuator modes, valuator masks and touch event types used
//!   when posting events.
//! - **`touch`** – the slot-to-touch-id table that emulates X touch ids.

pub mod class;
pub mod codes;
pub mod device;
pub mod event;
pub mod fixed;
pub mod posting;
pub mod touch;

pub use class::{KeyboardClass, PointerClass, ScrollDistance, TouchClass};
pub use codes::ScrollAxis;
pub use device::{Capabilities, LedMask, LockIndicators};
pub use event::{EventKind, PressState, TouchPhase};
pub use fixed::Fixed;
pub use posting::{AxisMode, TouchEventType, TouchId, ValuatorMask};
pub use touch::TouchSlotTable;

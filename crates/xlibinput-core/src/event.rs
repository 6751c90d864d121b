//! Library-side event model.
//!
//! [`EventKind`] is the subset of the libinput event stream the driver knows
//! about, already detached from the library's event objects.  Adapters build
//! one value per drained event; the translator consumes it.

use serde::{Deserialize, Serialize};

use crate::codes::ScrollAxis;
use crate::fixed::Fixed;

/// Pressed/released state shared by buttons and keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressState {
    Pressed,
    Released,
}

impl PressState {
    pub fn is_pressed(self) -> bool {
        matches!(self, PressState::Pressed)
    }
}

/// Phase of a touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchPhase {
    Down,
    Motion,
    Up,
    Cancel,
}

/// One event drained from the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    None,
    DeviceAdded,
    DeviceRemoved,
    /// Relative pointer motion.
    PointerMotion { dx: Fixed, dy: Fixed },
    /// Absolute pointer motion, already scaled to the declared screen size.
    PointerMotionAbsolute { x: Fixed, y: Fixed },
    /// Pointer button with its kernel code.
    PointerButton { button: u32, state: PressState },
    /// Scroll on one axis.
    PointerAxis { axis: ScrollAxis, value: Fixed },
    /// Keyboard key with its kernel code.
    KeyboardKey { key: u32, state: PressState },
    /// Touch contact change. `slot` is `None` on single-touch hardware.
    Touch {
        phase: TouchPhase,
        slot: Option<u32>,
        x: Fixed,
        y: Fixed,
    },
    TouchFrame,
}

impl EventKind {
    /// Short, stable name used in log records.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::None => "none",
            EventKind::DeviceAdded => "device-added",
            EventKind::DeviceRemoved => "device-removed",
            EventKind::PointerMotion { .. } => "pointer-motion",
            EventKind::PointerMotionAbsolute { .. } => "pointer-motion-absolute",
            EventKind::PointerButton { .. } => "pointer-button",
            EventKind::PointerAxis { .. } => "pointer-axis",
            EventKind::KeyboardKey { .. } => "keyboard-key",
            EventKind::Touch { .. } => "touch",
            EventKind::TouchFrame => "touch-frame",
        }
    }
}

//! Device capability flags and keyboard LED masks.
//!
//! A physical device can expose more than one capability: a keyboard with an
//! integrated touchpad reports both `KEYBOARD` and `POINTER`.  The driver runs
//! one class initializer per capability present, so the flags are an additive
//! set rather than a device "type".
//!
//! Keyboard LEDs use two different bit layouts:
//!
//! | Indicator   | X server (`KeybdCtrl.leds`) | libinput (`enum libinput_led`) |
//! |-------------|-----------------------------|--------------------------------|
//! | Caps Lock   | `1 << 0`                    | `1 << 1`                       |
//! | Num Lock    | `1 << 1`                    | `1 << 0`                       |
//! | Scroll Lock | `1 << 2`                    | `1 << 2`                       |

use serde::{Deserialize, Serialize};

/// Set of device capabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities(pub u8);

impl Capabilities {
    pub const KEYBOARD: u8 = 1 << 0;
    pub const POINTER: u8 = 1 << 1;
    pub const TOUCH: u8 = 1 << 2;

    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns a copy with the given capability bits added.
    pub const fn with(self, bits: u8) -> Self {
        Self(self.0 | bits)
    }

    /// Returns `true` if the device reports key events.
    pub fn keyboard(&self) -> bool {
        self.0 & Self::KEYBOARD != 0
    }

    /// Returns `true` if the device reports pointer events.
    pub fn pointer(&self) -> bool {
        self.0 & Self::POINTER != 0
    }

    /// Returns `true` if the device reports touch events.
    pub fn touch(&self) -> bool {
        self.0 & Self::TOUCH != 0
    }
}

/// Lock indicator state as the X server hands it to the keyboard control callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockIndicators(pub u32);

impl LockIndicators {
    pub const CAPS_LOCK: u32 = 1 << 0;
    pub const NUM_LOCK: u32 = 1 << 1;
    pub const SCROLL_LOCK: u32 = 1 << 2;
}

/// LED mask in libinput's bit layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LedMask(pub u32);

impl LedMask {
    pub const NUM_LOCK: u32 = 1 << 0;
    pub const CAPS_LOCK: u32 = 1 << 1;
    pub const SCROLL_LOCK: u32 = 1 << 2;

    /// Raw libinput bits.
    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl From<LockIndicators> for LedMask {
    fn from(indicators: LockIndicators) -> Self {
        const MAPPING: [(u32, u32); 3] = [
            (LockIndicators::CAPS_LOCK, LedMask::CAPS_LOCK),
            (LockIndicators::NUM_LOCK, LedMask::NUM_LOCK),
            (LockIndicators::SCROLL_LOCK, LedMask::SCROLL_LOCK),
        ];

        let bits = MAPPING
            .iter()
            .filter(|(xbit, _)| indicators.0 & xbit != 0)
            .fold(0, |acc, (_, led)| acc | led);
        LedMask(bits)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

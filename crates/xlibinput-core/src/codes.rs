//! Code translation tables: kernel button/key codes to X server numbering.
//!
//! libinput reports buttons and keys with the Linux kernel's `input-event-codes.h`
//! values.  The X server numbers pointer buttons from 1 (left, middle, right,
//! then wheel buttons) and keyboard keys from 8: X reserves keycodes 0-7, so
//! every kernel key code is shifted up by [`XORG_KEYCODE_OFFSET`].
//!
//! | Kernel code  | Value   | X button |
//! |--------------|---------|----------|
//! | `BTN_LEFT`   | `0x110` | 1        |
//! | `BTN_MIDDLE` | `0x112` | 2        |
//! | `BTN_RIGHT`  | `0x111` | 3        |
//!
//! Any other button (side, extra, stylus buttons...) has no mapping and the
//! event is dropped by the translator.

use serde::{Deserialize, Serialize};

/// Kernel code of the left mouse button.
pub const BTN_LEFT: u32 = 0x110;
/// Kernel code of the right mouse button.
pub const BTN_RIGHT: u32 = 0x111;
/// Kernel code of the middle mouse button.
pub const BTN_MIDDLE: u32 = 0x112;
/// Kernel code of the side button. Not translated.
pub const BTN_SIDE: u32 = 0x113;

/// Offset between kernel key codes and X keycodes.
pub const XORG_KEYCODE_OFFSET: u32 = 8;

/// Maps a kernel button code to the X button ordinal.
///
/// Returns `None` for every code other than left, middle and right.
pub fn button_ordinal(code: u32) -> Option<u8> {
    match code {
        BTN_LEFT => Some(1),
        BTN_MIDDLE => Some(2),
        BTN_RIGHT => Some(3),
        _ => None,
    }
}

/// Maps a kernel key code to the X keycode.
pub fn x_keycode(code: u32) -> u32 {
    code.wrapping_add(XORG_KEYCODE_OFFSET)
}

/// Scroll axis reported by a pointer axis event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}

impl ScrollAxis {
    /// Valuator index a scroll event on this axis is posted on.
    ///
    /// Note that the pointer class registers its scroll valuators on indices
    /// 2 (horizontal) and 3 (vertical); the posting indices are one higher.
    pub fn posting_valuator(self) -> u8 {
        match self {
            ScrollAxis::Vertical => 3,
            ScrollAxis::Horizontal => 4,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

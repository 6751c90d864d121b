//! Signed 24.8 fixed-point values.
//!
//! # Why fixed point? (for beginners)
//!
//! libinput reports sub-pixel quantities (pointer deltas, scroll distances,
//! touch positions).  Historically these crossed the library boundary as a
//! 32-bit integer whose low 8 bits hold the fraction: the value `1.5` is
//! stored as `384` (`1.5 * 256`).  The X server, on the other hand, wants
//! plain integers for relative valuators and doubles for touch valuators.
//!
//! | Stored (`i32`) | Meaning | `to_int()` | `to_f64()` |
//! |----------------|---------|------------|------------|
//! | `256`          | 1.0     | 1          | 1.0        |
//! | `384`          | 1.5     | 1          | 1.5        |
//! | `-384`         | -1.5    | -1         | -1.5       |
//! | `255`          | 0.996   | 0          | 0.996...   |
//!
//! Integer conversion truncates toward zero.  Repeated sub-integer motion is
//! therefore lost; nothing at this layer accumulates remainders.

use serde::{Deserialize, Serialize};

/// Number of fractional bits.
const FRACTION_BITS: u32 = 8;

/// Scale factor between the stored integer and the represented value.
const SCALE: i32 = 1 << FRACTION_BITS;

/// A signed 24.8 fixed-point number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(i32);

impl Fixed {
    /// The value `0.0`.
    pub const ZERO: Fixed = Fixed(0);

    /// Wraps a raw 24.8 value as produced by the library.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw 24.8 representation.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Converts a whole number into fixed point.
    ///
    /// Values outside ±2^23 saturate at `i32::MIN`/`i32::MAX`, like
    /// [`Fixed::from_f64`].
    pub const fn from_int(value: i32) -> Self {
        Self(value.saturating_mul(SCALE))
    }

    /// Converts a double into fixed point, truncating toward zero.
    ///
    /// Values outside the representable range saturate at `i32::MIN`/`i32::MAX`
    /// and `NaN` becomes zero (the semantics of an `as` cast).
    pub fn from_f64(value: f64) -> Self {
        Self((value * f64::from(SCALE)) as i32)
    }

    /// Truncates toward zero to an integer.
    pub const fn to_int(self) -> i32 {
        self.0 / SCALE
    }

    /// Exact conversion to a double.
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / f64::from(SCALE)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

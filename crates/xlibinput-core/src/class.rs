//! Device-class descriptors registered with the X server.
//!
//! # What is a device class? (for beginners)
//!
//! The X server describes an input device as a bundle of *classes*: a key
//! class (keycodes, LEDs), a button class (how many buttons, their labels), a
//! valuator class (axes with ranges and labels) and optionally a touch class
//! (how many simultaneous touches).  A driver registers the classes that match
//! the hardware during `DEVICE_INIT`.
//!
//! The descriptors in this module are plain data.  The driver builds them from
//! the device capabilities and hands them to the sink, which turns them into
//! the server's registration calls.
//!
//! Labels use the server's well-known atom names (`xserver-properties.h`).

use serde::{Deserialize, Serialize};

use crate::posting::AxisMode;
use crate::touch::TOUCH_MAX_SLOTS;

/// Buttons registered on pointer-like classes: three buttons, four scroll buttons.
pub const MAX_BUTTONS: usize = 7;

/// Axes registered on pointer-like classes: x, y, horizontal scroll, vertical scroll.
pub const NUM_AXES: usize = 4;

/// Upper bound of the absolute axes of touch devices.
///
/// libinput has no axis ranges for absolute devices; it scales positions into
/// caller-supplied screen dimensions instead.  The driver declares this fixed
/// range, lets libinput scale into it and leaves the final scaling to the
/// server.
pub const TOUCH_AXIS_MAX: i32 = 0xffff;

/// Valuators carried by each touch event (x and y).
pub const TOUCH_NUM_AXES: usize = 2;

/// Well-known button label atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonLabel {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    HorizWheelLeft,
    HorizWheelRight,
}

impl ButtonLabel {
    /// Atom name as interned by the server.
    pub fn atom_name(self) -> &'static str {
        match self {
            ButtonLabel::Left => "Button Left",
            ButtonLabel::Middle => "Button Middle",
            ButtonLabel::Right => "Button Right",
            ButtonLabel::WheelUp => "Button Wheel Up",
            ButtonLabel::WheelDown => "Button Wheel Down",
            ButtonLabel::HorizWheelLeft => "Button Horiz Wheel Left",
            ButtonLabel::HorizWheelRight => "Button Horiz Wheel Right",
        }
    }
}

/// Well-known axis label atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisLabel {
    RelX,
    RelY,
    RelHorizScroll,
    RelVertScroll,
    AbsX,
    AbsY,
}

impl AxisLabel {
    pub fn atom_name(self) -> &'static str {
        match self {
            AxisLabel::RelX => "Rel X",
            AxisLabel::RelY => "Rel Y",
            AxisLabel::RelHorizScroll => "Rel Horiz Scroll",
            AxisLabel::RelVertScroll => "Rel Vert Scroll",
            AxisLabel::AbsX => "Abs X",
            AxisLabel::AbsY => "Abs Y",
        }
    }
}

/// One valuator axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub index: u8,
    pub label: AxisLabel,
    /// `-1` for both bounds means "unbounded".
    pub min: i32,
    pub max: i32,
    /// Resolution in units per metre; 0 when unknown.
    pub resolution: i32,
    pub mode: AxisMode,
}

/// Direction of a scroll valuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollDirection {
    Horizontal,
    Vertical,
}

/// Marks a valuator as a smooth-scrolling axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollValuator {
    pub index: u8,
    pub direction: ScrollDirection,
    /// Valuator delta that equals one legacy wheel click.
    pub increment: i32,
}

/// Per-device scroll distance: the event-to-unit ratio of the scroll valuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollDistance {
    pub vertical: i32,
    pub horizontal: i32,
}

impl Default for ScrollDistance {
    fn default() -> Self {
        Self {
            vertical: 1,
            horizontal: 1,
        }
    }
}

/// Button + valuator class of a pointer or touch device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerClass {
    /// Identity map, one entry per button plus the unused entry 0.
    pub button_map: [u8; MAX_BUTTONS + 1],
    pub button_labels: [ButtonLabel; MAX_BUTTONS],
    /// Initial labels of the valuator class, before the per-axis setup.
    pub axis_labels: [AxisLabel; NUM_AXES],
    /// Axes initialised individually after the class is registered.
    pub axes: Vec<AxisSpec>,
    pub scroll: Vec<ScrollValuator>,
}

impl PointerClass {
    /// Relative pointer: unbounded x/y plus horizontal and vertical scroll.
    pub fn relative(distance: ScrollDistance) -> Self {
        Self {
            axes: vec![
                AxisSpec {
                    index: 0,
                    label: AxisLabel::RelX,
                    min: -1,
                    max: -1,
                    resolution: 0,
                    mode: AxisMode::Relative,
                },
                AxisSpec {
                    index: 1,
                    label: AxisLabel::RelY,
                    min: -1,
                    max: -1,
                    resolution: 0,
                    mode: AxisMode::Relative,
                },
            ],
            scroll: vec![
                ScrollValuator {
                    index: 2,
                    direction: ScrollDirection::Horizontal,
                    increment: distance.horizontal,
                },
                ScrollValuator {
                    index: 3,
                    direction: ScrollDirection::Vertical,
                    increment: distance.vertical,
                },
            ],
            ..Self::base()
        }
    }

    /// Pointer class of a touchscreen: absolute x/y in `0..=TOUCH_AXIS_MAX`.
    pub fn absolute() -> Self {
        Self {
            axes: vec![
                AxisSpec {
                    index: 0,
                    label: AxisLabel::AbsX,
                    min: 0,
                    max: TOUCH_AXIS_MAX,
                    resolution: 0,
                    mode: AxisMode::Absolute,
                },
                AxisSpec {
                    index: 1,
                    label: AxisLabel::AbsY,
                    min: 0,
                    max: TOUCH_AXIS_MAX,
                    resolution: 0,
                    mode: AxisMode::Absolute,
                },
            ],
            scroll: Vec::new(),
            ..Self::base()
        }
    }

    fn base() -> Self {
        let mut button_map = [0u8; MAX_BUTTONS + 1];
        for (i, entry) in button_map.iter_mut().enumerate() {
            *entry = i as u8;
        }

        Self {
            button_map,
            button_labels: [
                ButtonLabel::Left,
                ButtonLabel::Middle,
                ButtonLabel::Right,
                ButtonLabel::WheelUp,
                ButtonLabel::WheelDown,
                ButtonLabel::HorizWheelLeft,
                ButtonLabel::HorizWheelRight,
            ],
            axis_labels: [
                AxisLabel::RelX,
                AxisLabel::RelY,
                AxisLabel::RelHorizScroll,
                AxisLabel::RelVertScroll,
            ],
            axes: Vec::new(),
            scroll: Vec::new(),
        }
    }

    pub fn num_buttons(&self) -> usize {
        self.button_labels.len()
    }

    pub fn num_axes(&self) -> usize {
        self.axis_labels.len()
    }
}

/// Standard keyboard class. Keymap and LED feedback use the server defaults;
/// LED changes come back through the driver's keyboard control callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardClass;

/// How touches relate to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchMode {
    /// Touchscreen: touches land where they are on screen.
    Direct,
    /// Touchpad: touches drive a pointer.
    Dependent,
}

/// Multi-touch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchClass {
    pub max_touches: usize,
    pub mode: TouchMode,
    pub num_axes: usize,
}

impl Default for TouchClass {
    fn default() -> Self {
        Self {
            max_touches: TOUCH_MAX_SLOTS,
            mode: TouchMode::Direct,
            num_axes: TOUCH_NUM_AXES,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Capability initializers: one device-class setup routine per capability.
//!
//! A libinput device reports any combination of keyboard, pointer and touch
//! capabilities.  Each capability maps to one independent routine; device
//! init simply runs the routine of every capability present, in the fixed
//! order keyboard, pointer, touch.

use tracing::debug;
use xlibinput_core::{
    Capabilities, KeyboardClass, LedMask, LockIndicators, PointerClass, ScrollDistance,
    TouchClass,
};

use super::source::SourceDevice;
use super::translate::{InputSink, SinkError};

/// Which classes device init registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitializedClasses {
    pub keyboard: bool,
    pub pointer: bool,
    pub touch: bool,
}

/// Registers the standard keyboard class.
pub fn init_keyboard(sink: &dyn InputSink) -> Result<(), SinkError> {
    sink.init_keyboard_class(&KeyboardClass)
}

/// Registers the relative pointer class with the binding's scroll distance.
pub fn init_pointer(sink: &dyn InputSink, distance: ScrollDistance) -> Result<(), SinkError> {
    sink.init_pointer_class(&PointerClass::relative(distance))
}

/// Registers the absolute pointer class and the multi-touch class.
pub fn init_touch(sink: &dyn InputSink) -> Result<(), SinkError> {
    sink.init_pointer_class(&PointerClass::absolute())?;
    sink.init_touch_class(&TouchClass::default())
}

/// Runs one initializer per capability flag.
///
/// # Errors
///
/// Stops at the first class the server rejects.
pub fn init_capabilities(
    sink: &dyn InputSink,
    caps: Capabilities,
    distance: ScrollDistance,
) -> Result<InitializedClasses, SinkError> {
    let mut done = InitializedClasses::default();

    if caps.keyboard() {
        init_keyboard(sink)?;
        done.keyboard = true;
    }
    if caps.pointer() {
        init_pointer(sink, distance)?;
        done.pointer = true;
    }
    if caps.touch() {
        init_touch(sink)?;
        done.touch = true;
    }

    debug!(?done, "device classes initialised");
    Ok(done)
}

/// Keyboard feedback callback: forwards the server's lock indicators to the
/// device LEDs.
pub fn update_leds<D: SourceDevice>(device: &D, indicators: LockIndicators) -> LedMask {
    let leds = LedMask::from(indicators);
    device.led_update(leds);
    leds
}

// ── Tests ─────────────────────────────────────────────────────────────────────

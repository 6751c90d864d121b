//! Mock input sink for unit and integration testing.
//!
//! Every call is recorded as a [`SinkCall`] in a `Mutex<Vec<...>>`, in call
//! order, so tests can assert exactly what a device registered and posted.
//!
//! # Usage in tests
//!
//! ```ignore
//! let sink = Arc::new(MockInputSink::new());
//! let mut translator = EventTranslator::new(sink.clone());
//!
//! translator.handle_event(&EventKind::KeyboardKey { key: 30, state: PressState::Pressed });
//!
//! assert_eq!(sink.keys(), vec![(38, true)]);
//! ```
//!
//! # Failing sinks
//!
//! [`MockInputSink::failing`] rejects every class registration, to exercise
//! the init failure path.  Posting calls cannot fail.

use std::sync::Mutex;

use xlibinput_core::{
    AxisMode, KeyboardClass, PointerClass, TouchClass, TouchEventType, TouchId, ValuatorMask,
};

use super::{InputSink, SinkError};

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    KeyboardClass,
    PointerClass(PointerClass),
    TouchClass(TouchClass),
    Motion {
        mode: AxisMode,
        first_valuator: u8,
        values: Vec<i32>,
    },
    Button {
        mode: AxisMode,
        button: u8,
        pressed: bool,
    },
    Key {
        keycode: u32,
        pressed: bool,
    },
    Touch {
        id: TouchId,
        kind: TouchEventType,
        valuators: ValuatorMask,
    },
}

/// A sink that records all calls.
#[derive(Default)]
pub struct MockInputSink {
    calls: Mutex<Vec<SinkCall>>,
    /// When `true`, class registration returns `SinkError::ClassRejected`.
    pub should_fail: bool,
}

impl MockInputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink rejecting every class registration.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// `(first_valuator, values)` of every motion post.
    pub fn motions(&self) -> Vec<(u8, Vec<i32>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Motion {
                    first_valuator,
                    values,
                    ..
                } => Some((first_valuator, values)),
                _ => None,
            })
            .collect()
    }

    /// `(button, pressed)` of every button post.
    pub fn buttons(&self) -> Vec<(u8, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Button {
                    button, pressed, ..
                } => Some((button, pressed)),
                _ => None,
            })
            .collect()
    }

    /// `(keycode, pressed)` of every key post.
    pub fn keys(&self) -> Vec<(u32, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Key { keycode, pressed } => Some((keycode, pressed)),
                _ => None,
            })
            .collect()
    }

    /// `(id, kind, x, y)` of every touch post; unset valuators read as NaN.
    pub fn touches(&self) -> Vec<(TouchId, TouchEventType, f64, f64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Touch {
                    id,
                    kind,
                    valuators,
                } => Some((
                    id,
                    kind,
                    valuators.get(0).unwrap_or(f64::NAN),
                    valuators.get(1).unwrap_or(f64::NAN),
                )),
                _ => None,
            })
            .collect()
    }

    pub fn pointer_classes(&self) -> Vec<PointerClass> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::PointerClass(class) => Some(class),
                _ => None,
            })
            .collect()
    }

    pub fn touch_classes(&self) -> Vec<TouchClass> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::TouchClass(class) => Some(class),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn register(&self, class: &'static str, call: SinkCall) -> Result<(), SinkError> {
        if self.should_fail {
            return Err(SinkError::ClassRejected {
                class,
                reason: "mock failure".into(),
            });
        }
        self.record(call);
        Ok(())
    }
}

impl InputSink for MockInputSink {
    fn init_keyboard_class(&self, _class: &KeyboardClass) -> Result<(), SinkError> {
        self.register("keyboard", SinkCall::KeyboardClass)
    }

    fn init_pointer_class(&self, class: &PointerClass) -> Result<(), SinkError> {
        self.register("pointer", SinkCall::PointerClass(class.clone()))
    }

    fn init_touch_class(&self, class: &TouchClass) -> Result<(), SinkError> {
        self.register("touch", SinkCall::TouchClass(*class))
    }

    fn post_motion(&self, mode: AxisMode, first_valuator: u8, values: &[i32]) {
        self.record(SinkCall::Motion {
            mode,
            first_valuator,
            values: values.to_vec(),
        });
    }

    fn post_button(&self, mode: AxisMode, button: u8, pressed: bool) {
        self.record(SinkCall::Button {
            mode,
            button,
            pressed,
        });
    }

    fn post_key(&self, keycode: u32, pressed: bool) {
        self.record(SinkCall::Key { keycode, pressed });
    }

    fn post_touch(&self, touch_id: TouchId, kind: TouchEventType, valuators: &ValuatorMask) {
        self.record(SinkCall::Touch {
            id: touch_id,
            kind,
            valuators: valuators.clone(),
        });
    }
}

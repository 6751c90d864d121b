//! Event translator: libinput events to X server posting calls.
//!
//! This use case sits at the application layer and delegates every posting
//! call to an [`InputSink`] trait object, the downstream X device.  The
//! server-facing implementations live in the infrastructure layer.
//!
//! # Translation table
//!
//! | Event                    | Posted as                                              |
//! |--------------------------|--------------------------------------------------------|
//! | pointer motion           | relative motion, valuators 0 and 1, truncated deltas    |
//! | pointer button           | button 1/2/3 for left/middle/right, others dropped      |
//! | keyboard key             | key event, keycode + 8                                  |
//! | pointer axis (scroll)    | relative motion on valuator 3 (vertical) or 4 (horiz.)  |
//! | touch down/motion/up     | touch begin/update/end with an emulated touch id        |
//! | anything else            | nothing                                                 |
//!
//! Absolute pointer motion is not translated yet: the pointer class only
//! declares relative axes, and mapping libinput's screen-scaled positions
//! onto them needs a decision the driver has not made.

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;
use xlibinput_core::{
    codes, AxisMode, EventKind, Fixed, KeyboardClass, PointerClass, PressState, ScrollAxis,
    TouchClass, TouchEventType, TouchId, TouchPhase, TouchSlotTable, ValuatorMask,
};

/// Error type for device-class registration.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("server rejected the {class} class: {reason}")]
    ClassRejected { class: &'static str, reason: String },
}

/// The X server side of one input device.
///
/// Registration methods run once during device init; posting methods run
/// from the read callback for every translated event.
pub trait InputSink: Send + Sync {
    /// Registers a standard keyboard class.
    fn init_keyboard_class(&self, class: &KeyboardClass) -> Result<(), SinkError>;

    /// Registers a button + valuator class and initialises its axes.
    fn init_pointer_class(&self, class: &PointerClass) -> Result<(), SinkError>;

    /// Registers a multi-touch class.
    fn init_touch_class(&self, class: &TouchClass) -> Result<(), SinkError>;

    /// Posts `values` on consecutive valuators starting at `first_valuator`.
    fn post_motion(&self, mode: AxisMode, first_valuator: u8, values: &[i32]);

    /// Posts a button press or release without valuator data.
    fn post_button(&self, mode: AxisMode, button: u8, pressed: bool);

    /// Posts a key press or release.
    fn post_key(&self, keycode: u32, pressed: bool);

    /// Posts a touch event.
    fn post_touch(&self, touch_id: TouchId, kind: TouchEventType, valuators: &ValuatorMask);
}

/// Translates the events of one device binding.
pub struct EventTranslator {
    sink: Arc<dyn InputSink>,
    touches: TouchSlotTable,
}

impl EventTranslator {
    /// Creates a translator posting to `sink` with an empty touch slot table.
    pub fn new(sink: Arc<dyn InputSink>) -> Self {
        Self {
            sink,
            touches: TouchSlotTable::new(),
        }
    }

    /// The downstream device.
    pub fn sink(&self) -> &Arc<dyn InputSink> {
        &self.sink
    }

    /// The touch slot table of this binding.
    pub fn touches(&self) -> &TouchSlotTable {
        &self.touches
    }

    /// Translates one event.
    ///
    /// Returns `true` if something was posted, `false` if the event was
    /// ignored or dropped.
    pub fn handle_event(&mut self, event: &EventKind) -> bool {
        match *event {
            EventKind::PointerMotion { dx, dy } => self.handle_motion(dx, dy),
            EventKind::PointerButton { button, state } => self.handle_button(button, state),
            EventKind::KeyboardKey { key, state } => self.handle_key(key, state),
            EventKind::PointerAxis { axis, value } => self.handle_axis(axis, value),
            EventKind::Touch { phase, slot, x, y } => self.handle_touch(phase, slot, x, y),
            EventKind::PointerMotionAbsolute { .. } => false,
            EventKind::None
            | EventKind::DeviceAdded
            | EventKind::DeviceRemoved
            | EventKind::TouchFrame => false,
        }
    }

    fn handle_motion(&self, dx: Fixed, dy: Fixed) -> bool {
        self.sink
            .post_motion(AxisMode::Relative, 0, &[dx.to_int(), dy.to_int()]);
        true
    }

    fn handle_button(&self, button: u32, state: PressState) -> bool {
        let Some(ordinal) = codes::button_ordinal(button) else {
            trace!(button, "dropping unmapped button");
            return false;
        };
        self.sink
            .post_button(AxisMode::Relative, ordinal, state.is_pressed());
        true
    }

    fn handle_key(&self, key: u32, state: PressState) -> bool {
        self.sink.post_key(codes::x_keycode(key), state.is_pressed());
        true
    }

    fn handle_axis(&self, axis: ScrollAxis, value: Fixed) -> bool {
        self.sink.post_motion(
            AxisMode::Relative,
            axis.posting_valuator(),
            &[value.to_int()],
        );
        true
    }

    fn handle_touch(&mut self, phase: TouchPhase, slot: Option<u32>, x: Fixed, y: Fixed) -> bool {
        // Single-touch hardware has no slots; treat it as slot 0.
        let slot = slot.unwrap_or(0);

        let (kind, touch_id) = match phase {
            TouchPhase::Down => (TouchEventType::Begin, self.touches.begin(slot)),
            TouchPhase::Motion => (TouchEventType::Update, self.touches.lookup(slot)),
            TouchPhase::Up => (TouchEventType::End, self.touches.lookup(slot)),
            TouchPhase::Cancel => return false,
        };
        let Some(touch_id) = touch_id else {
            trace!(slot, "dropping touch on out-of-range slot");
            return false;
        };

        let mut mask = ValuatorMask::new(2);
        mask.set_double(0, x.to_f64());
        mask.set_double(1, y.to_f64());

        self.sink.post_touch(touch_id, kind, &mask);
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::input_sink::mock::{MockInputSink, SinkCall};
    use xlibinput_core::codes::{BTN_LEFT, BTN_MIDDLE, BTN_RIGHT, BTN_SIDE};
    use xlibinput_core::touch::TOUCH_MAX_SLOTS;

    fn make_translator() -> (EventTranslator, Arc<MockInputSink>) {
        let sink = Arc::new(MockInputSink::new());
        let translator = EventTranslator::new(Arc::clone(&sink) as Arc<dyn InputSink>);
        (translator, sink)
    }

    fn touch(phase: TouchPhase, slot: u32, x: f64, y: f64) -> EventKind {
        EventKind::Touch {
            phase,
            slot: Some(slot),
            x: Fixed::from_f64(x),
            y: Fixed::from_f64(y),
        }
    }

    // ── Motion ────────────────────────────────────────────────────────────────

    #[test]
    fn test_motion_posts_truncated_relative_deltas() {
        // Arrange
        let (mut tr, sink) = make_translator();
        let event = EventKind::PointerMotion {
            dx: Fixed::from_raw(384),  // 1.5
            dy: Fixed::from_raw(-640), // -2.5
        };

        // Act
        let posted = tr.handle_event(&event);

        // Assert
        assert!(posted);
        assert_eq!(
            sink.calls(),
            vec![SinkCall::Motion {
                mode: AxisMode::Relative,
                first_valuator: 0,
                values: vec![1, -2],
            }]
        );
    }

    #[test]
    fn test_sub_unit_motion_is_not_accumulated() {
        let (mut tr, sink) = make_translator();
        let half = EventKind::PointerMotion {
            dx: Fixed::from_raw(128),
            dy: Fixed::ZERO,
        };

        tr.handle_event(&half);
        tr.handle_event(&half);

        // Two half-pixel moves post two zero deltas, never a 1.
        assert_eq!(sink.motions(), vec![(0, vec![0, 0]), (0, vec![0, 0])]);
    }

    // ── Buttons ───────────────────────────────────────────────────────────────

    #[test]
    fn test_supported_buttons_map_to_ordinals_with_state() {
        let cases = [
            (BTN_LEFT, PressState::Pressed, 1, true),
            (BTN_MIDDLE, PressState::Released, 2, false),
            (BTN_RIGHT, PressState::Pressed, 3, true),
        ];

        for (code, state, ordinal, pressed) in cases {
            // Arrange
            let (mut tr, sink) = make_translator();

            // Act
            tr.handle_event(&EventKind::PointerButton {
                button: code,
                state,
            });

            // Assert
            assert_eq!(
                sink.calls(),
                vec![SinkCall::Button {
                    mode: AxisMode::Relative,
                    button: ordinal,
                    pressed
                }],
                "button code {code:#x}"
            );
        }
    }

    #[test]
    fn test_unsupported_button_posts_nothing() {
        let (mut tr, sink) = make_translator();

        let posted = tr.handle_event(&EventKind::PointerButton {
            button: BTN_SIDE,
            state: PressState::Pressed,
        });

        assert!(!posted);
        assert!(sink.calls().is_empty());
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_key_adds_offset_and_preserves_state() {
        let (mut tr, sink) = make_translator();

        tr.handle_event(&EventKind::KeyboardKey {
            key: 30,
            state: PressState::Pressed,
        });
        tr.handle_event(&EventKind::KeyboardKey {
            key: 30,
            state: PressState::Released,
        });

        assert_eq!(
            sink.calls(),
            vec![
                SinkCall::Key {
                    keycode: 38,
                    pressed: true
                },
                SinkCall::Key {
                    keycode: 38,
                    pressed: false
                },
            ]
        );
    }

    // ── Scroll ────────────────────────────────────────────────────────────────

    #[test]
    fn test_vertical_scroll_posts_on_valuator_three() {
        let (mut tr, sink) = make_translator();

        tr.handle_event(&EventKind::PointerAxis {
            axis: ScrollAxis::Vertical,
            value: Fixed::from_raw(15 * 256 + 200),
        });

        assert_eq!(sink.motions(), vec![(3, vec![15])]);
    }

    #[test]
    fn test_horizontal_scroll_posts_on_valuator_four() {
        let (mut tr, sink) = make_translator();

        tr.handle_event(&EventKind::PointerAxis {
            axis: ScrollAxis::Horizontal,
            value: Fixed::from_raw(-7 * 256 - 10),
        });

        assert_eq!(sink.motions(), vec![(4, vec![-7])]);
    }

    // ── Touch ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_touch_sequence_keeps_one_id() {
        // Arrange
        let (mut tr, sink) = make_translator();

        // Act
        tr.handle_event(&touch(TouchPhase::Down, 2, 100.0, 200.0));
        tr.handle_event(&touch(TouchPhase::Motion, 2, 110.5, 210.25));
        tr.handle_event(&touch(TouchPhase::Up, 2, 0.0, 0.0));

        // Assert
        let touches = sink.touches();
        let kinds: Vec<_> = touches.iter().map(|t| t.1).collect();
        assert_eq!(
            kinds,
            vec![
                TouchEventType::Begin,
                TouchEventType::Update,
                TouchEventType::End
            ]
        );
        assert!(touches.iter().all(|t| t.0 == touches[0].0));
        assert_eq!((touches[1].2, touches[1].3), (110.5, 210.25));
    }

    #[test]
    fn test_touch_ids_increase_per_down() {
        let (mut tr, sink) = make_translator();

        tr.handle_event(&touch(TouchPhase::Down, 0, 1.0, 1.0));
        tr.handle_event(&touch(TouchPhase::Down, 1, 2.0, 2.0));
        tr.handle_event(&touch(TouchPhase::Up, 0, 0.0, 0.0));
        tr.handle_event(&touch(TouchPhase::Down, 0, 3.0, 3.0));

        let ids: Vec<_> = sink.touches().iter().map(|t| t.0).collect();
        assert_eq!(ids, vec![TouchId(0), TouchId(1), TouchId(0), TouchId(2)]);
    }

    #[test]
    fn test_touch_without_slot_uses_slot_zero() {
        let (mut tr, sink) = make_translator();

        tr.handle_event(&EventKind::Touch {
            phase: TouchPhase::Down,
            slot: None,
            x: Fixed::from_int(5),
            y: Fixed::from_int(6),
        });

        assert_eq!(sink.touches().len(), 1);
        assert_eq!(tr.touches().lookup(0), Some(TouchId(0)));
    }

    #[test]
    fn test_touch_on_out_of_range_slot_is_dropped() {
        let (mut tr, sink) = make_translator();

        let posted = tr.handle_event(&touch(TouchPhase::Down, TOUCH_MAX_SLOTS as u32, 1.0, 1.0));

        assert!(!posted);
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_touch_cancel_is_ignored() {
        let (mut tr, sink) = make_translator();
        tr.handle_event(&touch(TouchPhase::Down, 0, 1.0, 1.0));

        let posted = tr.handle_event(&touch(TouchPhase::Cancel, 0, 0.0, 0.0));

        assert!(!posted);
        assert_eq!(sink.touches().len(), 1);
    }

    // ── Ignored kinds ─────────────────────────────────────────────────────────

    #[test]
    fn test_ignored_kinds_post_nothing() {
        let (mut tr, sink) = make_translator();
        let ignored = [
            EventKind::None,
            EventKind::DeviceAdded,
            EventKind::DeviceRemoved,
            EventKind::TouchFrame,
            EventKind::PointerMotionAbsolute {
                x: Fixed::from_int(10),
                y: Fixed::from_int(10),
            },
        ];

        for event in &ignored {
            assert!(!tr.handle_event(event), "{} must be ignored", event.name());
        }
        assert!(sink.calls().is_empty());
    }
}

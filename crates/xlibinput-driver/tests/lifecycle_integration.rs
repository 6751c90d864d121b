//! Integration tests for the device lifecycle and read path.
//!
//! These tests exercise the driver end-to-end through its public API:
//! `Driver` + `MockEventSource` + `MockInputSink` + `DescriptorRegistry`,
//! the way the X server would drive it.

use std::path::PathBuf;
use std::sync::Arc;

use xlibinput_core::{
    Capabilities, EventKind, Fixed, PressState, ScrollAxis, TouchEventType, TouchId, TouchPhase,
};
use xlibinput_driver::application::lifecycle::{DeviceControlMode, Driver, ReadOutcome, Status};
use xlibinput_driver::infrastructure::event_source::mock::MockEventSource;
use xlibinput_driver::infrastructure::host::DescriptorRegistry;
use xlibinput_driver::infrastructure::input_sink::mock::{MockInputSink, SinkCall};
use xlibinput_driver::{BindingId, DriverError, InputOptions};

const TOUCHSCREEN: &str = "/dev/input/event3";
const KEYBOARD_POINTER: &str = "/dev/input/event4";
const SECOND_TOUCHSCREEN: &str = "/dev/input/event5";

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Host {
    source: MockEventSource,
    registry: DescriptorRegistry,
    driver: Driver<MockEventSource>,
}

impl Host {
    fn new(source: MockEventSource) -> Self {
        let registry = DescriptorRegistry::new();
        let driver = Driver::new(source.factory(), Arc::new(registry.clone()));
        Self {
            source,
            registry,
            driver,
        }
    }

    /// pre-init + DEVICE_INIT + DEVICE_ON, asserting success.
    fn bring_up(&mut self, path: &str, sink: &Arc<MockInputSink>) -> BindingId {
        let options = InputOptions::new()
            .with("Identifier", path)
            .with("Device", path);
        let id = self
            .driver
            .pre_init(&options, sink.clone())
            .expect("pre-init must succeed");
        for mode in [DeviceControlMode::Init, DeviceControlMode::On] {
            assert_eq!(self.driver.device_control(id, mode as i32), Status::Success);
        }
        id
    }

    /// DEVICE_OFF + DEVICE_CLOSE + uninit.
    fn tear_down(&mut self, id: BindingId) {
        for mode in [DeviceControlMode::Off, DeviceControlMode::Close] {
            assert_eq!(self.driver.device_control(id, mode as i32), Status::Success);
        }
        self.driver.uninit(id).expect("uninit must succeed");
    }
}

fn touch_caps() -> Capabilities {
    Capabilities::empty().with(Capabilities::TOUCH)
}

fn touch(phase: TouchPhase, slot: u32, x: f64, y: f64) -> EventKind {
    EventKind::Touch {
        phase,
        slot: Some(slot),
        x: Fixed::from_f64(x),
        y: Fixed::from_f64(y),
    }
}

// ── Pre-init failures ─────────────────────────────────────────────────────────

#[test]
fn test_pre_init_of_missing_node_fails_without_leaking_state() {
    // Arrange: no node is openable.
    let mut host = Host::new(MockEventSource::new());
    let options = InputOptions::new().with("Device", TOUCHSCREEN);

    // Act
    let result = host
        .driver
        .pre_init(&options, Arc::new(MockInputSink::new()));

    // Assert
    let err = result.expect_err("pre-init must fail");
    assert!(matches!(err, DriverError::Source(_)));
    assert_eq!(err.status(), Status::BadValue);
    assert!(host.driver.binding_ids().is_empty());
    assert_eq!(host.source.outstanding_handles(), 0);
    assert!(!host.driver.has_context(), "a failed first pre-init must not keep a context");
    assert_eq!(host.source.contexts_destroyed(), 1);
    assert_eq!(host.driver.device_count(), 0);
}

#[test]
fn test_pre_init_without_device_option_fails() {
    let mut host = Host::new(MockEventSource::new().with_node(TOUCHSCREEN, touch_caps()));

    let result = host.driver.pre_init(
        &InputOptions::new().with("Identifier", "nameless"),
        Arc::new(MockInputSink::new()),
    );

    assert!(matches!(result, Err(DriverError::MissingDeviceOption)));
    assert_eq!(host.source.contexts_created(), 0);
}

// ── Init ──────────────────────────────────────────────────────────────────────

#[test]
fn test_keyboard_pointer_device_registers_one_class_per_capability() {
    // Arrange
    let caps = Capabilities::empty().with(Capabilities::KEYBOARD | Capabilities::POINTER);
    let mut host = Host::new(MockEventSource::new().with_node(KEYBOARD_POINTER, caps));
    let sink = Arc::new(MockInputSink::new());
    let options = InputOptions::new().with("Device", KEYBOARD_POINTER);
    let id = host.driver.pre_init(&options, sink.clone()).unwrap();

    // Act
    let status = host
        .driver
        .device_control(id, DeviceControlMode::Init as i32);

    // Assert
    assert_eq!(status, Status::Success);
    let calls = sink.calls();
    assert_eq!(calls.len(), 2, "exactly one initializer per capability");
    assert_eq!(calls[0], SinkCall::KeyboardClass);
    let pointer = &sink.pointer_classes()[0];
    assert_eq!(pointer.num_buttons(), 7);
    assert_eq!(pointer.num_axes(), 4);
    assert!(sink.touch_classes().is_empty());
    assert_eq!(host.source.outstanding_handles(), 0, "init drops the probe handle");
}

// ── Touch ─────────────────────────────────────────────────────────────────────

#[test]
fn test_touch_down_motion_up_posts_one_touch_sequence() {
    // Arrange
    let mut host = Host::new(MockEventSource::new().with_node(TOUCHSCREEN, touch_caps()));
    let sink = Arc::new(MockInputSink::new());
    let id = host.bring_up(TOUCHSCREEN, &sink);
    let classes = sink.calls().len();

    host.source.push_event(TOUCHSCREEN, touch(TouchPhase::Down, 2, 300.0, 400.0));
    host.source.push_event(TOUCHSCREEN, touch(TouchPhase::Motion, 2, 310.0, 405.5));
    host.source.push_event(TOUCHSCREEN, EventKind::TouchFrame);
    host.source.push_event(TOUCHSCREEN, touch(TouchPhase::Up, 2, 0.0, 0.0));

    // Act
    let outcome = host.driver.read_input();

    // Assert
    assert_eq!(
        outcome,
        ReadOutcome::Drained {
            events: 4,
            translated: 3
        }
    );
    let touches = sink.touches();
    assert_eq!(sink.calls().len(), classes + 3);
    assert_eq!(
        touches.iter().map(|t| t.1).collect::<Vec<_>>(),
        vec![
            TouchEventType::Begin,
            TouchEventType::Update,
            TouchEventType::End
        ]
    );
    assert!(touches.iter().all(|t| t.0 == touches[0].0));
    assert_eq!((touches[0].2, touches[0].3), (300.0, 400.0));
    assert_eq!((touches[1].2, touches[1].3), (310.0, 405.5));

    host.tear_down(id);
}

#[test]
fn test_touch_devices_keep_independent_id_sequences() {
    // Arrange
    let source = MockEventSource::new()
        .with_node(TOUCHSCREEN, touch_caps())
        .with_node(SECOND_TOUCHSCREEN, touch_caps());
    let mut host = Host::new(source);
    let (first, second) = (Arc::new(MockInputSink::new()), Arc::new(MockInputSink::new()));
    host.bring_up(TOUCHSCREEN, &first);
    host.bring_up(SECOND_TOUCHSCREEN, &second);

    // Act
    for _ in 0..3 {
        host.source.push_event(TOUCHSCREEN, touch(TouchPhase::Down, 0, 1.0, 1.0));
        host.source.push_event(TOUCHSCREEN, touch(TouchPhase::Up, 0, 0.0, 0.0));
    }
    host.source.push_event(SECOND_TOUCHSCREEN, touch(TouchPhase::Down, 0, 5.0, 5.0));
    host.driver.read_input();

    // Assert
    let begin_ids = |sink: &MockInputSink| -> Vec<TouchId> {
        sink.touches()
            .into_iter()
            .filter(|t| t.1 == TouchEventType::Begin)
            .map(|t| t.0)
            .collect()
    };
    assert_eq!(begin_ids(&first), vec![TouchId(0), TouchId(1), TouchId(2)]);
    assert_eq!(begin_ids(&second), vec![TouchId(0)]);
}

// ── Read path ─────────────────────────────────────────────────────────────────

#[test]
fn test_pointer_and_keyboard_events_are_translated() {
    // Arrange
    let caps = Capabilities::empty().with(Capabilities::KEYBOARD | Capabilities::POINTER);
    let mut host = Host::new(MockEventSource::new().with_node(KEYBOARD_POINTER, caps));
    let sink = Arc::new(MockInputSink::new());
    host.bring_up(KEYBOARD_POINTER, &sink);

    let events = [
        EventKind::PointerMotion {
            dx: Fixed::from_f64(2.75),
            dy: Fixed::from_f64(-1.5),
        },
        EventKind::PointerButton {
            button: 0x110,
            state: PressState::Pressed,
        },
        EventKind::PointerButton {
            button: 0x116,
            state: PressState::Pressed,
        },
        EventKind::PointerAxis {
            axis: ScrollAxis::Vertical,
            value: Fixed::from_f64(15.0),
        },
        EventKind::PointerAxis {
            axis: ScrollAxis::Horizontal,
            value: Fixed::from_f64(-7.9),
        },
        EventKind::KeyboardKey {
            key: 1,
            state: PressState::Released,
        },
    ];
    for event in events {
        host.source.push_event(KEYBOARD_POINTER, event);
    }

    // Act
    let outcome = host.driver.read_input();

    // Assert
    assert_eq!(
        outcome,
        ReadOutcome::Drained {
            events: 6,
            translated: 5
        }
    );
    assert_eq!(
        sink.motions(),
        vec![(0, vec![2, -1]), (3, vec![15]), (4, vec![-7])]
    );
    assert_eq!(sink.buttons(), vec![(1, true)]);
    assert_eq!(sink.keys(), vec![(9, false)]);
}

#[test]
fn test_nothing_is_read_while_dispatch_would_block() {
    use xlibinput_driver::infrastructure::event_source::DispatchError;

    let caps = Capabilities::empty().with(Capabilities::POINTER);
    let mut host = Host::new(MockEventSource::new().with_node(KEYBOARD_POINTER, caps));
    let sink = Arc::new(MockInputSink::new());
    host.bring_up(KEYBOARD_POINTER, &sink);
    let before = sink.calls().len();
    host.source.push_event(
        KEYBOARD_POINTER,
        EventKind::PointerMotion {
            dx: Fixed::from_int(1),
            dy: Fixed::ZERO,
        },
    );
    host.source.push_dispatch_result(Err(DispatchError::WouldBlock));

    assert_eq!(host.driver.read_input(), ReadOutcome::WouldBlock);
    assert_eq!(sink.calls().len(), before);

    // The next wake-up reads the queued event.
    assert_eq!(
        host.driver.read_input(),
        ReadOutcome::Drained {
            events: 1,
            translated: 1
        }
    );
}

// ── Context lifecycle ─────────────────────────────────────────────────────────

#[test]
fn test_context_is_shared_and_released_with_the_last_device() {
    // Arrange
    let source = MockEventSource::new()
        .with_node(TOUCHSCREEN, touch_caps())
        .with_node(SECOND_TOUCHSCREEN, touch_caps());
    let mut host = Host::new(source);
    let a = host.bring_up(TOUCHSCREEN, &Arc::new(MockInputSink::new()));
    let b = host.bring_up(SECOND_TOUCHSCREEN, &Arc::new(MockInputSink::new()));
    let fd = host.driver.descriptor().expect("context must exist");

    // Assert: one context, one descriptor registered twice.
    assert_eq!(host.source.contexts_created(), 1);
    assert_eq!(host.registry.descriptors(), vec![fd]);
    assert_eq!(host.registry.registrations(fd), 2);

    // Act / Assert: first teardown keeps the context.
    host.tear_down(a);
    assert!(host.driver.has_context());
    assert_eq!(host.registry.registrations(fd), 1);
    assert_eq!(host.source.added_paths(), vec![PathBuf::from(SECOND_TOUCHSCREEN)]);

    // Act / Assert: last teardown releases everything.
    host.tear_down(b);
    assert!(!host.driver.has_context());
    assert!(host.registry.is_empty());
    assert_eq!(host.source.contexts_destroyed(), 1);
    assert_eq!(host.source.outstanding_handles(), 0);
    assert_eq!(host.driver.read_input(), ReadOutcome::Idle);
}

#[test]
fn test_device_can_be_turned_off_and_on_again() {
    let mut host = Host::new(MockEventSource::new().with_node(TOUCHSCREEN, touch_caps()));
    let sink = Arc::new(MockInputSink::new());
    let id = host.bring_up(TOUCHSCREEN, &sink);

    assert_eq!(host.driver.device_control(id, DeviceControlMode::Off as i32), Status::Success);
    assert!(host.source.added_paths().is_empty());
    assert!(host.registry.is_empty());

    assert_eq!(host.driver.device_control(id, DeviceControlMode::On as i32), Status::Success);
    host.source.push_event(TOUCHSCREEN, touch(TouchPhase::Down, 0, 1.0, 1.0));
    host.driver.read_input();

    assert_eq!(sink.touches().len(), 1);
}

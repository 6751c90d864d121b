//! libinput-backed event source (crate `input`).
//!
//! # How libinput is used here (for beginners)
//!
//! libinput normally discovers devices through udev.  An X driver is told the
//! device node by the server instead, so this adapter uses the *path*
//! backend: `Libinput::new_from_path` creates an empty context and
//! `path_add_device` adds one node at a time.
//!
//! libinput never opens files itself.  It calls back into
//! [`RestrictedInterface::open_restricted`], which lets the host decide how
//! device nodes are opened (the X server would go through systemd-logind).
//! Here it is a plain `open(2)` with the flags libinput asks for.
//!
//! # Events
//!
//! libinput reports fractional deltas and positions; they are narrowed to
//! 24.8 fixed point on the way out.  Touch positions are transformed into a
//! `TOUCH_AXIS_MAX`-sized square, matching the range the touch class
//! declares.  A legacy axis event that carries both scroll axes becomes two
//! [`EventKind::PointerAxis`] events, vertical first.

use std::collections::{HashMap, VecDeque};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, OwnedFd, RawFd};
use std::path::Path;

use input::event::keyboard::{KeyState, KeyboardEvent, KeyboardEventTrait};
use input::event::pointer::{Axis, ButtonState, PointerEvent};
use input::event::touch::{TouchEvent, TouchEventPosition, TouchEventSlot};
use input::event::{DeviceEvent, EventTrait};
use input::{Device, DeviceCapability, Event, Led, Libinput, LibinputInterface};
use tracing::{debug, trace};
use xlibinput_core::class::TOUCH_AXIS_MAX;
use xlibinput_core::{
    Capabilities, EventKind, Fixed, LedMask, PressState, ScrollAxis, TouchPhase,
};

use crate::application::source::{
    BindingId, DispatchError, EventSource, SourceDevice, SourceError, SourceEvent,
};

/// Opens device nodes on libinput's behalf.
pub struct RestrictedInterface;

impl LibinputInterface for RestrictedInterface {
    fn open_restricted(&mut self, path: &Path, flags: i32) -> Result<OwnedFd, i32> {
        let access = flags & libc::O_ACCMODE;
        OpenOptions::new()
            .custom_flags(flags)
            .read(access == libc::O_RDONLY || access == libc::O_RDWR)
            .write(access == libc::O_WRONLY || access == libc::O_RDWR)
            .open(path)
            .map(OwnedFd::from)
            .map_err(|err| {
                let errno = err.raw_os_error().unwrap_or(libc::EIO);
                debug!(path = %path.display(), errno, "open_restricted failed");
                errno
            })
    }

    fn close_restricted(&mut self, fd: OwnedFd) {
        drop(File::from(fd));
    }
}

/// A libinput device reference.
#[derive(Clone)]
pub struct LibinputDevice(Device);

impl LibinputDevice {
    pub fn sysname(&self) -> &str {
        self.0.sysname()
    }
}

impl SourceDevice for LibinputDevice {
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        if self.0.has_capability(DeviceCapability::Keyboard) {
            caps = caps.with(Capabilities::KEYBOARD);
        }
        if self.0.has_capability(DeviceCapability::Pointer) {
            caps = caps.with(Capabilities::POINTER);
        }
        if self.0.has_capability(DeviceCapability::Touch) {
            caps = caps.with(Capabilities::TOUCH);
        }
        caps
    }

    fn led_update(&self, leds: LedMask) {
        let mut device = self.0.clone();
        device.led_update(Led::from_bits_truncate(leds.bits()));
    }
}

/// Path-backend libinput context.
pub struct LibinputSource {
    context: Libinput,
    /// Binding ids per device object, standing in for libinput user data.
    /// Two handles for the same node are distinct keys.
    bindings: HashMap<Device, BindingId>,
    /// Converted events not yet handed out.
    queued: VecDeque<SourceEvent>,
}

impl LibinputSource {
    /// Creates a path-backend context.
    pub fn new() -> Result<Self, SourceError> {
        let context = Libinput::new_from_path(RestrictedInterface);
        debug!("libinput path context created");
        Ok(Self {
            context,
            bindings: HashMap::new(),
            queued: VecDeque::new(),
        })
    }

    fn convert(&mut self, event: Event) {
        let binding = match &event {
            Event::Device(e) => self.binding_of(&e.device()),
            Event::Keyboard(e) => self.binding_of(&e.device()),
            Event::Pointer(e) => self.binding_of(&e.device()),
            Event::Touch(e) => self.binding_of(&e.device()),
            _ => None,
        };

        for kind in event_kinds(event) {
            self.queued.push_back(SourceEvent { binding, kind });
        }
    }

    fn binding_of(&self, device: &Device) -> Option<BindingId> {
        self.bindings.get(device).copied()
    }
}

impl EventSource for LibinputSource {
    type Device = LibinputDevice;

    fn add_device(&mut self, path: &Path) -> Result<LibinputDevice, SourceError> {
        let unavailable = || SourceError::DeviceUnavailable(path.display().to_string());
        let path_str = path.to_str().ok_or_else(unavailable)?;
        let device = self.context.path_add_device(path_str).ok_or_else(unavailable)?;
        trace!(path = path_str, sysname = device.sysname(), "device added");
        Ok(LibinputDevice(device))
    }

    fn remove_device(&mut self, device: &LibinputDevice) {
        self.bindings.remove(&device.0);
        self.context.path_remove_device(device.0.clone());
    }

    fn set_user_data(&mut self, device: &LibinputDevice, binding: BindingId) {
        self.bindings.insert(device.0.clone(), binding);
    }

    fn fd(&self) -> RawFd {
        self.context.as_raw_fd()
    }

    fn dispatch(&mut self) -> Result<(), DispatchError> {
        self.context.dispatch().map_err(|err| {
            if err.kind() == std::io::ErrorKind::WouldBlock {
                DispatchError::WouldBlock
            } else {
                DispatchError::Failed(err.raw_os_error().unwrap_or(libc::EIO))
            }
        })
    }

    fn next_event(&mut self) -> Option<SourceEvent> {
        loop {
            if let Some(event) = self.queued.pop_front() {
                return Some(event);
            }
            let event = self.context.next()?;
            self.convert(event);
        }
    }
}

fn press_state(pressed: bool) -> PressState {
    if pressed {
        PressState::Pressed
    } else {
        PressState::Released
    }
}

/// Converts one libinput event; the event object is released on return.
#[allow(deprecated)]
fn event_kinds(event: Event) -> Vec<EventKind> {
    match event {
        Event::Device(DeviceEvent::Added(_)) => vec![EventKind::DeviceAdded],
        Event::Device(DeviceEvent::Removed(_)) => vec![EventKind::DeviceRemoved],
        Event::Keyboard(KeyboardEvent::Key(e)) => vec![EventKind::KeyboardKey {
            key: e.key(),
            state: press_state(e.key_state() == KeyState::Pressed),
        }],
        Event::Pointer(PointerEvent::Motion(e)) => vec![EventKind::PointerMotion {
            dx: Fixed::from_f64(e.dx()),
            dy: Fixed::from_f64(e.dy()),
        }],
        Event::Pointer(PointerEvent::MotionAbsolute(e)) => {
            let extent = TOUCH_AXIS_MAX as u32;
            vec![EventKind::PointerMotionAbsolute {
                x: Fixed::from_f64(e.absolute_x_transformed(extent)),
                y: Fixed::from_f64(e.absolute_y_transformed(extent)),
            }]
        }
        Event::Pointer(PointerEvent::Button(e)) => vec![EventKind::PointerButton {
            button: e.button(),
            state: press_state(e.button_state() == ButtonState::Pressed),
        }],
        Event::Pointer(PointerEvent::Axis(e)) => [
            (Axis::Vertical, ScrollAxis::Vertical),
            (Axis::Horizontal, ScrollAxis::Horizontal),
        ]
        .into_iter()
        .filter(|(axis, _)| e.has_axis(*axis))
        .map(|(axis, scroll)| EventKind::PointerAxis {
            axis: scroll,
            value: Fixed::from_f64(e.axis_value(axis)),
        })
        .collect(),
        Event::Touch(TouchEvent::Down(e)) => vec![touch(
            TouchPhase::Down,
            e.slot(),
            e.x_transformed(TOUCH_AXIS_MAX as u32),
            e.y_transformed(TOUCH_AXIS_MAX as u32),
        )],
        Event::Touch(TouchEvent::Motion(e)) => vec![touch(
            TouchPhase::Motion,
            e.slot(),
            e.x_transformed(TOUCH_AXIS_MAX as u32),
            e.y_transformed(TOUCH_AXIS_MAX as u32),
        )],
        // Up events carry no position.
        Event::Touch(TouchEvent::Up(e)) => vec![touch(TouchPhase::Up, e.slot(), 0.0, 0.0)],
        Event::Touch(TouchEvent::Cancel(e)) => {
            vec![touch(TouchPhase::Cancel, e.slot(), 0.0, 0.0)]
        }
        Event::Touch(TouchEvent::Frame(_)) => vec![EventKind::TouchFrame],
        // Scroll-source events, gestures, tablets and switches.
        _ => vec![EventKind::None],
    }
}

fn touch(phase: TouchPhase, slot: Option<u32>, x: f64, y: f64) -> EventKind {
    EventKind::Touch {
        phase,
        slot,
        x: Fixed::from_f64(x),
        y: Fixed::from_f64(y),
    }
}

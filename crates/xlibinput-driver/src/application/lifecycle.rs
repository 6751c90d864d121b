//! Device lifecycle manager: the driver's pre-init, device-control, uninit
//! and read entry points.
//!
//! # How the X server drives an input driver (for beginners)
//!
//! An X input driver never runs on its own.  The server calls into it at
//! well-defined points:
//!
//! ```text
//!   pre-init ──> init ──> on ──(read, read, ...)──> off ──> close ──> uninit
//!                          ^                         |
//!                          └──────── (VT switch) ────┘
//! ```
//!
//! 1. **pre-init**: the server found an `InputDevice` (from `xorg.conf` or
//!    hotplug) and hands over its options.  The driver checks that the device
//!    node exists and is usable.
//! 2. **init** (`DEVICE_INIT`): the driver tells the server what the device
//!    is: a keyboard, a pointer with N buttons and M axes, a touchscreen.
//! 3. **on** (`DEVICE_ON`): start delivering events.  The driver gives the
//!    server a file descriptor to poll; when it becomes readable the server
//!    calls the driver's read callback.
//! 4. **off** (`DEVICE_OFF`): stop delivering events (VT switch, shutdown).
//! 5. **close** and **uninit**: forget the device.
//!
//! # One library context, many devices
//!
//! All devices of this driver share one libinput context and therefore one
//! pollable descriptor.  The context is created by the first pre-init and
//! destroyed by the last uninit; each event carries the binding id the
//! driver attached to its device, which is how the read callback finds the
//! right binding.
//!
//! # Handle ownership
//!
//! | Phase        | Reference held by the binding           |
//! |--------------|-----------------------------------------|
//! | after pre-init | probe handle (device removed from context) |
//! | after init   | none                                    |
//! | after on     | live handle (device added to context)   |
//! | after off    | none                                    |

use std::collections::BTreeMap;
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, trace, warn};
use xlibinput_core::{LedMask, LockIndicators, ScrollDistance};

use super::initializers::{self, InitializedClasses};
use super::options::InputOptions;
use super::source::{BindingId, DispatchError, EventSource, SourceDevice, SourceError};
use super::translate::{EventTranslator, InputSink, SinkError};

/// Name the driver registers under.
pub const DRIVER_NAME: &str = "libinput";

/// Driver version reported to the server.
pub const DRIVER_VERSION: u32 = 1;

/// Device type name set at pre-init.
pub const DEVICE_TYPE_NAME: &str = "TOUCHPAD";

/// Status code returned to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    BadValue = 2,
}

impl Status {
    /// Raw protocol value.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Mode argument of the device-control callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceControlMode {
    Init = 0,
    On = 1,
    Off = 2,
    Close = 3,
}

impl TryFrom<i32> for DeviceControlMode {
    type Error = DriverError;

    fn try_from(mode: i32) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Init),
            1 => Ok(Self::On),
            2 => Ok(Self::Off),
            3 => Ok(Self::Close),
            other => Err(DriverError::UnknownControlMode(other)),
        }
    }
}

/// Error type for lifecycle operations.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no device path specified")]
    MissingDeviceOption,
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("unknown device binding {0}")]
    UnknownBinding(BindingId),
    #[error("{0} holds no device handle")]
    NoDeviceHandle(BindingId),
    #[error("no library context is open")]
    NoContext,
    #[error("unknown device control mode {0}")]
    UnknownControlMode(i32),
}

impl DriverError {
    /// Status reported to the server.  Every failure is a `BadValue`.
    pub fn status(&self) -> Status {
        Status::BadValue
    }
}

/// Outcome of one read callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// No library context exists.
    Idle,
    /// Dispatch had nothing to read.
    WouldBlock,
    /// Dispatch failed with this errno; the cycle was abandoned.
    Failed(i32),
    /// Every ready event was drained.
    Drained { events: usize, translated: usize },
}

/// The server's event loop as seen by the driver.
#[cfg_attr(test, mockall::automock)]
pub trait HostEventLoop: Send + Sync {
    /// Starts polling `fd`; readiness triggers the read callback.
    fn add_enabled_descriptor(&self, fd: RawFd);

    /// Stops polling `fd`.
    fn remove_enabled_descriptor(&self, fd: RawFd);
}

/// Sub-pixel remainders of scroll and motion scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Remainders {
    pub scroll_vertical: i32,
    pub scroll_horizontal: i32,
    pub x: f64,
    pub y: f64,
}

/// One configured input device.
pub struct DeviceBinding<D> {
    identifier: String,
    path: PathBuf,
    device: Option<D>,
    translator: EventTranslator,
    pub scroll: ScrollDistance,
    pub remainders: Remainders,
    fd: Option<RawFd>,
    enabled: bool,
    classes: InitializedClasses,
}

impl<D> DeviceBinding<D> {
    fn new(identifier: String, path: PathBuf, probe: D, sink: Arc<dyn InputSink>) -> Self {
        Self {
            identifier,
            path,
            device: Some(probe),
            translator: EventTranslator::new(sink),
            scroll: ScrollDistance::default(),
            remainders: Remainders::default(),
            fd: None,
            enabled: false,
            classes: InitializedClasses::default(),
        }
    }

    /// Display name: the `Identifier` option, or the path.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Device type reported to the server.
    pub fn type_name(&self) -> &'static str {
        DEVICE_TYPE_NAME
    }

    /// The handle the binding currently holds, if any.
    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    /// Descriptor registered with the event loop while the device is on.
    pub fn fd(&self) -> Option<RawFd> {
        self.fd
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Classes registered by the last init.
    pub fn classes(&self) -> InitializedClasses {
        self.classes
    }

    pub fn translator(&self) -> &EventTranslator {
        &self.translator
    }
}

/// The shared library context and its live-device counter.
pub struct DriverContext<S> {
    source: S,
    device_count: usize,
}

impl<S: EventSource> DriverContext<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            device_count: 0,
        }
    }
}

type SourceFactory<S> = Box<dyn FnMut() -> Result<S, SourceError>>;

/// The driver: owns the library context and every device binding.
pub struct Driver<S: EventSource> {
    factory: SourceFactory<S>,
    context: Option<DriverContext<S>>,
    bindings: BTreeMap<BindingId, DeviceBinding<S::Device>>,
    next_binding: u32,
    event_loop: Arc<dyn HostEventLoop>,
}

impl<S: EventSource> Driver<S> {
    /// Creates a driver.  `factory` opens a new library context; it runs on
    /// the first pre-init and again after the last uninit tore the context
    /// down.
    pub fn new(
        factory: impl FnMut() -> Result<S, SourceError> + 'static,
        event_loop: Arc<dyn HostEventLoop>,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            context: None,
            bindings: BTreeMap::new(),
            next_binding: 0,
            event_loop,
        }
    }

    // ── Driver hooks ─────────────────────────────────────────────────────────

    /// Pre-init: validates the options, probes the device node and creates
    /// the binding.
    ///
    /// # Errors
    ///
    /// - [`DriverError::MissingDeviceOption`] if no `Device` option is set.
    /// - [`DriverError::Source`] if the context cannot be created or the node
    ///   cannot be added.  A context created by this call is torn down again
    ///   unless other devices use it.
    pub fn pre_init(
        &mut self,
        options: &InputOptions,
        sink: Arc<dyn InputSink>,
    ) -> Result<BindingId, DriverError> {
        let Some(path) = options.device() else {
            error!("no device specified");
            return Err(DriverError::MissingDeviceOption);
        };
        let identifier = options.identifier().unwrap_or(path).to_string();

        let mut context = match self.context.take() {
            Some(context) => context,
            None => {
                let source = (self.factory)().map_err(|e| {
                    error!(device = %identifier, "failed to create a context: {e}");
                    e
                })?;
                debug!("library context created");
                DriverContext::new(source)
            }
        };

        // Probe: add, keep the handle, remove again until the device is on.
        let probe = match context.source.add_device(Path::new(path)) {
            Ok(device) => device,
            Err(e) => {
                error!(device = %identifier, path, "failed to create a device: {e}");
                if context.device_count > 0 {
                    self.context = Some(context);
                } else {
                    debug!("library context released");
                }
                return Err(e.into());
            }
        };
        context.source.remove_device(&probe);
        context.device_count += 1;
        self.context = Some(context);

        let id = BindingId(self.next_binding);
        self.next_binding += 1;
        self.bindings.insert(
            id,
            DeviceBinding::new(identifier.clone(), PathBuf::from(path), probe, sink),
        );

        info!(%id, device = %identifier, path, type_name = DEVICE_TYPE_NAME, "device pre-initialised");
        Ok(id)
    }

    /// Uninit: frees the binding; the last uninit tears down the context.
    pub fn uninit(&mut self, id: BindingId) -> Result<(), DriverError> {
        if self.bindings.get(&id).is_some_and(|b| b.enabled) {
            warn!(%id, "uninit of an enabled device, turning it off first");
            self.off(id)?;
        }
        let binding = self
            .bindings
            .remove(&id)
            .ok_or(DriverError::UnknownBinding(id))?;
        drop(binding);

        if let Some(context) = self.context.as_mut() {
            context.device_count = context.device_count.saturating_sub(1);
            if context.device_count == 0 {
                self.context = None;
                debug!("last device gone, library context released");
            }
        }
        info!(%id, "device uninitialised");
        Ok(())
    }

    // ── Device control ───────────────────────────────────────────────────────

    /// The server's device-control callback.
    pub fn device_control(&mut self, id: BindingId, mode: i32) -> Status {
        let result = DeviceControlMode::try_from(mode).and_then(|mode| match mode {
            DeviceControlMode::Init => self.init(id).map(|_| ()),
            DeviceControlMode::On => self.on(id),
            DeviceControlMode::Off => self.off(id),
            DeviceControlMode::Close => self.close(id),
        });

        match result {
            Ok(()) => Status::Success,
            Err(e) => {
                error!(%id, mode, "device control failed: {e}");
                e.status()
            }
        }
    }

    /// `DEVICE_INIT`: registers one class per capability and releases the
    /// probe handle.
    pub fn init(&mut self, id: BindingId) -> Result<InitializedClasses, DriverError> {
        let binding = self
            .bindings
            .get_mut(&id)
            .ok_or(DriverError::UnknownBinding(id))?;
        binding.enabled = false;

        let probe = binding
            .device
            .take()
            .ok_or(DriverError::NoDeviceHandle(id))?;
        let caps = probe.capabilities();
        let classes =
            initializers::init_capabilities(binding.translator.sink().as_ref(), caps, binding.scroll)?;
        binding.classes = classes;
        drop(probe);

        debug!(%id, ?caps, "device initialised");
        Ok(classes)
    }

    /// `DEVICE_ON`: re-adds the device and starts polling the shared
    /// descriptor.
    pub fn on(&mut self, id: BindingId) -> Result<(), DriverError> {
        let binding = self
            .bindings
            .get_mut(&id)
            .ok_or(DriverError::UnknownBinding(id))?;
        if binding.enabled {
            debug!(%id, "device already on");
            return Ok(());
        }
        let context = self.context.as_mut().ok_or(DriverError::NoContext)?;

        let device = context.source.add_device(&binding.path)?;
        context.source.set_user_data(&device, id);
        let fd = context.source.fd();
        self.event_loop.add_enabled_descriptor(fd);

        binding.device = Some(device);
        binding.fd = Some(fd);
        binding.enabled = true;
        info!(%id, device = %binding.identifier, fd, "device on");
        Ok(())
    }

    /// `DEVICE_OFF`: stops polling, removes the device and releases the
    /// live handle.
    pub fn off(&mut self, id: BindingId) -> Result<(), DriverError> {
        let binding = self
            .bindings
            .get_mut(&id)
            .ok_or(DriverError::UnknownBinding(id))?;

        if let Some(fd) = binding.fd.take() {
            self.event_loop.remove_enabled_descriptor(fd);
        }
        binding.enabled = false;

        if let Some(device) = binding.device.take() {
            if let Some(context) = self.context.as_mut() {
                context.source.remove_device(&device);
            }
        }
        info!(%id, device = %binding.identifier, "device off");
        Ok(())
    }

    /// `DEVICE_CLOSE`: nothing to release per device.
    pub fn close(&mut self, id: BindingId) -> Result<(), DriverError> {
        if !self.bindings.contains_key(&id) {
            return Err(DriverError::UnknownBinding(id));
        }
        debug!(%id, "device closed");
        Ok(())
    }

    // ── Feedback callbacks ───────────────────────────────────────────────────

    /// Keyboard control callback: pushes the lock indicators to the LEDs.
    ///
    /// # Errors
    ///
    /// [`DriverError::NoDeviceHandle`] when the device is off.
    pub fn keyboard_control(
        &self,
        id: BindingId,
        indicators: LockIndicators,
    ) -> Result<LedMask, DriverError> {
        let binding = self
            .bindings
            .get(&id)
            .ok_or(DriverError::UnknownBinding(id))?;
        let device = binding
            .device
            .as_ref()
            .ok_or(DriverError::NoDeviceHandle(id))?;
        let leds = initializers::update_leds(device, indicators);
        trace!(%id, leds = leds.bits(), "leds updated");
        Ok(leds)
    }

    /// Pointer control callback: pointer acceleration is left to libinput.
    pub fn pointer_control(&self, _id: BindingId) {}

    // ── Read callback ────────────────────────────────────────────────────────

    /// The read callback: dispatches once and drains every ready event.
    pub fn read_input(&mut self) -> ReadOutcome {
        let Some(context) = self.context.as_mut() else {
            return ReadOutcome::Idle;
        };

        match context.source.dispatch() {
            Ok(()) => {}
            Err(DispatchError::WouldBlock) => return ReadOutcome::WouldBlock,
            Err(DispatchError::Failed(errno)) => {
                error!(errno, "libinput: read error");
                return ReadOutcome::Failed(errno);
            }
        }

        let mut events = 0;
        let mut translated = 0;
        while let Some(event) = context.source.next_event() {
            events += 1;
            let binding = event.binding.and_then(|id| self.bindings.get_mut(&id));
            let Some(binding) = binding else {
                trace!(kind = event.kind.name(), "event without a binding dropped");
                continue;
            };
            if binding.translator.handle_event(&event.kind) {
                translated += 1;
            }
        }

        ReadOutcome::Drained { events, translated }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn binding(&self, id: BindingId) -> Option<&DeviceBinding<S::Device>> {
        self.bindings.get(&id)
    }

    pub fn binding_mut(&mut self, id: BindingId) -> Option<&mut DeviceBinding<S::Device>> {
        self.bindings.get_mut(&id)
    }

    /// Ids of every binding, in creation order.
    pub fn binding_ids(&self) -> Vec<BindingId> {
        self.bindings.keys().copied().collect()
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Live device count of the context; 0 without a context.
    pub fn device_count(&self) -> usize {
        self.context.as_ref().map_or(0, |c| c.device_count)
    }

    /// The shared pollable descriptor, if a context exists.
    pub fn descriptor(&self) -> Option<RawFd> {
        self.context.as_ref().map(|c| c.source.fd())
    }

    pub fn source(&self) -> Option<&S> {
        self.context.as_ref().map(|c| &c.source)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

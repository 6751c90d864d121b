//! Scripted event source for unit and integration tests.
//!
//! # Why a mock source?
//!
//! The real [`LibinputSource`](super::libinput) needs readable `/dev/input`
//! nodes and the system libinput.  Lifecycle tests also need to observe what
//! the driver cannot: how many device handles are alive, which devices are
//! added to the context, how often a context was created.
//!
//! # Usage in tests
//!
//! ```ignore
//! let source = MockEventSource::new()
//!     .with_node("/dev/input/event3", Capabilities::empty().with(Capabilities::TOUCH));
//! let mut driver = Driver::new(source.factory(), host);
//!
//! let id = driver.pre_init(&options, sink)?;
//! assert_eq!(source.outstanding_handles(), 1);
//!
//! source.push_event("/dev/input/event3", EventKind::TouchFrame);
//! driver.read_input();
//! ```
//!
//! `new()` builds a *template* that never acts as a context itself.  Every
//! call of the closure returned by [`MockEventSource::factory`] creates a new
//! context sharing the template's state, the way every `libinput_path_create_context`
//! call talks to the same kernel devices.  Dropping a context removes all its
//! devices.

use std::collections::{HashMap, VecDeque};
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use xlibinput_core::{Capabilities, EventKind, LedMask};

use crate::application::source::{
    BindingId, DispatchError, EventSource, SourceDevice, SourceError, SourceEvent,
};

/// First descriptor handed out to a mock context.
const FIRST_MOCK_FD: RawFd = 40;

#[derive(Debug)]
struct MockDeviceInner {
    path: PathBuf,
    caps: Capabilities,
    user_data: Mutex<Option<BindingId>>,
    leds: Mutex<Vec<LedMask>>,
}

/// A mock device handle; clones share one device, like libinput refs.
#[derive(Debug, Clone)]
pub struct MockDevice {
    inner: Arc<MockDeviceInner>,
}

impl MockDevice {
    /// A standalone device not attached to any source.
    pub fn new(caps: Capabilities) -> Self {
        Self::at(Path::new("/dev/input/mock"), caps)
    }

    fn at(path: &Path, caps: Capabilities) -> Self {
        Self {
            inner: Arc::new(MockDeviceInner {
                path: path.to_path_buf(),
                caps,
                user_data: Mutex::new(None),
                leds: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Every LED mask pushed to this device, oldest first.
    pub fn led_history(&self) -> Vec<LedMask> {
        self.inner.leds.lock().unwrap().clone()
    }

    pub fn user_data(&self) -> Option<BindingId> {
        *self.inner.user_data.lock().unwrap()
    }

    fn same_device(&self, other: &MockDevice) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl SourceDevice for MockDevice {
    fn capabilities(&self) -> Capabilities {
        self.inner.caps
    }

    fn led_update(&self, leds: LedMask) {
        self.inner.leds.lock().unwrap().push(leds);
    }
}

#[derive(Default)]
struct MockSourceState {
    /// Openable nodes and their capabilities.
    nodes: HashMap<PathBuf, Capabilities>,
    /// Devices currently added to a context; the context holds one ref each.
    added: Vec<MockDevice>,
    /// Every device ever created, to count leaked handles.
    created: Vec<Weak<MockDeviceInner>>,
    pending: VecDeque<(PathBuf, EventKind)>,
    ready: VecDeque<(PathBuf, EventKind)>,
    dispatch_results: VecDeque<Result<(), DispatchError>>,
    fail_context_creation: bool,
    contexts_created: usize,
    contexts_destroyed: usize,
    next_fd: RawFd,
}

/// Scripted [`EventSource`].
pub struct MockEventSource {
    state: Arc<Mutex<MockSourceState>>,
    /// `Some` for contexts made by the factory, `None` for the template.
    fd: Option<RawFd>,
}

impl Default for MockEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEventSource {
    /// Creates a template with no openable nodes.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockSourceState {
                next_fd: FIRST_MOCK_FD,
                ..MockSourceState::default()
            })),
            fd: None,
        }
    }

    /// Makes `path` openable as a device with `caps`.
    pub fn with_node(self, path: impl Into<PathBuf>, caps: Capabilities) -> Self {
        self.state.lock().unwrap().nodes.insert(path.into(), caps);
        self
    }

    /// Returns a context factory for [`Driver::new`](crate::application::lifecycle::Driver::new).
    pub fn factory(&self) -> impl FnMut() -> Result<MockEventSource, SourceError> + 'static {
        let state = Arc::clone(&self.state);
        move || {
            let mut guard = state.lock().unwrap();
            if guard.fail_context_creation {
                return Err(SourceError::ContextCreation("mock failure".into()));
            }
            guard.contexts_created += 1;
            let fd = guard.next_fd;
            guard.next_fd += 1;
            drop(guard);
            Ok(MockEventSource {
                state: Arc::clone(&state),
                fd: Some(fd),
            })
        }
    }

    /// Makes every later context creation fail.
    pub fn fail_context_creation(&self) {
        self.state.lock().unwrap().fail_context_creation = true;
    }

    /// Queues an event from the device at `path`; it becomes readable after
    /// the next successful dispatch.
    pub fn push_event(&self, path: impl Into<PathBuf>, kind: EventKind) {
        self.state
            .lock()
            .unwrap()
            .pending
            .push_back((path.into(), kind));
    }

    /// Scripts the result of one future dispatch.  Unscripted dispatches succeed.
    pub fn push_dispatch_result(&self, result: Result<(), DispatchError>) {
        self.state.lock().unwrap().dispatch_results.push_back(result);
    }

    pub fn contexts_created(&self) -> usize {
        self.state.lock().unwrap().contexts_created
    }

    pub fn contexts_destroyed(&self) -> usize {
        self.state.lock().unwrap().contexts_destroyed
    }

    /// Descriptor the next created context will report.
    pub fn next_fd(&self) -> RawFd {
        self.state.lock().unwrap().next_fd
    }

    /// Paths of the devices currently added to a context.
    pub fn added_paths(&self) -> Vec<PathBuf> {
        let state = self.state.lock().unwrap();
        state.added.iter().map(|d| d.path().to_path_buf()).collect()
    }

    /// Number of devices referenced from outside the context.
    pub fn outstanding_handles(&self) -> usize {
        let state = self.state.lock().unwrap();
        state
            .created
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|inner| {
                let in_context = state
                    .added
                    .iter()
                    .any(|d| Arc::ptr_eq(&d.inner, inner)) as usize;
                // One strong count is the upgrade itself.
                Arc::strong_count(inner) - 1 - in_context > 0
            })
            .count()
    }
}

impl EventSource for MockEventSource {
    type Device = MockDevice;

    fn add_device(&mut self, path: &Path) -> Result<MockDevice, SourceError> {
        let mut state = self.state.lock().unwrap();
        let caps = *state
            .nodes
            .get(path)
            .ok_or_else(|| SourceError::DeviceUnavailable(path.display().to_string()))?;

        let device = MockDevice::at(path, caps);
        state.created.push(Arc::downgrade(&device.inner));
        state.added.push(device.clone());
        Ok(device)
    }

    fn remove_device(&mut self, device: &MockDevice) {
        self.state
            .lock()
            .unwrap()
            .added
            .retain(|d| !d.same_device(device));
    }

    fn set_user_data(&mut self, device: &MockDevice, binding: BindingId) {
        *device.inner.user_data.lock().unwrap() = Some(binding);
    }

    fn fd(&self) -> RawFd {
        self.fd.unwrap_or(-1)
    }

    fn dispatch(&mut self) -> Result<(), DispatchError> {
        let mut state = self.state.lock().unwrap();
        let result = state.dispatch_results.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            let pending: Vec<_> = state.pending.drain(..).collect();
            state.ready.extend(pending);
        }
        result
    }

    fn next_event(&mut self) -> Option<SourceEvent> {
        let mut state = self.state.lock().unwrap();
        let (path, kind) = state.ready.pop_front()?;
        let binding = state
            .added
            .iter()
            .find(|d| d.path() == path)
            .and_then(MockDevice::user_data);
        Some(SourceEvent { binding, kind })
    }
}

impl Drop for MockEventSource {
    fn drop(&mut self) {
        if self.fd.is_none() {
            return;
        }
        if let Ok(mut state) = self.state.lock() {
            state.added.clear();
            state.contexts_destroyed += 1;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

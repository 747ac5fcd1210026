//! Audio context: device ownership and the per-context object graph.

use crate::buffer::AlBuffer;
use crate::config::{ContextDesc, DEFAULT_EVENT_CAPACITY};
use crate::dispatch::{AlcEntryPoints, AlcTeardown, CloseDeviceFn, DestroyContextFn, DispatchTable};
use crate::error::{AlError, Result};
use crate::events::AlEvent;
use crate::format::{DistanceModel, SampleFormat};
use crate::library::{DriverLibrary, SymbolSource};
use crate::listener::AlListener;
use crate::ring::Ring;
use crate::source::AlSource;
use crate::sys::*;
use std::collections::{HashMap, VecDeque};
use std::ffi::{CStr, CString};
use std::ptr;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

fn next_handle() -> u64 {
    NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a buffer owned by an [`AlContext`].
///
/// Handle values are unique across the process, so a handle from one context
/// is never mistaken for an object of another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(u64);

impl BufferId {
    pub(crate) fn next() -> Self {
        Self(next_handle())
    }
}

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BufferId({})", self.0)
    }
}

/// Handle to a source owned by an [`AlContext`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    pub(crate) fn next() -> Self {
        Self(next_handle())
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

/// Either kind of object tracked by a context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectId {
    Buffer(BufferId),
    Source(SourceId),
}

impl From<BufferId> for ObjectId {
    fn from(id: BufferId) -> Self {
        Self::Buffer(id)
    }
}

impl From<SourceId> for ObjectId {
    fn from(id: SourceId) -> Self {
        Self::Source(id)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buffer(id) => id.fmt(f),
            Self::Source(id) => id.fmt(f),
        }
    }
}

/// Identification strings reported by the driver when the context opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    pub vendor: String,
    pub version: String,
    pub renderer: String,
}

struct NativeDevice {
    raw: *mut ALCdevice,
    close: Option<CloseDeviceFn>,
}

impl Drop for NativeDevice {
    fn drop(&mut self) {
        match self.close {
            // SAFETY: raw came from alcOpenDevice and is closed exactly once.
            Some(close) => unsafe {
                close(self.raw);
            },
            None => log::warn!("Driver has no alcCloseDevice; audio device left open"),
        }
    }
}

struct NativeContext {
    raw: *mut ALCcontext,
    make_current: unsafe extern "C" fn(*mut ALCcontext) -> ALCboolean,
    destroy: Option<DestroyContextFn>,
    current: bool,
}

impl Drop for NativeContext {
    fn drop(&mut self) {
        if self.current {
            // SAFETY: clearing the current context is always valid.
            unsafe {
                (self.make_current)(ptr::null_mut());
            }
        }
        match self.destroy {
            // SAFETY: raw came from alcCreateContext and is no longer current.
            Some(destroy) => unsafe { destroy(self.raw) },
            None => log::warn!("Driver has no alcDestroyContext; rendering context leaked"),
        }
    }
}

/// An open device with a current rendering context and the objects created
/// under it.
///
/// Buffers and sources live in the context and are addressed through
/// [`BufferId`] / [`SourceId`]. They stay alive until passed to
/// [`release`](AlContext::release); dropping the context closes the device
/// but does not delete them one by one.
pub struct AlContext {
    pub(crate) buffers: HashMap<BufferId, AlBuffer>,
    pub(crate) sources: HashMap<SourceId, AlSource>,
    pub(crate) ring: Ring<ObjectId>,
    events: VecDeque<AlEvent>,
    event_capacity: usize,
    dropped_events: usize,
    pub(crate) table: DispatchTable,
    alc: AlcEntryPoints,
    info: DriverInfo,
    // Field order is teardown order: context, device, then the library.
    _native_context: NativeContext,
    device: NativeDevice,
    library: Box<dyn SymbolSource>,
}

impl AlContext {
    pub const FORMAT_MONO8: SampleFormat = SampleFormat::Mono8;
    pub const FORMAT_MONO16: SampleFormat = SampleFormat::Mono16;
    pub const FORMAT_STEREO8: SampleFormat = SampleFormat::Stereo8;
    pub const FORMAT_STEREO16: SampleFormat = SampleFormat::Stereo16;

    pub const INVERSE_DISTANCE: DistanceModel = DistanceModel::Inverse;
    pub const INVERSE_DISTANCE_CLAMPED: DistanceModel = DistanceModel::InverseClamped;
    pub const LINEAR_DISTANCE: DistanceModel = DistanceModel::Linear;
    pub const LINEAR_DISTANCE_CLAMPED: DistanceModel = DistanceModel::LinearClamped;
    pub const EXPONENT_DISTANCE: DistanceModel = DistanceModel::Exponent;
    pub const EXPONENT_DISTANCE_CLAMPED: DistanceModel = DistanceModel::ExponentClamped;

    /// Loads the driver library named by `desc` and opens a context on it.
    pub fn open(desc: &ContextDesc) -> Result<Self> {
        let library = DriverLibrary::open(desc.library_name())?;
        let mut context = Self::open_with(library, desc.device_name.as_deref())?;
        context.set_event_capacity(desc.event_capacity);
        Ok(context)
    }

    /// Opens a context using entry points from an already loaded source.
    ///
    /// Runs the full open sequence: resolve the device/context entry points,
    /// open the device, create a rendering context and make it current, then
    /// resolve the general table. Any failure tears down what was already
    /// created and no context is returned.
    pub fn open_with(source: impl SymbolSource + 'static, device: Option<&str>) -> Result<Self> {
        let library: Box<dyn SymbolSource> = Box::new(source);
        let device_name = device
            .map(|name| {
                CString::new(name).map_err(|_| AlError::InvalidName {
                    name: name.to_string(),
                })
            })
            .transpose()?;

        let alc = AlcEntryPoints::resolve(&*library)?;
        let teardown = AlcTeardown::resolve(&*library);

        let name_ptr = device_name.as_ref().map_or(ptr::null(), |name| name.as_ptr());
        // SAFETY: name_ptr is null or a NUL-terminated string that outlives the call.
        let raw_device = unsafe { (alc.open_device)(name_ptr) };
        if raw_device.is_null() {
            return Err(AlError::DeviceOpen {
                device: device.unwrap_or("default device").to_string(),
            });
        }
        let device = NativeDevice {
            raw: raw_device,
            close: teardown.close_device,
        };

        let attributes: [ALCint; 2] = [0, 0];
        // SAFETY: device is open and the attribute list is zero-terminated.
        let raw_context = unsafe { (alc.create_context)(device.raw, attributes.as_ptr()) };
        if raw_context.is_null() {
            return Err(AlError::ContextCreate);
        }
        let mut native_context = NativeContext {
            raw: raw_context,
            make_current: alc.make_context_current,
            destroy: teardown.destroy_context,
            current: false,
        };

        // SAFETY: raw_context is a live context on an open device.
        if unsafe { (alc.make_context_current)(native_context.raw) } == ALC_FALSE {
            return Err(AlError::ContextActivate);
        }
        native_context.current = true;

        let table = DispatchTable::resolve(&*library)?;
        let info = DriverInfo {
            vendor: driver_string(&table, AL_VENDOR),
            version: driver_string(&table, AL_VERSION),
            renderer: driver_string(&table, AL_RENDERER),
        };
        log::info!(
            "Audio context opened on {} ({} {}, {})",
            library.describe(),
            info.vendor,
            info.version,
            info.renderer
        );

        Ok(Self {
            buffers: HashMap::new(),
            sources: HashMap::new(),
            ring: Ring::new(),
            events: VecDeque::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            dropped_events: 0,
            table,
            alc,
            info,
            _native_context: native_context,
            device,
            library,
        })
    }

    pub fn driver_info(&self) -> &DriverInfo {
        &self.info
    }

    /// Every live buffer and source, most recently created first.
    pub fn objects(&self) -> Vec<ObjectId> {
        self.ring.iter().collect()
    }

    pub fn buffer(&self, id: BufferId) -> Option<&AlBuffer> {
        self.buffers.get(&id)
    }

    pub fn source(&self, id: SourceId) -> Option<&AlSource> {
        self.sources.get(&id)
    }

    /// The context's single listener.
    pub fn listener(&self) -> AlListener<'_> {
        AlListener::new(&self.table)
    }

    /// Removes an object from the context and deletes its native handle.
    ///
    /// A playing source is stopped first. A buffer still attached to a source
    /// is released anyway; the source keeps a stale handle that later calls
    /// report as unknown. Drivers refuse to delete an attached buffer, so its
    /// native handle may outlive the release; the refusal is logged and the
    /// driver error cleared.
    pub fn release(&mut self, object: impl Into<ObjectId>) -> Result<()> {
        let object = object.into();
        if !self.ring.contains(&object) {
            return Err(AlError::UnknownObject(object));
        }

        match object {
            ObjectId::Source(id) => {
                self.stop(id)?;
                if let Some(source) = self.sources.remove(&id) {
                    // SAFETY: one valid name is passed.
                    unsafe { (self.table.delete_sources)(1, &source.native) };
                }
            }
            ObjectId::Buffer(id) => {
                if let Some(buffer) = self.buffers.remove(&id) {
                    if buffer.is_bound() {
                        log::warn!(
                            "Releasing {} while bound to {} playing source(s); the driver may keep native buffer {} alive",
                            id,
                            buffer.bound,
                            buffer.native
                        );
                    }
                    // SAFETY: one valid name is passed.
                    unsafe { (self.table.delete_buffers)(1, &buffer.native) };
                    if let Some(code) = self.driver_error() {
                        log::warn!(
                            "Driver rejected deleting native buffer {} of {}: {}",
                            buffer.native,
                            id,
                            error_name(code)
                        );
                    }
                }
            }
        }

        self.ring.remove(&object);
        log::debug!("Released {}", object);
        self.push_event(AlEvent::ObjectReleased { object });
        Ok(())
    }

    /// Drains the events queued since the last call.
    ///
    /// At most the configured capacity is kept between calls; older events are
    /// dropped first (see [`dropped_events`](AlContext::dropped_events)).
    pub fn poll_events(&mut self) -> Vec<AlEvent> {
        self.dropped_events = 0;
        self.events.drain(..).collect()
    }

    /// Events discarded since the last poll because the queue was full.
    pub fn dropped_events(&self) -> usize {
        self.dropped_events
    }

    /// Changes the queue capacity, trimming the oldest events if needed.
    /// A capacity of 0 stops event collection.
    pub fn set_event_capacity(&mut self, capacity: usize) {
        self.event_capacity = capacity;
        while self.events.len() > capacity {
            self.events.pop_front();
            self.dropped_events += 1;
        }
    }

    pub(crate) fn push_event(&mut self, event: AlEvent) {
        if self.event_capacity == 0 {
            return;
        }
        if self.events.len() >= self.event_capacity {
            self.events.pop_front();
            if self.dropped_events == 0 {
                log::warn!(
                    "Event queue full ({} events); dropping the oldest until the next poll",
                    self.event_capacity
                );
            }
            self.dropped_events += 1;
        }
        self.events.push_back(event);
    }

    pub fn set_distance_model(&self, model: DistanceModel) {
        log::debug!("Distance model set to {:?}", model);
        // SAFETY: plain value call on the current context.
        unsafe { (self.table.distance_model)(model.to_raw()) };
    }

    pub fn set_doppler_factor(&self, factor: f32) {
        log::debug!("Doppler factor set to {}", factor);
        // SAFETY: plain value call on the current context.
        unsafe { (self.table.doppler_factor)(factor) };
    }

    pub fn set_doppler_velocity(&self, velocity: f32) {
        log::debug!("Doppler velocity set to {}", velocity);
        // SAFETY: plain value call on the current context.
        unsafe { (self.table.doppler_velocity)(velocity) };
    }

    pub fn set_speed_of_sound(&self, speed: f32) {
        log::debug!("Speed of sound set to {}", speed);
        // SAFETY: plain value call on the current context.
        unsafe { (self.table.speed_of_sound)(speed) };
    }

    /// Takes the driver's pending error code, if any. The code is cleared by
    /// reading it. [`crate::sys::error_name`] gives its symbolic name.
    pub fn driver_error(&self) -> Option<i32> {
        // SAFETY: no arguments.
        let code = unsafe { (self.table.get_error)() };
        (code != AL_NO_ERROR).then_some(code)
    }

    /// Takes the device's pending error code, if any.
    pub fn device_error(&self) -> Option<i32> {
        // SAFETY: the device stays open for the lifetime of self.
        let code = unsafe { (self.alc.get_error)(self.device.raw) };
        (code != ALC_NO_ERROR).then_some(code)
    }
}

impl Drop for AlContext {
    fn drop(&mut self) {
        if !self.ring.is_empty() {
            log::warn!(
                "Closing audio context with {} unreleased object(s)",
                self.ring.len()
            );
        }
        log::info!("Closing audio context on {}", self.library.describe());
    }
}

fn driver_string(table: &DispatchTable, param: ALenum) -> String {
    // SAFETY: alGetString returns null or a static NUL-terminated string.
    unsafe {
        let raw = (table.get_string)(param);
        if raw.is_null() {
            return "unknown".to_string();
        }
        CStr::from_ptr(raw).to_string_lossy().into_owned()
    }
}

//! In-process stand-in for the audio driver, used by unit tests.
//!
//! Entry points are plain `extern "C"` functions over thread-local state, so
//! each test thread sees its own driver. Entry points no test exercises all
//! resolve to a shared no-op and must never be called.

use crate::library::SymbolSource;
use crate::sys::*;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::ffi::{CStr, c_void};
use std::ptr::{self, NonNull};

/// Device name the fake refuses to open.
pub const FAILING_DEVICE: &str = "fake-unplugged-device";

#[derive(Debug, Clone, Default)]
pub struct FakeBuffer {
    pub format: ALenum,
    pub frequency: ALsizei,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct FakeSource {
    pub floats: HashMap<ALenum, Vec<f32>>,
    pub looping: ALint,
    pub buffer: ALuint,
    pub state: ALenum,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self {
            floats: HashMap::new(),
            looping: 0,
            buffer: 0,
            state: AL_INITIAL,
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    next_name: ALuint,
    pub buffers: HashMap<ALuint, FakeBuffer>,
    pub sources: HashMap<ALuint, FakeSource>,
    pub listener: HashMap<ALenum, Vec<f32>>,
    pub globals: HashMap<ALenum, f32>,
    pub distance_model: ALenum,
    pub calls: Vec<&'static str>,
    pub open_devices: usize,
    pub live_contexts: usize,
    pub current_context: bool,
    pub pending_error: ALenum,
    pub reject_context: bool,
    pub reject_make_current: bool,
}

thread_local! {
    static STATE: RefCell<FakeState> = RefCell::new(FakeState::default());
}

pub fn with_state<R>(f: impl FnOnce(&mut FakeState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

pub fn calls() -> Vec<&'static str> {
    with_state(|s| s.calls.clone())
}

pub fn clear_calls() {
    with_state(|s| s.calls.clear());
}

fn record(name: &'static str) {
    with_state(|s| s.calls.push(name));
}

fn next_name(state: &mut FakeState) -> ALuint {
    state.next_name += 1;
    state.next_name
}

fn vector_len(param: ALenum) -> usize {
    if param == AL_ORIENTATION { 6 } else { 3 }
}

/// Symbol source backed by the fake entry points.
pub struct FakeDriver {
    missing: HashSet<&'static str>,
    lookups: Cell<usize>,
}

impl FakeDriver {
    /// Creates a driver with a fresh per-thread state.
    pub fn new() -> Self {
        with_state(|s| *s = FakeState::default());
        Self {
            missing: HashSet::new(),
            lookups: Cell::new(0),
        }
    }

    pub fn without_symbol(mut self, name: &'static str) -> Self {
        self.missing.insert(name);
        self
    }

    pub fn rejecting_context(self) -> Self {
        with_state(|s| s.reject_context = true);
        self
    }

    pub fn rejecting_make_current(self) -> Self {
        with_state(|s| s.reject_make_current = true);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

// SAFETY: every address handed out is an `extern "C"` function whose
// signature matches the driver ABI for that name, except `noop`, which is
// only handed out for entry points no test calls.
unsafe impl SymbolSource for FakeDriver {
    fn describe(&self) -> &str {
        "fake-driver"
    }

    fn symbol(&self, name: &str) -> Option<NonNull<c_void>> {
        self.lookups.set(self.lookups.get() + 1);
        if self.missing.contains(name) {
            return None;
        }
        let address: *const () = match name {
            "alcOpenDevice" => open_device as *const (),
            "alcCreateContext" => create_context as *const (),
            "alcMakeContextCurrent" => make_context_current as *const (),
            "alcGetError" => alc_get_error as *const (),
            "alcDestroyContext" => destroy_context as *const (),
            "alcCloseDevice" => close_device as *const (),
            "alGetString" => get_string as *const (),
            "alGetError" => get_error as *const (),
            "alListenerf" => listener_f as *const (),
            "alListenerfv" => listener_fv as *const (),
            "alGetListenerf" => get_listener_f as *const (),
            "alGetListenerfv" => get_listener_fv as *const (),
            "alGenSources" => gen_sources as *const (),
            "alDeleteSources" => delete_sources as *const (),
            "alSourcef" => source_f as *const (),
            "alSourcefv" => source_fv as *const (),
            "alSourcei" => source_i as *const (),
            "alGetSourcef" => get_source_f as *const (),
            "alGetSourcei" => get_source_i as *const (),
            "alSourcePlay" => source_play as *const (),
            "alSourceStop" => source_stop as *const (),
            "alGenBuffers" => gen_buffers as *const (),
            "alDeleteBuffers" => delete_buffers as *const (),
            "alBufferData" => buffer_data as *const (),
            "alDopplerFactor" => doppler_factor as *const (),
            "alDopplerVelocity" => doppler_velocity as *const (),
            "alSpeedOfSound" => speed_of_sound as *const (),
            "alDistanceModel" => distance_model as *const (),
            _ => noop as *const (),
        };
        NonNull::new(address as *mut c_void)
    }
}

extern "C" fn noop() {}

unsafe extern "C" fn open_device(name: *const ALCchar) -> *mut ALCdevice {
    if !name.is_null() {
        // SAFETY: callers pass a NUL-terminated string.
        let name = unsafe { CStr::from_ptr(name) };
        if name.to_bytes() == FAILING_DEVICE.as_bytes() {
            return ptr::null_mut();
        }
    }
    with_state(|s| {
        s.open_devices += 1;
        s.calls.push("alcOpenDevice");
    });
    NonNull::<ALCdevice>::dangling().as_ptr()
}

unsafe extern "C" fn create_context(_device: *mut ALCdevice, attributes: *const ALCint) -> *mut ALCcontext {
    assert!(!attributes.is_null());
    // SAFETY: the attribute list is zero-terminated.
    assert_eq!(unsafe { *attributes }, 0);
    let rejected = with_state(|s| {
        s.calls.push("alcCreateContext");
        if !s.reject_context {
            s.live_contexts += 1;
        }
        s.reject_context
    });
    if rejected {
        ptr::null_mut()
    } else {
        NonNull::<ALCcontext>::dangling().as_ptr()
    }
}

unsafe extern "C" fn make_context_current(context: *mut ALCcontext) -> ALCboolean {
    with_state(|s| {
        s.calls.push("alcMakeContextCurrent");
        if s.reject_make_current && !context.is_null() {
            return ALC_FALSE;
        }
        s.current_context = !context.is_null();
        ALC_TRUE
    })
}

unsafe extern "C" fn alc_get_error(_device: *mut ALCdevice) -> ALCenum {
    ALC_NO_ERROR
}

unsafe extern "C" fn destroy_context(_context: *mut ALCcontext) {
    with_state(|s| {
        s.calls.push("alcDestroyContext");
        s.live_contexts -= 1;
    });
}

unsafe extern "C" fn close_device(_device: *mut ALCdevice) -> ALCboolean {
    with_state(|s| {
        s.calls.push("alcCloseDevice");
        s.open_devices -= 1;
    });
    ALC_TRUE
}

unsafe extern "C" fn get_string(param: ALenum) -> *const ALchar {
    match param {
        AL_VENDOR => c"PetalSonic Test Vendor".as_ptr(),
        AL_VERSION => c"1.1 fake".as_ptr(),
        AL_RENDERER => c"Fake Renderer".as_ptr(),
        _ => ptr::null(),
    }
}

unsafe extern "C" fn get_error() -> ALenum {
    with_state(|s| std::mem::replace(&mut s.pending_error, AL_NO_ERROR))
}

unsafe extern "C" fn listener_f(param: ALenum, value: ALfloat) {
    record("alListenerf");
    with_state(|s| s.listener.insert(param, vec![value]));
}

unsafe extern "C" fn listener_fv(param: ALenum, values: *const ALfloat) {
    record("alListenerfv");
    // SAFETY: the caller passes as many floats as the parameter takes.
    let values = unsafe { std::slice::from_raw_parts(values, vector_len(param)) }.to_vec();
    with_state(|s| s.listener.insert(param, values));
}

unsafe extern "C" fn get_listener_f(param: ALenum, value: *mut ALfloat) {
    let stored = with_state(|s| s.listener.get(&param).and_then(|v| v.first().copied()));
    // SAFETY: out-pointer supplied by the caller.
    unsafe { *value = stored.unwrap_or(1.0) };
}

unsafe extern "C" fn get_listener_fv(param: ALenum, values: *mut ALfloat) {
    let len = vector_len(param);
    let stored = with_state(|s| s.listener.get(&param).cloned()).unwrap_or_else(|| vec![0.0; len]);
    // SAFETY: out-buffer holds `len` floats.
    let out = unsafe { std::slice::from_raw_parts_mut(values, len) };
    out.copy_from_slice(&stored[..len]);
}

unsafe extern "C" fn gen_sources(n: ALsizei, names: *mut ALuint) {
    with_state(|s| {
        s.calls.push("alGenSources");
        for i in 0..n as usize {
            let name = next_name(s);
            s.sources.insert(name, FakeSource::default());
            // SAFETY: the caller provides room for `n` names.
            unsafe { *names.add(i) = name };
        }
    });
}

unsafe extern "C" fn delete_sources(n: ALsizei, names: *const ALuint) {
    with_state(|s| {
        s.calls.push("alDeleteSources");
        for i in 0..n as usize {
            // SAFETY: the caller passes `n` names.
            let name = unsafe { *names.add(i) };
            s.sources.remove(&name);
        }
    });
}

unsafe extern "C" fn source_f(source: ALuint, param: ALenum, value: ALfloat) {
    with_state(|s| {
        s.calls.push("alSourcef");
        if let Some(src) = s.sources.get_mut(&source) {
            src.floats.insert(param, vec![value]);
        }
    });
}

unsafe extern "C" fn source_fv(source: ALuint, param: ALenum, values: *const ALfloat) {
    // SAFETY: source vector parameters are three floats.
    let values = unsafe { std::slice::from_raw_parts(values, 3) }.to_vec();
    with_state(|s| {
        s.calls.push("alSourcefv");
        if let Some(src) = s.sources.get_mut(&source) {
            src.floats.insert(param, values);
        }
    });
}

unsafe extern "C" fn source_i(source: ALuint, param: ALenum, value: ALint) {
    with_state(|s| {
        s.calls.push("alSourcei");
        if let Some(src) = s.sources.get_mut(&source) {
            match param {
                AL_BUFFER => src.buffer = value as ALuint,
                AL_LOOPING => src.looping = value,
                _ => {}
            }
        }
    });
}

unsafe extern "C" fn get_source_f(source: ALuint, param: ALenum, value: *mut ALfloat) {
    let stored = with_state(|s| {
        s.sources
            .get(&source)
            .and_then(|src| src.floats.get(&param))
            .and_then(|v| v.first().copied())
    });
    // SAFETY: out-pointer supplied by the caller.
    unsafe { *value = stored.unwrap_or(0.0) };
}

unsafe extern "C" fn get_source_i(source: ALuint, param: ALenum, value: *mut ALint) {
    let stored = with_state(|s| {
        s.sources.get(&source).map(|src| match param {
            AL_SOURCE_STATE => src.state,
            AL_BUFFER => src.buffer as ALint,
            AL_LOOPING => src.looping,
            _ => 0,
        })
    });
    // SAFETY: out-pointer supplied by the caller.
    unsafe { *value = stored.unwrap_or(0) };
}

unsafe extern "C" fn source_play(source: ALuint) {
    with_state(|s| {
        s.calls.push("alSourcePlay");
        if let Some(src) = s.sources.get_mut(&source) {
            src.state = AL_PLAYING;
        }
    });
}

unsafe extern "C" fn source_stop(source: ALuint) {
    with_state(|s| {
        s.calls.push("alSourceStop");
        if let Some(src) = s.sources.get_mut(&source) {
            src.state = AL_STOPPED;
        }
    });
}

unsafe extern "C" fn gen_buffers(n: ALsizei, names: *mut ALuint) {
    with_state(|s| {
        s.calls.push("alGenBuffers");
        for i in 0..n as usize {
            let name = next_name(s);
            s.buffers.insert(name, FakeBuffer::default());
            // SAFETY: the caller provides room for `n` names.
            unsafe { *names.add(i) = name };
        }
    });
}

unsafe extern "C" fn delete_buffers(n: ALsizei, names: *const ALuint) {
    with_state(|s| {
        s.calls.push("alDeleteBuffers");
        for i in 0..n as usize {
            // SAFETY: the caller passes `n` names.
            let name = unsafe { *names.add(i) };
            // Drivers refuse to delete a buffer still attached to a source.
            if s.sources.values().any(|src| src.buffer == name) {
                s.pending_error = AL_INVALID_OPERATION;
                continue;
            }
            s.buffers.remove(&name);
        }
    });
}

unsafe extern "C" fn buffer_data(
    buffer: ALuint,
    format: ALenum,
    data: *const ALvoid,
    size: ALsizei,
    frequency: ALsizei,
) {
    let bytes = if size == 0 {
        Vec::new()
    } else {
        // SAFETY: the caller passes `size` readable bytes.
        unsafe { std::slice::from_raw_parts(data as *const u8, size as usize) }.to_vec()
    };
    with_state(|s| {
        s.calls.push("alBufferData");
        s.buffers.insert(
            buffer,
            FakeBuffer {
                format,
                frequency,
                data: bytes,
            },
        );
    });
}

unsafe extern "C" fn doppler_factor(value: ALfloat) {
    with_state(|s| s.globals.insert(AL_DOPPLER_FACTOR, value));
}

unsafe extern "C" fn doppler_velocity(value: ALfloat) {
    with_state(|s| s.globals.insert(AL_DOPPLER_VELOCITY, value));
}

unsafe extern "C" fn speed_of_sound(value: ALfloat) {
    with_state(|s| s.globals.insert(AL_SPEED_OF_SOUND, value));
}

unsafe extern "C" fn distance_model(model: ALenum) {
    with_state(|s| s.distance_model = model);
}

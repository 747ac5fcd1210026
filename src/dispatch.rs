//! Entry-point tables resolved from a [`SymbolSource`].
//!
//! Resolution is all-or-nothing: each table is built in one pass and the first
//! absent symbol aborts the pass, so later names are never looked up and no
//! partially filled table can exist.

use crate::error::{AlError, Result};
use crate::library::SymbolSource;
use crate::sys::*;
use std::ffi::c_void;
use std::mem;

/// Looks up one entry point and reinterprets its address as `F`.
///
/// # Safety
///
/// `F` must be the function pointer type matching the ABI of `name`.
unsafe fn lookup<F: Copy>(source: &dyn SymbolSource, name: &'static str) -> Result<F> {
    debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<*const c_void>());
    let address = source
        .symbol(name)
        .ok_or(AlError::MissingSymbol { symbol: name })?;
    // SAFETY: guaranteed by the caller and the SymbolSource contract.
    Ok(unsafe { mem::transmute_copy::<*mut c_void, F>(&address.as_ptr()) })
}

macro_rules! entry_points {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($field:ident: $symbol:literal => $ty:ty,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        #[allow(dead_code)]
        $vis struct $name {
            $(pub(crate) $field: $ty,)*
        }

        impl $name {
            /// Symbol names in resolution order.
            pub const SYMBOLS: &'static [&'static str] = &[$($symbol),*];

            /// Resolves every entry point, failing on the first absent one.
            pub fn resolve(source: &dyn SymbolSource) -> Result<Self> {
                // SAFETY: each field type is the declared ABI of its symbol.
                unsafe {
                    Ok(Self {
                        $($field: lookup::<$ty>(source, $symbol)?,)*
                    })
                }
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("entries", &Self::SYMBOLS.len())
                    .finish()
            }
        }
    };
}

entry_points! {
    /// Device and rendering-context management subset.
    pub struct AlcEntryPoints {
        open_device: "alcOpenDevice" => unsafe extern "C" fn(*const ALCchar) -> *mut ALCdevice,
        create_context: "alcCreateContext" => unsafe extern "C" fn(*mut ALCdevice, *const ALCint) -> *mut ALCcontext,
        make_context_current: "alcMakeContextCurrent" => unsafe extern "C" fn(*mut ALCcontext) -> ALCboolean,
        get_error: "alcGetError" => unsafe extern "C" fn(*mut ALCdevice) -> ALCenum,
    }
}

pub(crate) type DestroyContextFn = unsafe extern "C" fn(*mut ALCcontext);
pub(crate) type CloseDeviceFn = unsafe extern "C" fn(*mut ALCdevice) -> ALCboolean;

/// Teardown entry points. Older drivers may lack them; their absence only
/// means native handles outlive the context.
#[derive(Clone, Copy, Debug)]
pub struct AlcTeardown {
    pub(crate) destroy_context: Option<DestroyContextFn>,
    pub(crate) close_device: Option<CloseDeviceFn>,
}

impl AlcTeardown {
    pub fn resolve(source: &dyn SymbolSource) -> Self {
        // SAFETY: both aliases are the declared ABI of their symbols.
        unsafe {
            Self {
                destroy_context: lookup::<DestroyContextFn>(source, "alcDestroyContext").ok(),
                close_device: lookup::<CloseDeviceFn>(source, "alcCloseDevice").ok(),
            }
        }
    }
}

entry_points! {
    /// General audio subset: state, listener, sources, buffers and the
    /// global distance / Doppler model.
    pub struct DispatchTable {
        enable: "alEnable" => unsafe extern "C" fn(ALenum),
        disable: "alDisable" => unsafe extern "C" fn(ALenum),
        is_enabled: "alIsEnabled" => unsafe extern "C" fn(ALenum) -> ALboolean,
        get_string: "alGetString" => unsafe extern "C" fn(ALenum) -> *const ALchar,
        get_booleanv: "alGetBooleanv" => unsafe extern "C" fn(ALenum, *mut ALboolean),
        get_integerv: "alGetIntegerv" => unsafe extern "C" fn(ALenum, *mut ALint),
        get_floatv: "alGetFloatv" => unsafe extern "C" fn(ALenum, *mut ALfloat),
        get_doublev: "alGetDoublev" => unsafe extern "C" fn(ALenum, *mut ALdouble),
        get_boolean: "alGetBoolean" => unsafe extern "C" fn(ALenum) -> ALboolean,
        get_integer: "alGetInteger" => unsafe extern "C" fn(ALenum) -> ALint,
        get_float: "alGetFloat" => unsafe extern "C" fn(ALenum) -> ALfloat,
        get_double: "alGetDouble" => unsafe extern "C" fn(ALenum) -> ALdouble,
        get_error: "alGetError" => unsafe extern "C" fn() -> ALenum,
        is_extension_present: "alIsExtensionPresent" => unsafe extern "C" fn(*const ALchar) -> ALboolean,
        get_proc_address: "alGetProcAddress" => unsafe extern "C" fn(*const ALchar) -> *mut c_void,
        get_enum_value: "alGetEnumValue" => unsafe extern "C" fn(*const ALchar) -> ALenum,

        listener_f: "alListenerf" => unsafe extern "C" fn(ALenum, ALfloat),
        listener_3f: "alListener3f" => unsafe extern "C" fn(ALenum, ALfloat, ALfloat, ALfloat),
        listener_fv: "alListenerfv" => unsafe extern "C" fn(ALenum, *const ALfloat),
        listener_i: "alListeneri" => unsafe extern "C" fn(ALenum, ALint),
        listener_3i: "alListener3i" => unsafe extern "C" fn(ALenum, ALint, ALint, ALint),
        listener_iv: "alListeneriv" => unsafe extern "C" fn(ALenum, *const ALint),
        get_listener_f: "alGetListenerf" => unsafe extern "C" fn(ALenum, *mut ALfloat),
        get_listener_3f: "alGetListener3f" => unsafe extern "C" fn(ALenum, *mut ALfloat, *mut ALfloat, *mut ALfloat),
        get_listener_fv: "alGetListenerfv" => unsafe extern "C" fn(ALenum, *mut ALfloat),
        get_listener_i: "alGetListeneri" => unsafe extern "C" fn(ALenum, *mut ALint),
        get_listener_3i: "alGetListener3i" => unsafe extern "C" fn(ALenum, *mut ALint, *mut ALint, *mut ALint),
        get_listener_iv: "alGetListeneriv" => unsafe extern "C" fn(ALenum, *mut ALint),

        gen_sources: "alGenSources" => unsafe extern "C" fn(ALsizei, *mut ALuint),
        delete_sources: "alDeleteSources" => unsafe extern "C" fn(ALsizei, *const ALuint),
        is_source: "alIsSource" => unsafe extern "C" fn(ALuint) -> ALboolean,
        source_f: "alSourcef" => unsafe extern "C" fn(ALuint, ALenum, ALfloat),
        source_3f: "alSource3f" => unsafe extern "C" fn(ALuint, ALenum, ALfloat, ALfloat, ALfloat),
        source_fv: "alSourcefv" => unsafe extern "C" fn(ALuint, ALenum, *const ALfloat),
        source_i: "alSourcei" => unsafe extern "C" fn(ALuint, ALenum, ALint),
        source_3i: "alSource3i" => unsafe extern "C" fn(ALuint, ALenum, ALint, ALint, ALint),
        source_iv: "alSourceiv" => unsafe extern "C" fn(ALuint, ALenum, *const ALint),
        get_source_f: "alGetSourcef" => unsafe extern "C" fn(ALuint, ALenum, *mut ALfloat),
        get_source_3f: "alGetSource3f" => unsafe extern "C" fn(ALuint, ALenum, *mut ALfloat, *mut ALfloat, *mut ALfloat),
        get_source_fv: "alGetSourcefv" => unsafe extern "C" fn(ALuint, ALenum, *mut ALfloat),
        get_source_i: "alGetSourcei" => unsafe extern "C" fn(ALuint, ALenum, *mut ALint),
        get_source_3i: "alGetSource3i" => unsafe extern "C" fn(ALuint, ALenum, *mut ALint, *mut ALint, *mut ALint),
        get_source_iv: "alGetSourceiv" => unsafe extern "C" fn(ALuint, ALenum, *mut ALint),
        source_play_v: "alSourcePlayv" => unsafe extern "C" fn(ALsizei, *const ALuint),
        source_stop_v: "alSourceStopv" => unsafe extern "C" fn(ALsizei, *const ALuint),
        source_rewind_v: "alSourceRewindv" => unsafe extern "C" fn(ALsizei, *const ALuint),
        source_pause_v: "alSourcePausev" => unsafe extern "C" fn(ALsizei, *const ALuint),
        source_play: "alSourcePlay" => unsafe extern "C" fn(ALuint),
        source_stop: "alSourceStop" => unsafe extern "C" fn(ALuint),
        source_rewind: "alSourceRewind" => unsafe extern "C" fn(ALuint),
        source_pause: "alSourcePause" => unsafe extern "C" fn(ALuint),
        source_queue_buffers: "alSourceQueueBuffers" => unsafe extern "C" fn(ALuint, ALsizei, *const ALuint),
        source_unqueue_buffers: "alSourceUnqueueBuffers" => unsafe extern "C" fn(ALuint, ALsizei, *mut ALuint),

        gen_buffers: "alGenBuffers" => unsafe extern "C" fn(ALsizei, *mut ALuint),
        delete_buffers: "alDeleteBuffers" => unsafe extern "C" fn(ALsizei, *const ALuint),
        is_buffer: "alIsBuffer" => unsafe extern "C" fn(ALuint) -> ALboolean,
        buffer_data: "alBufferData" => unsafe extern "C" fn(ALuint, ALenum, *const ALvoid, ALsizei, ALsizei),
        buffer_f: "alBufferf" => unsafe extern "C" fn(ALuint, ALenum, ALfloat),
        buffer_3f: "alBuffer3f" => unsafe extern "C" fn(ALuint, ALenum, ALfloat, ALfloat, ALfloat),
        buffer_fv: "alBufferfv" => unsafe extern "C" fn(ALuint, ALenum, *const ALfloat),
        buffer_i: "alBufferi" => unsafe extern "C" fn(ALuint, ALenum, ALint),
        buffer_3i: "alBuffer3i" => unsafe extern "C" fn(ALuint, ALenum, ALint, ALint, ALint),
        buffer_iv: "alBufferiv" => unsafe extern "C" fn(ALuint, ALenum, *const ALint),
        get_buffer_f: "alGetBufferf" => unsafe extern "C" fn(ALuint, ALenum, *mut ALfloat),
        get_buffer_3f: "alGetBuffer3f" => unsafe extern "C" fn(ALuint, ALenum, *mut ALfloat, *mut ALfloat, *mut ALfloat),
        get_buffer_fv: "alGetBufferfv" => unsafe extern "C" fn(ALuint, ALenum, *mut ALfloat),
        get_buffer_i: "alGetBufferi" => unsafe extern "C" fn(ALuint, ALenum, *mut ALint),
        get_buffer_3i: "alGetBuffer3i" => unsafe extern "C" fn(ALuint, ALenum, *mut ALint, *mut ALint, *mut ALint),
        get_buffer_iv: "alGetBufferiv" => unsafe extern "C" fn(ALuint, ALenum, *mut ALint),

        doppler_factor: "alDopplerFactor" => unsafe extern "C" fn(ALfloat),
        doppler_velocity: "alDopplerVelocity" => unsafe extern "C" fn(ALfloat),
        speed_of_sound: "alSpeedOfSound" => unsafe extern "C" fn(ALfloat),
        distance_model: "alDistanceModel" => unsafe extern "C" fn(ALenum),
    }
}

//! Raw ABI of the audio driver: scalar typedefs, enum values and opaque handles.
//!
//! Everything here mirrors the C headers shipped with OpenAL 1.1 implementations.
//! Entry-point signatures live next to the tables that resolve them, see
//! [`DispatchTable`](crate::DispatchTable).

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_double, c_float, c_int, c_uchar, c_uint, c_void};

pub type ALboolean = c_char;
pub type ALchar = c_char;
pub type ALint = c_int;
pub type ALuint = c_uint;
pub type ALsizei = c_int;
pub type ALenum = c_int;
pub type ALfloat = c_float;
pub type ALdouble = c_double;
pub type ALvoid = c_void;

pub type ALCboolean = c_uchar;
pub type ALCchar = c_char;
pub type ALCint = c_int;
pub type ALCenum = c_int;

/// Opaque device handle owned by the driver.
#[repr(C)]
pub struct ALCdevice {
    _private: [u8; 0],
}

/// Opaque rendering-context handle owned by the driver.
#[repr(C)]
pub struct ALCcontext {
    _private: [u8; 0],
}

pub const AL_NONE: ALint = 0;
pub const AL_FALSE: ALboolean = 0;
pub const AL_TRUE: ALboolean = 1;
pub const ALC_FALSE: ALCboolean = 0;
pub const ALC_TRUE: ALCboolean = 1;
pub const ALC_NO_ERROR: ALCenum = 0;

pub const AL_SOURCE_RELATIVE: ALenum = 0x202;
pub const AL_CONE_INNER_ANGLE: ALenum = 0x1001;
pub const AL_CONE_OUTER_ANGLE: ALenum = 0x1002;
pub const AL_PITCH: ALenum = 0x1003;
pub const AL_POSITION: ALenum = 0x1004;
pub const AL_DIRECTION: ALenum = 0x1005;
pub const AL_VELOCITY: ALenum = 0x1006;
pub const AL_LOOPING: ALenum = 0x1007;
pub const AL_BUFFER: ALenum = 0x1009;
pub const AL_GAIN: ALenum = 0x100A;
pub const AL_MIN_GAIN: ALenum = 0x100D;
pub const AL_MAX_GAIN: ALenum = 0x100E;
pub const AL_ORIENTATION: ALenum = 0x100F;

pub const AL_SOURCE_STATE: ALenum = 0x1010;
pub const AL_INITIAL: ALenum = 0x1011;
pub const AL_PLAYING: ALenum = 0x1012;
pub const AL_PAUSED: ALenum = 0x1013;
pub const AL_STOPPED: ALenum = 0x1014;

pub const AL_SEC_OFFSET: ALenum = 0x1024;
pub const AL_SAMPLE_OFFSET: ALenum = 0x1025;
pub const AL_BYTE_OFFSET: ALenum = 0x1026;

pub const AL_REFERENCE_DISTANCE: ALenum = 0x1020;
pub const AL_ROLLOFF_FACTOR: ALenum = 0x1021;
pub const AL_CONE_OUTER_GAIN: ALenum = 0x1022;
pub const AL_MAX_DISTANCE: ALenum = 0x1023;

pub const AL_FORMAT_MONO8: ALenum = 0x1100;
pub const AL_FORMAT_MONO16: ALenum = 0x1101;
pub const AL_FORMAT_STEREO8: ALenum = 0x1102;
pub const AL_FORMAT_STEREO16: ALenum = 0x1103;

pub const AL_FREQUENCY: ALenum = 0x2001;
pub const AL_BITS: ALenum = 0x2002;
pub const AL_CHANNELS: ALenum = 0x2003;
pub const AL_SIZE: ALenum = 0x2004;

pub const AL_NO_ERROR: ALenum = 0;
pub const AL_INVALID_NAME: ALenum = 0xA001;
pub const AL_INVALID_ENUM: ALenum = 0xA002;
pub const AL_INVALID_VALUE: ALenum = 0xA003;
pub const AL_INVALID_OPERATION: ALenum = 0xA004;
pub const AL_OUT_OF_MEMORY: ALenum = 0xA005;

pub const AL_VENDOR: ALenum = 0xB001;
pub const AL_VERSION: ALenum = 0xB002;
pub const AL_RENDERER: ALenum = 0xB003;
pub const AL_EXTENSIONS: ALenum = 0xB004;

pub const AL_DOPPLER_FACTOR: ALenum = 0xC000;
pub const AL_DOPPLER_VELOCITY: ALenum = 0xC001;
pub const AL_SPEED_OF_SOUND: ALenum = 0xC003;

pub const AL_DISTANCE_MODEL: ALenum = 0xD000;
pub const AL_INVERSE_DISTANCE: ALenum = 0xD001;
pub const AL_INVERSE_DISTANCE_CLAMPED: ALenum = 0xD002;
pub const AL_LINEAR_DISTANCE: ALenum = 0xD003;
pub const AL_LINEAR_DISTANCE_CLAMPED: ALenum = 0xD004;
pub const AL_EXPONENT_DISTANCE: ALenum = 0xD005;
pub const AL_EXPONENT_DISTANCE_CLAMPED: ALenum = 0xD006;

/// Human readable name for a driver error code.
pub fn error_name(code: ALenum) -> &'static str {
    match code {
        AL_NO_ERROR => "AL_NO_ERROR",
        AL_INVALID_NAME => "AL_INVALID_NAME",
        AL_INVALID_ENUM => "AL_INVALID_ENUM",
        AL_INVALID_VALUE => "AL_INVALID_VALUE",
        AL_INVALID_OPERATION => "AL_INVALID_OPERATION",
        AL_OUT_OF_MEMORY => "AL_OUT_OF_MEMORY",
        _ => "unknown driver error",
    }
}

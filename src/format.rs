//! Enumerations surfaced to callers: sample layouts, distance models and
//! driver-side source states.

use crate::sys::*;

/// Layout of raw PCM bytes handed to a buffer.
///
/// The payload is not self-describing: channel count and sample width come
/// from the format alone, and the frequency comes with it on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleFormat {
    /// Unsigned 8-bit, one channel
    Mono8,
    /// Signed 16-bit little endian, one channel
    #[default]
    Mono16,
    /// Unsigned 8-bit, interleaved left/right
    Stereo8,
    /// Signed 16-bit little endian, interleaved left/right
    Stereo16,
}

impl SampleFormat {
    pub const ALL: [SampleFormat; 4] = [Self::Mono8, Self::Mono16, Self::Stereo8, Self::Stereo16];

    pub fn to_raw(self) -> ALenum {
        match self {
            Self::Mono8 => AL_FORMAT_MONO8,
            Self::Mono16 => AL_FORMAT_MONO16,
            Self::Stereo8 => AL_FORMAT_STEREO8,
            Self::Stereo16 => AL_FORMAT_STEREO16,
        }
    }

    pub fn from_raw(value: ALenum) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.to_raw() == value)
    }

    pub fn channels(self) -> u16 {
        match self {
            Self::Mono8 | Self::Mono16 => 1,
            Self::Stereo8 | Self::Stereo16 => 2,
        }
    }

    pub fn bytes_per_sample(self) -> u16 {
        match self {
            Self::Mono8 | Self::Stereo8 => 1,
            Self::Mono16 | Self::Stereo16 => 2,
        }
    }

    /// Bytes per frame (one sample for every channel).
    pub fn frame_size(self) -> usize {
        self.channels() as usize * self.bytes_per_sample() as usize
    }
}

/// Attenuation curve applied by the driver as sources move away from the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceModel {
    Inverse,
    #[default]
    InverseClamped,
    Linear,
    LinearClamped,
    Exponent,
    ExponentClamped,
}

impl DistanceModel {
    pub const ALL: [DistanceModel; 6] = [
        Self::Inverse,
        Self::InverseClamped,
        Self::Linear,
        Self::LinearClamped,
        Self::Exponent,
        Self::ExponentClamped,
    ];

    pub fn to_raw(self) -> ALenum {
        match self {
            Self::Inverse => AL_INVERSE_DISTANCE,
            Self::InverseClamped => AL_INVERSE_DISTANCE_CLAMPED,
            Self::Linear => AL_LINEAR_DISTANCE,
            Self::LinearClamped => AL_LINEAR_DISTANCE_CLAMPED,
            Self::Exponent => AL_EXPONENT_DISTANCE,
            Self::ExponentClamped => AL_EXPONENT_DISTANCE_CLAMPED,
        }
    }

    pub fn from_raw(value: ALenum) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.to_raw() == value)
    }
}

/// Playback state as reported by the driver.
///
/// This can differ from [`AlSource::is_playing`](crate::AlSource::is_playing):
/// a non-looping source that ran off the end of its buffer is `Stopped` here
/// while its binding stays in place until [`stop`](crate::AlContext::stop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceState {
    Initial,
    Playing,
    Paused,
    Stopped,
}

impl SourceState {
    pub fn from_raw(value: ALenum) -> Option<Self> {
        match value {
            AL_INITIAL => Some(Self::Initial),
            AL_PLAYING => Some(Self::Playing),
            AL_PAUSED => Some(Self::Paused),
            AL_STOPPED => Some(Self::Stopped),
            _ => None,
        }
    }
}

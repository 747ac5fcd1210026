//! Error types for PetalSonic AL

use crate::context::{BufferId, ObjectId, SourceId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlError {
    #[error("Audio library {library} not loaded: {reason}")]
    LibraryLoad { library: String, reason: String },

    #[error("{symbol} not found")]
    MissingSymbol { symbol: &'static str },

    #[error("Audio device error: could not open {device}")]
    DeviceOpen { device: String },

    #[error("Audio device error: rendering context creation rejected")]
    ContextCreate,

    #[error("Audio device error: rendering context could not be made current")]
    ContextActivate,

    #[error("{buffer_id} is bound to {bound} playing source(s) and cannot be rewritten")]
    BufferInUse { buffer_id: BufferId, bound: u32 },

    #[error("{source_id} is playing; stop it before reassigning its buffer")]
    SourcePlaying { source_id: SourceId },

    #[error("{source_id} has no buffer to play")]
    NoBufferAssigned { source_id: SourceId },

    #[error("Parameter `{parameter}` expects {expected} floats, got {actual}")]
    VectorLength {
        parameter: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Payload of {size} bytes exceeds the driver's size limit")]
    PayloadTooLarge { size: usize },

    #[error("Sample frequency {0} Hz is not accepted by the driver")]
    InvalidFrequency(u32),

    #[error("Name {name:?} contains an interior NUL byte")]
    InvalidName { name: String },

    #[error("{0} is not owned by this context")]
    UnknownObject(ObjectId),

    #[error("Driver returned unexpected value {value} for {query}")]
    UnexpectedDriverValue { query: &'static str, value: i32 },
}

impl AlError {
    /// True for failures caused by how the API was called rather than by the
    /// driver or the environment. These are never worth retrying.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::BufferInUse { .. }
                | Self::SourcePlaying { .. }
                | Self::NoBufferAssigned { .. }
                | Self::VectorLength { .. }
                | Self::PayloadTooLarge { .. }
                | Self::InvalidFrequency(_)
                | Self::InvalidName { .. }
                | Self::UnknownObject(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AlError>;

//! Configuration for PetalSonic AL

use crate::format::SampleFormat;
use crate::library::DEFAULT_LIBRARY;

/// Environment variable overriding the driver library name or path.
pub const LIBRARY_ENV: &str = "PETALSONIC_AL_LIBRARY";
/// Environment variable selecting the output device by name.
pub const DEVICE_ENV: &str = "PETALSONIC_AL_DEVICE";

/// Frequency used for buffers created without an explicit one.
pub const DEFAULT_FREQUENCY: u32 = 44100;

/// Events kept before the oldest ones are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Configuration descriptor for opening an [`AlContext`](crate::AlContext)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDesc {
    /// Driver library file name or path (None uses the platform default)
    pub library_name: Option<String>,
    /// Output device name (None opens the driver's default device)
    pub device_name: Option<String>,
    /// Maximum queued events between polls; 0 disables event collection
    pub event_capacity: usize,
}

impl Default for ContextDesc {
    fn default() -> Self {
        Self {
            library_name: None,
            device_name: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ContextDesc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`LIBRARY_ENV`] and [`DEVICE_ENV`]; unset or empty variables
    /// leave the corresponding default in place.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            library_name: non_empty(LIBRARY_ENV),
            device_name: non_empty(DEVICE_ENV),
            ..Self::default()
        }
    }

    pub fn library(mut self, name: impl Into<String>) -> Self {
        self.library_name = Some(name.into());
        self
    }

    pub fn device(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// The library that will actually be opened.
    pub fn library_name(&self) -> &str {
        self.library_name.as_deref().unwrap_or(DEFAULT_LIBRARY)
    }
}

/// Parameters for [`AlContext::create_buffer`](crate::AlContext::create_buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc<'a> {
    /// Initial PCM payload; `None` creates an empty buffer
    pub data: Option<&'a [u8]>,
    pub format: SampleFormat,
    pub frequency: u32,
}

impl Default for BufferDesc<'_> {
    fn default() -> Self {
        Self {
            data: None,
            format: SampleFormat::Mono16,
            frequency: DEFAULT_FREQUENCY,
        }
    }
}

impl<'a> BufferDesc<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: &'a [u8]) -> Self {
        self.data = Some(data);
        self
    }

    pub fn format(mut self, format: SampleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }
}

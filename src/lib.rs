//! # PetalSonic AL
//!
//! Runtime-loaded bindings to an OpenAL-compatible audio driver, with a small
//! object model on top.
//!
//! The driver library is opened when a context is created and every entry
//! point the crate uses is resolved up front. If any one is missing, opening
//! fails with the name of the first absent symbol and nothing is left behind.
//! Buffers and sources created under a context are tracked by it and
//! addressed through typed handles.
//!
//! ## Quick Start
//!
//! ```no_run
//! use petalsonic_al::*;
//!
//! let mut context = AlContext::open(&ContextDesc::from_env())?;
//!
//! // One second of silence, 16-bit mono at 44.1 kHz
//! let pcm = vec![0u8; 44100 * 2];
//! let buffer = context.create_buffer(BufferDesc::new().data(&pcm))?;
//! let source = context.create_source(Some(buffer))?;
//!
//! context
//!     .listener()
//!     .change(&ListenerParams::new().pose(Pose::from_position(Vec3::ZERO)))?;
//! context.play(
//!     source,
//!     None,
//!     &SourceParams::new().position(Vec3::new(2.0, 0.0, -1.0)).looping(true),
//! )?;
//!
//! println!("offset: {:.2}s", context.source_time(source)?);
//!
//! context.stop(source)?;
//! context.release(source)?;
//! context.release(buffer)?;
//! # Ok::<(), AlError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`AlContext`]**: device, rendering context and the buffers/sources created under it
//! - **[`AlBuffer`]** / **[`AlSource`]**: read-only views of tracked objects
//! - **[`AlListener`]**: the context's single listener
//! - **[`SourceParams`]** / **[`ListenerParams`]**: optional settings, validated before use
//! - **[`AlEvent`]**: lifecycle notifications drained with [`AlContext::poll_events`]
//!
//! ## Ownership rules
//!
//! - A buffer cannot be rewritten while a playing source is attached to it.
//! - A source's buffer cannot be reassigned while it is playing.
//! - Playing a source with no buffer is an error.
//! - Objects are released explicitly; dropping the context does not cascade.
//!
//! All calls are synchronous and the crate assumes single-threaded use of a
//! context. Only one context can be current per process.

mod buffer;
pub mod config;
mod context;
mod dispatch;
pub mod error;
pub mod events;
pub mod format;
pub mod library;
mod listener;
pub mod math;
pub mod params;
mod ring;
mod source;
pub mod sys;

#[cfg(test)]
mod driver_fake;

pub use buffer::AlBuffer;
pub use config::{BufferDesc, ContextDesc};
pub use context::{AlContext, BufferId, DriverInfo, ObjectId, SourceId};
pub use dispatch::{AlcEntryPoints, DispatchTable};
pub use error::{AlError, Result};
pub use events::AlEvent;
pub use format::{DistanceModel, SampleFormat, SourceState};
pub use library::{DriverLibrary, SymbolSource};
pub use listener::AlListener;
pub use math::{Pose, Quat, Vec3};
pub use params::{ListenerParams, SourceParams};
pub use source::AlSource;

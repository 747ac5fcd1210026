//! Playback sources: configuration, buffer assignment and play/stop
//! bookkeeping.

use crate::context::{AlContext, BufferId, SourceId};
use crate::dispatch::DispatchTable;
use crate::error::{AlError, Result};
use crate::events::AlEvent;
use crate::format::SourceState;
use crate::params::SourceParams;
use crate::sys::*;

/// One playback voice.
///
/// `is_playing` tracks whether this source holds an active attachment to its
/// buffer (and so contributes to the buffer's bound count). It is set by
/// `play` and cleared only by `stop`; see [`SourceState`] for what the driver
/// itself reports.
#[derive(Debug, Clone)]
pub struct AlSource {
    pub(crate) id: SourceId,
    pub(crate) native: ALuint,
    pub(crate) buffer: Option<BufferId>,
    pub(crate) playing: bool,
}

impl AlSource {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn native_id(&self) -> u32 {
        self.native
    }

    /// The assigned buffer. Kept after `stop`.
    pub fn buffer(&self) -> Option<BufferId> {
        self.buffer
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

fn apply(table: &DispatchTable, native: ALuint, params: &SourceParams) {
    // SAFETY: native is a live source name; vectors were validated to hold
    // exactly three floats.
    unsafe {
        if let Some(looping) = params.looping {
            (table.source_i)(native, AL_LOOPING, ALint::from(looping));
        }
        for (param, value) in params.scalars() {
            (table.source_f)(native, param, value);
        }
        for (param, values) in params.vectors() {
            (table.source_fv)(native, param, values.as_ptr());
        }
    }
}

impl AlContext {
    fn source_entry(&self, id: SourceId) -> Result<&AlSource> {
        self.sources.get(&id).ok_or(AlError::UnknownObject(id.into()))
    }

    fn check_buffer(&self, id: BufferId) -> Result<()> {
        if self.buffers.contains_key(&id) {
            Ok(())
        } else {
            Err(AlError::UnknownObject(id.into()))
        }
    }

    /// Creates a source, optionally with a buffer assigned.
    pub fn create_source(&mut self, buffer: Option<BufferId>) -> Result<SourceId> {
        if let Some(buffer_id) = buffer {
            self.check_buffer(buffer_id)?;
        }

        let mut native: ALuint = 0;
        // SAFETY: room for exactly one name.
        unsafe { (self.table.gen_sources)(1, &mut native) };

        let id = SourceId::next();
        self.sources.insert(
            id,
            AlSource {
                id,
                native,
                buffer,
                playing: false,
            },
        );
        self.ring.push_front(id.into());
        log::debug!("Created {} (native {})", id, native);
        self.push_event(AlEvent::SourceCreated { source_id: id });
        Ok(id)
    }

    /// Forwards the set fields of `params` to the driver. Unset fields are
    /// left untouched; nothing is forwarded if any vector is malformed.
    pub fn change_source(&self, id: SourceId, params: &SourceParams) -> Result<()> {
        params.validate()?;
        let source = self.source_entry(id)?;
        apply(&self.table, source.native, params);
        Ok(())
    }

    /// Assigns or clears the source's buffer. Not allowed while playing.
    pub fn set_source_buffer(&mut self, id: SourceId, buffer: Option<BufferId>) -> Result<()> {
        if let Some(buffer_id) = buffer {
            self.check_buffer(buffer_id)?;
        }
        let source = self
            .sources
            .get_mut(&id)
            .ok_or(AlError::UnknownObject(id.into()))?;
        if source.playing {
            return Err(AlError::SourcePlaying { source_id: id });
        }
        source.buffer = buffer;
        Ok(())
    }

    /// Starts playback.
    ///
    /// A playing source is stopped first. `params` are applied and `buffer`,
    /// if given, replaces the assigned one; then the assigned buffer's bound
    /// count is raised and the driver starts playing. All preconditions are
    /// checked before anything changes.
    pub fn play(
        &mut self,
        id: SourceId,
        buffer: Option<BufferId>,
        params: &SourceParams,
    ) -> Result<()> {
        params.validate()?;
        let source = self.source_entry(id)?;
        let buffer_id = buffer
            .or(source.buffer)
            .ok_or(AlError::NoBufferAssigned { source_id: id })?;
        self.check_buffer(buffer_id)?;

        self.stop(id)?;

        let native = self.source_entry(id)?.native;
        apply(&self.table, native, params);

        let native_buffer = match self.buffers.get_mut(&buffer_id) {
            Some(target) => {
                target.bound += 1;
                target.native
            }
            None => return Err(AlError::UnknownObject(buffer_id.into())),
        };
        if let Some(source) = self.sources.get_mut(&id) {
            source.buffer = Some(buffer_id);
            source.playing = true;
        }

        // SAFETY: both names are live; buffer names always fit in ALint.
        unsafe {
            (self.table.source_i)(native, AL_BUFFER, native_buffer as ALint);
            (self.table.source_play)(native);
        }
        log::debug!("Playing {} from {}", id, buffer_id);
        self.push_event(AlEvent::SourceStarted {
            source_id: id,
            buffer_id,
        });
        Ok(())
    }

    /// Stops playback and detaches the buffer on the driver side. The
    /// assigned buffer is kept. Does nothing if the source is not playing.
    pub fn stop(&mut self, id: SourceId) -> Result<()> {
        let source = self
            .sources
            .get_mut(&id)
            .ok_or(AlError::UnknownObject(id.into()))?;
        if !source.playing {
            return Ok(());
        }
        source.playing = false;
        let native = source.native;
        let assigned = source.buffer;

        // SAFETY: native is a live source name.
        unsafe {
            (self.table.source_stop)(native);
            (self.table.source_i)(native, AL_BUFFER, AL_NONE);
        }

        match assigned.and_then(|buffer_id| self.buffers.get_mut(&buffer_id)) {
            Some(buffer) => buffer.bound = buffer.bound.saturating_sub(1),
            None => log::warn!("{} stopped after its buffer was released", id),
        }
        log::debug!("Stopped {}", id);
        self.push_event(AlEvent::SourceStopped { source_id: id });
        Ok(())
    }

    /// Current playback offset in seconds, as reported by the driver.
    pub fn source_time(&self, id: SourceId) -> Result<f32> {
        let source = self.source_entry(id)?;
        let mut seconds: ALfloat = 0.0;
        // SAFETY: out-pointer to one float.
        unsafe { (self.table.get_source_f)(source.native, AL_SEC_OFFSET, &mut seconds) };
        Ok(seconds)
    }

    /// Driver-side playback state.
    pub fn source_state(&self, id: SourceId) -> Result<SourceState> {
        let source = self.source_entry(id)?;
        let mut value: ALint = 0;
        // SAFETY: out-pointer to one int.
        unsafe { (self.table.get_source_i)(source.native, AL_SOURCE_STATE, &mut value) };
        SourceState::from_raw(value).ok_or(AlError::UnexpectedDriverValue {
            query: "AL_SOURCE_STATE",
            value,
        })
    }
}

//! Sample buffers and the upload path shared by creation and rewrite.

use crate::config::BufferDesc;
use crate::context::{AlContext, BufferId};
use crate::dispatch::DispatchTable;
use crate::error::{AlError, Result};
use crate::events::AlEvent;
use crate::format::SampleFormat;
use crate::sys::*;
use std::time::Duration;

/// One block of PCM data held by the driver.
#[derive(Debug, Clone)]
pub struct AlBuffer {
    pub(crate) id: BufferId,
    pub(crate) native: ALuint,
    pub(crate) format: SampleFormat,
    pub(crate) frequency: u32,
    pub(crate) size: usize,
    /// Sources currently playing from this buffer.
    pub(crate) bound: u32,
}

impl AlBuffer {
    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn native_id(&self) -> u32 {
        self.native
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Size of the last uploaded payload in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bound(&self) -> u32 {
        self.bound
    }

    pub fn is_bound(&self) -> bool {
        self.bound > 0
    }

    /// Playback length of the uploaded payload at its recorded frequency.
    pub fn duration(&self) -> Duration {
        if self.frequency == 0 {
            return Duration::ZERO;
        }
        let frames = self.size / self.format.frame_size();
        Duration::from_secs_f64(frames as f64 / self.frequency as f64)
    }
}

fn payload_len(data: &[u8]) -> Result<ALsizei> {
    ALsizei::try_from(data.len()).map_err(|_| AlError::PayloadTooLarge { size: data.len() })
}

fn driver_frequency(frequency: u32) -> Result<ALsizei> {
    match ALsizei::try_from(frequency) {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AlError::InvalidFrequency(frequency)),
    }
}

/// Uploads `data` and records the new attributes. Nothing changes unless
/// every check passes.
fn upload(
    table: &DispatchTable,
    buffer: &mut AlBuffer,
    data: &[u8],
    format: SampleFormat,
    frequency: u32,
) -> Result<()> {
    if buffer.bound != 0 {
        return Err(AlError::BufferInUse {
            buffer_id: buffer.id,
            bound: buffer.bound,
        });
    }
    let size = payload_len(data)?;
    let driver_freq = driver_frequency(frequency)?;

    // SAFETY: data is readable for `size` bytes for the duration of the call.
    unsafe {
        (table.buffer_data)(
            buffer.native,
            format.to_raw(),
            data.as_ptr().cast(),
            size,
            driver_freq,
        );
    }

    buffer.format = format;
    buffer.frequency = frequency;
    buffer.size = data.len();
    log::debug!(
        "Wrote {} bytes to {} ({:?} @ {} Hz)",
        data.len(),
        buffer.id,
        format,
        frequency
    );
    Ok(())
}

impl AlContext {
    /// Creates a buffer, uploading `desc.data` if given.
    ///
    /// Payload and frequency are checked before a native buffer is generated;
    /// a failed upload deletes it again, so an error never leaves an object
    /// behind.
    pub fn create_buffer(&mut self, desc: BufferDesc<'_>) -> Result<BufferId> {
        if let Some(data) = desc.data {
            payload_len(data)?;
        }
        driver_frequency(desc.frequency)?;

        let mut native: ALuint = 0;
        // SAFETY: room for exactly one name.
        unsafe { (self.table.gen_buffers)(1, &mut native) };

        let mut buffer = AlBuffer {
            id: BufferId::next(),
            native,
            format: desc.format,
            frequency: desc.frequency,
            size: 0,
            bound: 0,
        };
        if let Some(data) = desc.data {
            if let Err(e) = upload(&self.table, &mut buffer, data, desc.format, desc.frequency) {
                // SAFETY: one valid name is passed.
                unsafe { (self.table.delete_buffers)(1, &native) };
                return Err(e);
            }
        }

        let id = buffer.id;
        let size = buffer.size;
        self.buffers.insert(id, buffer);
        self.ring.push_front(id.into());
        log::debug!("Created {} (native {})", id, native);

        self.push_event(AlEvent::BufferCreated { buffer_id: id });
        if desc.data.is_some() {
            self.push_event(AlEvent::BufferWritten { buffer_id: id, size });
        }
        Ok(id)
    }

    /// Replaces a buffer's contents. `format` and `frequency` default to the
    /// buffer's current values.
    ///
    /// Fails with [`AlError::BufferInUse`] while any source is playing from
    /// the buffer; the recorded attributes are then left untouched.
    pub fn write_buffer(
        &mut self,
        id: BufferId,
        data: &[u8],
        format: Option<SampleFormat>,
        frequency: Option<u32>,
    ) -> Result<()> {
        let buffer = self
            .buffers
            .get_mut(&id)
            .ok_or(AlError::UnknownObject(id.into()))?;
        let format = format.unwrap_or(buffer.format);
        let frequency = frequency.unwrap_or(buffer.frequency);
        upload(&self.table, buffer, data, format, frequency)?;

        self.push_event(AlEvent::BufferWritten {
            buffer_id: id,
            size: data.len(),
        });
        Ok(())
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use petalsonic_al::{
    AlContext, AlError, BufferDesc, ContextDesc, ListenerParams, Pose, SampleFormat,
    SourceParams, Vec3,
};
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;
const TONE_HZ: f32 = 440.0;

#[derive(Parser, Debug)]
#[command(
    name = "petalsonic-al-demo",
    about = "Plays a tone orbiting the listener through the system OpenAL driver"
)]
pub struct Options {
    /// Driver library file name or path (overrides PETALSONIC_AL_LIBRARY).
    #[arg(long)]
    pub library: Option<String>,

    /// Output device name (overrides PETALSONIC_AL_DEVICE).
    #[arg(long)]
    pub device: Option<String>,

    /// How long the tone orbits, in seconds.
    #[arg(long, default_value_t = 4)]
    pub seconds: u32,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Options {
    fn context_desc(&self) -> ContextDesc {
        let mut desc = ContextDesc::from_env();
        if let Some(library) = &self.library {
            desc = desc.library(library.as_str());
        }
        if let Some(device) = &self.device {
            desc = desc.device(device.as_str());
        }
        desc
    }
}

/// True when `err` comes from calling the audio API incorrectly rather than
/// from the driver or the environment.
pub fn is_usage_failure(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<AlError>())
        .any(AlError::is_usage_error)
}

/// One second of a sine tone as 16-bit little endian mono PCM.
fn sine_tone() -> Vec<u8> {
    (0..SAMPLE_RATE)
        .flat_map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let sample = (t * TONE_HZ * std::f32::consts::TAU).sin() * 0.4;
            ((sample * i16::MAX as f32) as i16).to_le_bytes()
        })
        .collect()
}

pub fn run(options: &Options) -> Result<()> {
    let desc = options.context_desc();
    log::info!("Opening {}", desc.library_name());
    let mut context = AlContext::open(&desc).context("failed to open audio context")?;

    let pcm = sine_tone();
    let buffer = context.create_buffer(
        BufferDesc::new()
            .data(&pcm)
            .format(SampleFormat::Mono16)
            .frequency(SAMPLE_RATE),
    )?;
    let source = context.create_source(Some(buffer))?;
    log::info!(
        "Tone buffer ready: {} bytes, {:?}",
        context.buffer(buffer).map_or(0, |b| b.size()),
        context.buffer(buffer).map(|b| b.duration())
    );

    context.set_distance_model(AlContext::INVERSE_DISTANCE_CLAMPED);
    context
        .listener()
        .change(&ListenerParams::new().gain(1.0).pose(Pose::identity()))?;

    context.play(
        source,
        None,
        &SourceParams::new()
            .looping(true)
            .reference_distance(1.0)
            .position(Vec3::new(0.0, 0.0, -2.0)),
    )?;

    // Orbit the source around the listener.
    let steps = options.seconds * 20;
    for step in 0..steps {
        let angle = step as f32 / 20.0 * std::f32::consts::PI;
        let position = Vec3::new(angle.sin() * 2.0, 0.0, -angle.cos() * 2.0);
        context.change_source(source, &SourceParams::new().position(position))?;
        if step % 20 == 0 {
            log::info!(
                "t = {:.2}s, source at {:?}, state {:?}",
                context.source_time(source)?,
                position,
                context.source_state(source)?
            );
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    context.stop(source)?;
    context.release(source)?;
    context.release(buffer)?;
    if context.dropped_events() > 0 {
        log::debug!("{} event(s) dropped", context.dropped_events());
    }
    for event in context.poll_events() {
        log::debug!("{}: {:?}", event.object(), event);
    }
    if let Some(code) = context.driver_error() {
        log::warn!("Driver reported {}", petalsonic_al::sys::error_name(code));
    }
    Ok(())
}

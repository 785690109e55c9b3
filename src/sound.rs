use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use log::warn;

const TONE_HZ: f32 = 440.0;

/// Square-wave beeper driven by the sound timer.
///
/// The stream is built once, paused, and toggled through `set_active`;
/// repeated starts or stops while already in that state are no-ops, so the
/// frame loop can feed it the derived tone state every tick.
pub struct Beeper {
    stream: cpal::Stream,
    playing: bool,
}

impl Beeper {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no audio output device available"))?;
        let config = device
            .default_output_config()
            .context("querying audio output config")?;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(&device, &config.into()),
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(&device, &config.into()),
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(&device, &config.into()),
            sample_format => Err(anyhow!("unsupported sample format '{sample_format}'")),
        }?;
        stream.pause().context("pausing audio stream")?;

        Ok(Self {
            stream,
            playing: false,
        })
    }

    fn build_stream<T>(device: &cpal::Device, config: &cpal::StreamConfig) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            let phase = sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate;
            // square wave
            if phase.sin() > 0.0 {
                0.25
            } else {
                -0.25
            }
        };

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let value: T = T::from_sample(next_value());
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                |err| warn!("audio stream error: {err}"),
                None,
            )
            .context("building audio stream")?;
        Ok(stream)
    }

    /// Starts or stops the tone to match `active`. Idempotent.
    pub fn set_active(&mut self, active: bool) {
        if active == self.playing {
            return;
        }
        let result = if active {
            self.stream.play().map_err(anyhow::Error::from)
        } else {
            self.stream.pause().map_err(anyhow::Error::from)
        };
        match result {
            Ok(()) => self.playing = active,
            Err(e) => warn!("audio {} failed: {e}", if active { "start" } else { "stop" }),
        }
    }
}

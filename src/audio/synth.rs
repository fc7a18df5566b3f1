use std::f32::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use super::{VOICES, Voice, Waveform};

pub const SAMPLE_RATE: u32 = 44_100;

/// Frequencies shared between the game thread and the audio callback.
/// Stored as `f32` bit patterns so updates never block the callback.
#[derive(Debug, Clone)]
pub struct ChordControl {
    frequencies: Arc<[AtomicU32; 4]>,
}

impl ChordControl {
    pub fn new() -> Self {
        let bits = VOICES.map(|voice| AtomicU32::new(voice.base.to_bits()));
        Self {
            frequencies: Arc::new(bits),
        }
    }

    pub fn set_frequencies(&self, frequencies: [f32; 4]) {
        for (slot, hz) in self.frequencies.iter().zip(frequencies) {
            slot.store(hz.to_bits(), Ordering::Relaxed);
        }
    }

    pub fn frequency(&self, voice: usize) -> f32 {
        f32::from_bits(self.frequencies[voice].load(Ordering::Relaxed))
    }
}

impl Default for ChordControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Endless mono stream mixing the four chord voices
pub struct Chord {
    control: ChordControl,
    phases: [f32; 4],
    sample_rate: u32,
}

impl Chord {
    pub fn new(control: ChordControl) -> Self {
        Self {
            control,
            phases: [0.0; 4],
            sample_rate: SAMPLE_RATE,
        }
    }

    fn voice_sample(voice: &Voice, phase: f32) -> f32 {
        let wave = match voice.waveform {
            Waveform::Sine => (phase * TAU).sin(),
            // Same phase as the sine: +1 at 0.25, -1 at 0.75
            Waveform::Triangle => {
                let u = (phase - 0.25).rem_euclid(1.0);
                1.0 - 4.0 * u.min(1.0 - u)
            }
        };
        wave * voice.gain
    }
}

impl Iterator for Chord {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let mut mix = 0.0;
        for (i, voice) in VOICES.iter().enumerate() {
            mix += Self::voice_sample(voice, self.phases[i]);
            let step = self.control.frequency(i) / self.sample_rate as f32;
            self.phases[i] = (self.phases[i] + step).fract();
        }
        Some(mix)
    }
}

#[cfg(feature = "audio")]
impl rodio::Source for Chord {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<std::time::Duration> {
        None
    }
}

/// Chord played on the default output device
#[cfg(feature = "audio")]
pub struct RodioOutput {
    _stream: rodio::OutputStream,
    sink: rodio::Sink,
    control: ChordControl,
}

#[cfg(feature = "audio")]
impl RodioOutput {
    pub fn open() -> anyhow::Result<Self> {
        use anyhow::Context;

        let (stream, handle) =
            rodio::OutputStream::try_default().context("no audio output device")?;
        let sink = rodio::Sink::try_new(&handle).context("failed to create audio sink")?;
        let control = ChordControl::new();
        sink.pause();
        sink.append(Chord::new(control.clone()));
        Ok(Self {
            _stream: stream,
            sink,
            control,
        })
    }
}

#[cfg(feature = "audio")]
impl super::ToneOutput for RodioOutput {
    fn set_frequencies(&mut self, frequencies: [f32; 4]) {
        self.control.set_frequencies(frequencies);
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn resume(&mut self) {
        self.sink.play();
    }
}

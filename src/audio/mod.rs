//! Reactive background music
//!
//! A C-E-G-C chord starts when the game is unlocked. Every
//! [`SYNC_INTERVAL`] the director samples the session and retunes all voices
//! by `1 + score/1000 + level/10`. The sound itself goes through a
//! [`ToneOutput`]; when no device can be opened the game keeps running with
//! [`Silent`] output.

pub mod synth;

use std::time::Duration;

use crate::game::MusicCue;

/// How often the music follows the score
pub const SYNC_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    /// Frequency at score 0, level 0, in Hz
    pub base: f32,
    pub waveform: Waveform,
    pub gain: f32,
}

/// C4, E4, G4, C5. Even voices are sines, odd voices triangles, and each
/// voice is 20% quieter than the one below it.
pub const VOICES: [Voice; 4] = [
    Voice {
        base: 261.63,
        waveform: Waveform::Sine,
        gain: 0.05,
    },
    Voice {
        base: 329.63,
        waveform: Waveform::Triangle,
        gain: 0.04,
    },
    Voice {
        base: 392.00,
        waveform: Waveform::Sine,
        gain: 0.03,
    },
    Voice {
        base: 523.25,
        waveform: Waveform::Triangle,
        gain: 0.02,
    },
];

/// Pitch multiplier for the current score and level
pub fn pitch_factor(score: u32, level: u32) -> f32 {
    1.0 + score as f32 / 1000.0 + level as f32 / 10.0
}

/// Something that can sound the chord
pub trait ToneOutput {
    fn set_frequencies(&mut self, frequencies: [f32; 4]);
    fn pause(&mut self);
    fn resume(&mut self);
}

/// Output used when audio is disabled or unavailable
#[derive(Debug, Default)]
pub struct Silent;

impl ToneOutput for Silent {
    fn set_frequencies(&mut self, _frequencies: [f32; 4]) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
}

/// Open the best available output. Never fails: problems are logged and the
/// game continues without music.
pub fn open_output(muted: bool) -> Box<dyn ToneOutput> {
    if muted {
        tracing::info!("music muted");
        return Box::new(Silent);
    }

    #[cfg(feature = "audio")]
    {
        match synth::RodioOutput::open() {
            Ok(output) => {
                tracing::info!("music output ready");
                Box::new(output)
            }
            Err(err) => {
                tracing::warn!(
                    error = %format!("{err:#}"),
                    "audio unavailable, playing without music"
                );
                Box::new(Silent)
            }
        }
    }

    #[cfg(not(feature = "audio"))]
    {
        tracing::warn!("built without the `audio` feature, playing without music");
        Box::new(Silent)
    }
}

/// Drives a [`ToneOutput`] from session snapshots
pub struct MusicDirector {
    output: Box<dyn ToneOutput>,
    started: bool,
    playing: bool,
    frequencies: [f32; 4],
}

impl MusicDirector {
    pub fn new(output: Box<dyn ToneOutput>) -> Self {
        Self {
            output,
            started: false,
            playing: false,
            frequencies: VOICES.map(|v| v.base),
        }
    }

    /// Start the chord at its base pitch; called on unlock
    pub fn start(&mut self) {
        self.frequencies = VOICES.map(|v| v.base);
        self.output.set_frequencies(self.frequencies);
        if !self.playing {
            self.output.resume();
        }
        self.started = true;
        self.playing = true;
    }

    /// Follow the session: retune while playing, hold while not
    pub fn sync(&mut self, cue: MusicCue) {
        if !self.started {
            return;
        }

        if !cue.playing {
            if self.playing {
                self.output.pause();
                self.playing = false;
            }
            return;
        }

        let factor = pitch_factor(cue.score, cue.level);
        self.frequencies = VOICES.map(|v| v.base * factor);
        self.output.set_frequencies(self.frequencies);
        if !self.playing {
            self.output.resume();
            self.playing = true;
        }
    }

    pub fn frequencies(&self) -> [f32; 4] {
        self.frequencies
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

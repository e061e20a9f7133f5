//! Audio cues played when a cycle is almost finished or finished.

use ::std::{io::Write, time::Duration};

use ::coinwash_common::tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// One oscillator of a tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub frequency_hz: f32,
    pub waveform: Waveform,
}

/// Oscillators played together, with a gain ramping exponentially
/// from `start_gain` to `end_gain` over `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSpec {
    pub voices: Vec<Voice>,
    pub duration: Duration,
    pub start_gain: f32,
    pub end_gain: f32,
}

impl ToneSpec {
    /// Gain at `elapsed` since the tone started, silent after `duration`.
    pub fn gain_at(&self, elapsed: Duration) -> f32 {
        if elapsed > self.duration {
            return 0.0;
        }
        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.start_gain * (self.end_gain / self.start_gain).powf(progress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A cycle is almost finished
    Warning,
    /// A cycle is finished
    Finish,
}

impl Tone {
    pub fn spec(self) -> ToneSpec {
        match self {
            // a short square beep
            Tone::Warning => ToneSpec {
                voices: vec![Voice {
                    frequency_hz: 800.0,
                    waveform: Waveform::Square,
                }],
                duration: Duration::from_millis(500),
                start_gain: 0.3,
                end_gain: 0.01,
            },
            // C5 and E5
            Tone::Finish => ToneSpec {
                voices: vec![
                    Voice {
                        frequency_hz: 523.25,
                        waveform: Waveform::Sine,
                    },
                    Voice {
                        frequency_hz: 659.25,
                        waveform: Waveform::Sine,
                    },
                ],
                duration: Duration::from_secs(1),
                start_gain: 0.2,
                end_gain: 0.01,
            },
        }
    }
}

/// Something able to play a [Tone].
pub trait Speaker: Send {
    fn play(&mut self, tone: Tone) -> std::io::Result<()>;
}

/// Rings the terminal bell, once for a warning and twice for a finish.
pub struct TerminalBell<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> Speaker for TerminalBell<W> {
    fn play(&mut self, tone: Tone) -> std::io::Result<()> {
        let spec = tone.spec();
        debug!(
            "Playing {:?} tone of {:?} for {:?}, gain {} -> {}",
            tone,
            spec.voices,
            spec.duration,
            spec.gain_at(Duration::ZERO),
            spec.gain_at(spec.duration)
        );
        let rings = match tone {
            Tone::Warning => 1,
            Tone::Finish => 2,
        };
        for _ in 0..rings {
            self.out.write_all(b"\x07")?;
        }
        self.out.flush()
    }
}

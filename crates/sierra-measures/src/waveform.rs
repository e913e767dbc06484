//! Temporal-variance waveforms
//!
//! A [`Waveform`] describes how an environmental parameter (a throttle or a
//! penalty) varies over simulated time.

use crate::curve::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt::{self, Display, Formatter};

/// Waveform family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveformKind {
    /// `offset + amplitude`
    Constant,
    /// Sinusoid
    Sine,
    /// Square wave
    Square,
    /// Rising sawtooth
    Sawtooth,
    /// Step from `offset` up by `amplitude` at `t = phase`
    StepU,
    /// Step from `offset + amplitude` down to `offset` at `t = phase`
    StepD,
}

impl WaveformKind {
    /// Name used in templates and criterion tokens
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::Sine => "Sine",
            Self::Square => "Square",
            Self::Sawtooth => "Sawtooth",
            Self::StepU => "StepU",
            Self::StepD => "StepD",
        }
    }

    /// Check if the waveform is a single step
    #[inline]
    #[must_use]
    pub fn is_step(self) -> bool {
        matches!(self, Self::StepU | Self::StepD)
    }
}

impl Display for WaveformKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fully parameterized waveform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
    /// Family
    pub kind: WaveformKind,
    /// Cycles per timestep (ignored by constant and step waveforms)
    pub frequency: f64,
    /// Peak deviation from `offset`
    pub amplitude: f64,
    /// Vertical shift
    pub offset: f64,
    /// Phase in radians, or the step time for step waveforms
    pub phase: f64,
}

impl Waveform {
    /// Flat zero waveform: the ideal, variance-free environment
    #[must_use]
    pub fn ideal() -> Self {
        Self {
            kind: WaveformKind::Constant,
            frequency: 0.0,
            amplitude: 0.0,
            offset: 0.0,
            phase: 0.0,
        }
    }

    /// Value at timestep `t`
    #[must_use]
    pub fn value_at(&self, t: f64) -> f64 {
        let angle = TAU * self.frequency * t + self.phase;
        let shape = match self.kind {
            WaveformKind::Constant => 1.0,
            WaveformKind::Sine => angle.sin(),
            WaveformKind::Square => {
                if angle.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            WaveformKind::Sawtooth => {
                let cycles = angle / TAU;
                2.0 * (cycles - cycles.floor()) - 1.0
            }
            WaveformKind::StepU => {
                if t >= self.phase {
                    1.0
                } else {
                    0.0
                }
            }
            WaveformKind::StepD => {
                if t >= self.phase {
                    0.0
                } else {
                    1.0
                }
            }
        };
        self.offset + self.amplitude * shape
    }

    /// Sample `n` points evenly over `[0, length)` timesteps
    #[must_use]
    pub fn sample(&self, length: u64, n: usize) -> Vec<Point> {
        if n == 0 {
            return Vec::new();
        }
        let step = length as f64 / n as f64;
        (0..n)
            .map(|k| {
                let t = k as f64 * step;
                (t, self.value_at(t))
            })
            .collect()
    }
}

impl Display for Waveform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            WaveformKind::Constant => write!(f, "{}(A={})", self.kind, self.amplitude),
            WaveformKind::StepU | WaveformKind::StepD => {
                write!(f, "{}(A={},T={})", self.kind, self.amplitude, self.phase)
            }
            _ => write!(f, "{}(A={},f={})", self.kind, self.amplitude, self.frequency),
        }
    }
}

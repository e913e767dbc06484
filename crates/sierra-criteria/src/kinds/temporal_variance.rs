//! `temporal_variance.<BC|BM|M><Sine|Square|Sawtooth|StepU|StepD>[.Z<n>]`
//!
//! The first experiment is the variance-free ideal. The rest sweep the
//! configured frequencies (or step times) against the configured amplitudes.
//! Ticks measure how far each waveform is from the ideal one.

use crate::config::{CriteriaConfig, VarianceSchedule};
use crate::def::{ExpDef, ExpLabel};
use crate::error::{CriteriaError, CriteriaResult, ParseError};
use crate::grammar::optional_swarm_size;
use crate::kinds::swarm_size;
use once_cell::sync::Lazy;
use regex::Regex;
use sierra_changeset::{ChangeSet, ChangeSetBuilder, ElementPath};
use sierra_measures::{Waveform, WaveformKind};

pub(crate) const CATEGORY: &str = "temporal_variance";

const EXPECTED: &str = "<BC|BM|M><Sine|Square|Sawtooth|StepU|StepD>";

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(BC|BM|M)(Sine|Square|Sawtooth|StepU|StepD)$")
        .expect("Invalid temporal variance regex")
});

/// Environmental parameter driven by the waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarianceType {
    /// Throttle on robot speed while carrying a block
    BlockCarry,
    /// Penalty on picking up and dropping blocks
    BlockManipulation,
    /// Throttle on all robot motion
    Motion,
}

impl VarianceType {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "BC" => Some(Self::BlockCarry),
            "BM" => Some(Self::BlockManipulation),
            "M" => Some(Self::Motion),
            _ => None,
        }
    }

    /// Waveform element edited by this variance type
    #[must_use]
    pub fn waveform_path(self) -> ElementPath {
        match self {
            Self::BlockCarry => ElementPath::descendant(&[
                "temporal_variance",
                "blocks",
                "carry_throttle",
                "waveform",
            ]),
            Self::BlockManipulation => ElementPath::descendant(&[
                "temporal_variance",
                "blocks",
                "manipulation_penalty",
                "waveform",
            ]),
            Self::Motion => {
                ElementPath::descendant(&["temporal_variance", "motion_throttle", "waveform"])
            }
        }
    }

    /// Axis title
    #[must_use]
    pub fn xlabel(self) -> &'static str {
        match self {
            Self::BlockCarry => "Block Carry Throttle Distance From Ideal",
            Self::BlockManipulation => "Block Manipulation Penalty Distance From Ideal",
            Self::Motion => "Motion Throttle Distance From Ideal",
        }
    }
}

fn waveform_kind(name: &str) -> Option<WaveformKind> {
    match name {
        "Sine" => Some(WaveformKind::Sine),
        "Square" => Some(WaveformKind::Square),
        "Sawtooth" => Some(WaveformKind::Sawtooth),
        "StepU" => Some(WaveformKind::StepU),
        "StepD" => Some(WaveformKind::StepD),
        _ => None,
    }
}

/// Waveform sweep over one environmental parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalVariance {
    /// Parameter being varied
    pub variance_type: VarianceType,
    /// Waveform family
    pub family: WaveformKind,
    /// Fixed robot count for every experiment
    pub swarm_size: Option<usize>,
}

impl TemporalVariance {
    pub(crate) fn parse(fields: &[&str]) -> Result<Self, ParseError> {
        let (definition, rest) = fields
            .split_first()
            .ok_or_else(|| ParseError::grammar(CATEGORY, EXPECTED))?;
        let caps = DEFINITION
            .captures(definition)
            .ok_or_else(|| ParseError::grammar(*definition, EXPECTED))?;

        let variance_type = VarianceType::from_code(&caps[1])
            .ok_or_else(|| ParseError::grammar(*definition, EXPECTED))?;
        let family =
            waveform_kind(&caps[2]).ok_or_else(|| ParseError::grammar(*definition, EXPECTED))?;

        Ok(Self {
            variance_type,
            family,
            swarm_size: optional_swarm_size(rest)?,
        })
    }

    /// Ideal waveform followed by every swept waveform, in batch order
    ///
    /// # Errors
    /// Returns error if the schedule leaves nothing to sweep
    pub fn waveforms(&self, schedule: &VarianceSchedule) -> CriteriaResult<Vec<Waveform>> {
        let (firsts, knob) = if self.family.is_step() {
            (&schedule.step_times, "step_times")
        } else {
            (&schedule.frequencies, "frequencies")
        };
        if firsts.is_empty() || schedule.amplitudes.is_empty() {
            return Err(CriteriaError::precondition(format!(
                "temporal variance {} needs non-empty {knob} and amplitudes",
                self.family
            )));
        }

        let mut waveforms = vec![Waveform::ideal()];
        for &first in firsts {
            for &amplitude in &schedule.amplitudes {
                waveforms.push(if self.family.is_step() {
                    Waveform {
                        kind: self.family,
                        frequency: 0.0,
                        amplitude,
                        offset: 0.0,
                        phase: first,
                    }
                } else {
                    Waveform {
                        kind: self.family,
                        frequency: first,
                        amplitude,
                        offset: amplitude,
                        phase: 0.0,
                    }
                });
            }
        }
        Ok(waveforms)
    }

    /// Distance of each waveform from the ideal one
    ///
    /// # Errors
    /// Returns error if the schedule is empty or the sampling yields no points
    pub fn ticks(&self, cfg: &CriteriaConfig) -> CriteriaResult<Vec<f64>> {
        let ideal = Waveform::ideal().sample(cfg.exp_length, cfg.n_datapoints);
        self.waveforms(&cfg.temporal_variance)?
            .iter()
            .map(|w| -> CriteriaResult<f64> {
                let curve = w.sample(cfg.exp_length, cfg.n_datapoints);
                Ok(cfg.similarity.distance(&curve, &ideal)?)
            })
            .collect()
    }

    fn changes(&self, waveform: &Waveform) -> ChangeSet {
        let path = self.variance_type.waveform_path();
        let mut builder = ChangeSetBuilder::new()
            .set(&path, "type", waveform.kind)
            .set(&path, "frequency", waveform.frequency)
            .set(&path, "amplitude", waveform.amplitude)
            .set(&path, "offset", waveform.offset)
            .set(&path, "phase", waveform.phase);
        if let Some(n) = self.swarm_size {
            builder = builder.merge(&swarm_size::quantity_changes(n));
        }
        builder.build()
    }

    pub(crate) fn expand(&self, cfg: &CriteriaConfig) -> CriteriaResult<Vec<ExpDef>> {
        let waveforms = self.waveforms(&cfg.temporal_variance)?;
        let ticks = self.ticks(cfg)?;

        Ok(waveforms
            .iter()
            .zip(ticks)
            .map(|(w, tick)| {
                let slug = match w.kind {
                    WaveformKind::Constant => format!("{}-A{}", w.kind, w.amplitude),
                    WaveformKind::StepU | WaveformKind::StepD => {
                        format!("{}-A{}-T{}", w.kind, w.amplitude, w.phase)
                    }
                    _ => format!("{}-A{}-F{}", w.kind, w.amplitude, w.frequency),
                };
                let label = ExpLabel {
                    slug,
                    tick,
                    tick_label: w.to_string(),
                };
                ExpDef::new(self.changes(w), label, self.swarm_size)
            })
            .collect())
    }
}

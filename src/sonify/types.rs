use std::num::NonZeroUsize;

pub type MidiPitch = u8;
pub type Velocity = u8;
/// Timeline position/duration in uniform steps (one step per source sample).
pub type Step = u32;

/// Highest valid MIDI pitch and velocity.
pub const MIDI_MAX: u8 = 127;

/// Errors that can occur during sonification
#[derive(Debug, thiserror::Error)]
pub enum SonifyError {
    /// Pitch range violates 0 <= min < max <= 127
    #[error("invalid pitch range: need min_pitch < max_pitch <= 127, got min={min}, max={max}")]
    InvalidRange { min: u8, max: u8 },

    /// Below-bound cutoff outside [min_pitch, max_pitch)
    #[error("invalid below bound {bound}: must lie in [{min}, {max})")]
    InvalidBound { bound: u8, min: u8, max: u8 },

    /// Zero-length input sequence
    #[error("cannot sonify an empty sequence")]
    EmptySequence,

    /// NaN or infinite value in the input
    #[error("non-finite value {0} in input sequence")]
    InvalidValue(f64),

    /// Matrix rows of unequal length
    #[error("matrix tracks must be aligned: expected {expected} samples, got {actual}")]
    MismatchedTrackLength { expected: usize, actual: usize },

    /// Tempo outside what a MIDI tempo meta event can carry
    #[error("invalid tempo {0} BPM: must be at least 4 (MIDI stores tempo as 24-bit microseconds)")]
    InvalidTempo(u32),

    /// Velocity above the MIDI ceiling
    #[error("invalid velocity {0}: must be at most 127")]
    InvalidVelocity(u8),

    /// IO errors when writing the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated, non-empty, one-dimensional sequence of finite values.
///
/// All sonification input passes through this type, so the rest of the
/// pipeline can assume a well-defined observed data range.
#[derive(Debug, Clone)]
pub struct NumericSequence(Vec<f64>);

impl NumericSequence {
    /// Validates and wraps a raw value list.
    ///
    /// # Returns
    /// * `Err(SonifyError::EmptySequence)` for zero-length input
    /// * `Err(SonifyError::InvalidValue)` if any value is NaN or infinite
    pub fn new(values: Vec<f64>) -> Result<Self, SonifyError> {
        if values.is_empty() {
            return Err(SonifyError::EmptySequence);
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(SonifyError::InvalidValue(*bad));
        }
        Ok(NumericSequence(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Observed (data_min, data_max) of the sequence.
    pub fn range(&self) -> (f64, f64) {
        let mut min = self.0[0];
        let mut max = self.0[0];
        for &v in &self.0[1..] {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        (min, max)
    }
}

/// Target pitch range for min-max feature mapping, with an optional
/// below-bound cutoff that silences mapped pitches under the threshold.
#[derive(Debug, Clone, Copy)]
pub struct PitchMapping {
    pub min_pitch: MidiPitch,
    pub max_pitch: MidiPitch,
    pub below_bound: Option<MidiPitch>,
}

impl PitchMapping {
    /// Validates and builds a mapping.
    ///
    /// # Returns
    /// * `Err(SonifyError::InvalidRange)` unless `min_pitch < max_pitch <= 127`
    /// * `Err(SonifyError::InvalidBound)` unless `min_pitch <= bound < max_pitch`
    pub fn new(
        min_pitch: MidiPitch,
        max_pitch: MidiPitch,
        below_bound: Option<MidiPitch>,
    ) -> Result<Self, SonifyError> {
        if min_pitch >= max_pitch || max_pitch > MIDI_MAX {
            return Err(SonifyError::InvalidRange {
                min: min_pitch,
                max: max_pitch,
            });
        }
        if let Some(bound) = below_bound {
            if bound < min_pitch || bound >= max_pitch {
                return Err(SonifyError::InvalidBound {
                    bound,
                    min: min_pitch,
                    max: max_pitch,
                });
            }
        }
        Ok(PitchMapping {
            min_pitch,
            max_pitch,
            below_bound,
        })
    }
}

/// Periodic rest insertion: one rest after every `interval`-th source
/// position. Useful for periodic data (e.g. temperature by month), or for
/// easier listening on long sequences.
#[derive(Debug, Clone, Copy)]
pub struct RestPolicy {
    /// Interval in source-sample positions.
    pub interval: NonZeroUsize,
    /// Rest length in timeline steps.
    pub rest_duration: Step,
}

/// One event on a track timeline. `pitch: None` marks a silent event (a
/// below-bound-filtered note or an inserted rest), which contributes only a
/// duration gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub pitch: Option<MidiPitch>,
    pub start: Step,
    pub duration: Step,
    pub velocity: Velocity,
}

impl NoteEvent {
    pub fn is_silent(&self) -> bool {
        self.pitch.is_none()
    }
}

/// An ordered event sequence derived from exactly one numeric sequence.
#[derive(Debug, Clone)]
pub struct Track {
    events: Vec<NoteEvent>,
    source_len: usize,
}

impl Track {
    pub(crate) fn new(events: Vec<NoteEvent>, source_len: usize) -> Self {
        Track { events, source_len }
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub(crate) fn events_mut(&mut self) -> &mut [NoteEvent] {
        &mut self.events
    }

    /// Number of source samples this track was derived from (rests excluded).
    pub fn source_len(&self) -> usize {
        self.source_len
    }
}

/// How interaction-driven velocity boosts are reconciled with the MIDI
/// velocity ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VelocityCeiling {
    /// Clamp each boosted velocity to 127.
    #[default]
    Clamp,
}

/// Cross-track velocity emphasis for simultaneous notes.
#[derive(Debug, Clone, Copy)]
pub struct InteractionRule {
    /// Additive velocity boost applied to each note of a co-occurrence.
    pub boost: Velocity,
    pub ceiling: VelocityCeiling,
}

impl Default for InteractionRule {
    fn default() -> Self {
        InteractionRule {
            boost: 16,
            ceiling: VelocityCeiling::Clamp,
        }
    }
}

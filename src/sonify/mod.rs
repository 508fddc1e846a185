//! The sonification engine: min-max pitch mapping, below-bound filtering,
//! periodic rest insertion, and cross-track interaction, ending in a
//! one-shot write to a MIDI event sink.
//!
//! Every entry point is a pure function of its inputs: configuration is
//! validated up front (no partial output on bad parameters) and each stage
//! feeds the next in a fixed order — map, filter, rest-schedule, interact,
//! encode.

mod encode;
mod mapper;
mod matrix;
mod schedule;
mod types;

use std::collections::HashSet;
use std::num::NonZeroUsize;

pub use encode::{EventSink, SmfSink};
pub use mapper::pitch;
pub use matrix::{compress_rows, Matrix};
pub use types::{
    InteractionRule, MidiPitch, NoteEvent, NumericSequence, PitchMapping, RestPolicy, SonifyError,
    Step, Track, Velocity, VelocityCeiling, MIDI_MAX,
};

use crate::config::Config;
use crate::text;

/// Everything a sonification call needs beyond the data itself.
///
/// `below_bound` and `rest_interval` are genuinely optional: absent means
/// "no filtering" and "no rests", not a sentinel value.
#[derive(Debug, Clone)]
pub struct SonifyOptions {
    pub max_pitch: MidiPitch,
    pub min_pitch: MidiPitch,
    /// Mapped pitches strictly below this are silenced.
    pub below_bound: Option<MidiPitch>,
    /// Rest after every this-many source positions.
    pub rest_interval: Option<usize>,
    pub tempo_bpm: u32,
    /// Baseline note velocity before interaction.
    pub velocity: Velocity,
    /// Note length in timeline steps.
    pub note_duration: Step,
    /// Rest length in timeline steps.
    pub rest_duration: Step,
    /// Co-occurrence velocity boost for matrix sonification.
    pub boost: Velocity,
}

impl SonifyOptions {
    /// Options with the built-in defaults (120 BPM, velocity 90, one-step
    /// notes, two-step rests).
    pub fn new(max_pitch: MidiPitch, min_pitch: MidiPitch) -> Self {
        Self::from_config(&Config::default(), max_pitch, min_pitch)
    }

    /// Options seeded from a loaded configuration file.
    pub fn from_config(config: &Config, max_pitch: MidiPitch, min_pitch: MidiPitch) -> Self {
        SonifyOptions {
            max_pitch,
            min_pitch,
            below_bound: None,
            rest_interval: None,
            tempo_bpm: config.midi.tempo_bpm,
            velocity: config.midi.velocity,
            note_duration: config.midi.note_duration,
            rest_duration: config.midi.rest_duration,
            boost: config.interaction.boost,
        }
    }

    /// Fail-fast check of the whole configuration, returning the validated
    /// mapping. Tempo and velocity are rejected here rather than letting the
    /// MIDI container silently truncate them: tempo is stored as 24-bit
    /// microseconds per quarter (so anything under 4 BPM cannot be
    /// represented) and velocity is a 7-bit value.
    fn validate(&self) -> Result<PitchMapping, SonifyError> {
        if self.tempo_bpm < 4 {
            return Err(SonifyError::InvalidTempo(self.tempo_bpm));
        }
        if self.velocity > MIDI_MAX {
            return Err(SonifyError::InvalidVelocity(self.velocity));
        }
        PitchMapping::new(self.min_pitch, self.max_pitch, self.below_bound)
    }

    fn rest_policy(&self) -> Option<RestPolicy> {
        let interval = NonZeroUsize::new(self.rest_interval?)?;
        Some(RestPolicy {
            interval,
            rest_duration: self.rest_duration,
        })
    }

    fn interaction_rule(&self) -> InteractionRule {
        InteractionRule {
            boost: self.boost,
            ceiling: VelocityCeiling::Clamp,
        }
    }
}

fn build_track(seq: &NumericSequence, mapping: &PitchMapping, opts: &SonifyOptions) -> Track {
    let pitches = mapper::map_pitches(seq, mapping);
    let filtered = mapper::apply_bound(pitches, mapping.below_bound);
    schedule::build_track(
        filtered,
        opts.rest_policy().as_ref(),
        opts.note_duration,
        opts.velocity,
    )
}

/// Sonifies one float sequence into a single-track MIDI stream.
///
/// Values are mapped onto `[min_pitch, max_pitch]` by min-max feature
/// mapping over the sequence's own observed range, so the melodic contour
/// follows the data's trend. All configuration errors are reported before
/// any processing or output.
pub fn sonify_floats<S: EventSink>(
    data: &[f64],
    opts: &SonifyOptions,
    sink: &mut S,
) -> Result<(), SonifyError> {
    let mapping = opts.validate()?;
    let seq = NumericSequence::new(data.to_vec())?;

    tracing::debug!(samples = seq.len(), "sonifying float sequence");
    let track = build_track(&seq, &mapping, opts);
    sink.write_tracks(opts.tempo_bpm, std::slice::from_ref(&track))?;
    Ok(())
}

/// Sonifies a multi-row matrix into a multi-track MIDI stream.
///
/// Each row becomes one track, mapped over its own observed range exactly as
/// a single sequence would be, then the tracks interact: simultaneous
/// non-silent notes across rows are emphasized by a velocity boost. Rows of
/// unequal length are rejected up front with `MismatchedTrackLength`.
pub fn sonify_matrix<S: EventSink>(
    rows: &[Vec<f64>],
    opts: &SonifyOptions,
    sink: &mut S,
) -> Result<(), SonifyError> {
    let mapping = opts.validate()?;

    let first = rows.first().ok_or(SonifyError::EmptySequence)?;
    for row in rows {
        if row.len() != first.len() {
            return Err(SonifyError::MismatchedTrackLength {
                expected: first.len(),
                actual: row.len(),
            });
        }
    }
    let sequences = rows
        .iter()
        .map(|row| NumericSequence::new(row.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        tracks = sequences.len(),
        samples = first.len(),
        "sonifying matrix"
    );
    let tracks = sequences
        .iter()
        .map(|seq| build_track(seq, &mapping, opts))
        .collect();

    let mut matrix = Matrix::new(tracks, opts.interaction_rule())?;
    matrix.apply_interaction();

    sink.write_tracks(opts.tempo_bpm, matrix.tracks())?;
    Ok(())
}

/// Sonifies text by token frequency.
///
/// The text is tokenized and case-normalized, tokens in `exclusions` are
/// pruned, and each distinct token's occurrence count (in first-occurrence
/// order) becomes the numeric sequence — which then runs through the exact
/// numeric pipeline used by [`sonify_floats`]. Texts whose tokens are all
/// pruned away yield `EmptySequence`.
pub fn sonify_text<S: EventSink>(
    input: &str,
    exclusions: &HashSet<String>,
    opts: &SonifyOptions,
    sink: &mut S,
) -> Result<(), SonifyError> {
    // validate configuration before doing any extraction work
    opts.validate()?;

    let table = text::frequency_table(input, exclusions);
    tracing::debug!(
        distinct_tokens = table.len(),
        total_tokens = table.total(),
        "extracted frequency table"
    );
    sonify_floats(&table.counts(), opts, sink)
}

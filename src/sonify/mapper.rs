use super::types::{MidiPitch, NumericSequence, PitchMapping};

/// Converts a single value to the MIDI pitch that would represent it if the
/// whole sequence were sonified, using min-max feature mapping between the
/// observed data range and the target pitch interval.
///
/// Having this independently of the full-sequence conversion lets callers
/// determine exact pitch values for special cases, as when choosing a
/// below-bound cutoff for a known data value.
///
/// Values outside `[data_min, data_max]` clamp to the nearer endpoint, so
/// the result always lies in `[min_pitch, max_pitch]`. A degenerate range
/// (`data_max <= data_min`) maps every value to `min_pitch` rather than
/// dividing by zero.
pub fn pitch(val: f64, data_min: f64, data_max: f64, mapping: &PitchMapping) -> MidiPitch {
    if data_max <= data_min {
        return mapping.min_pitch;
    }
    let span = (mapping.max_pitch - mapping.min_pitch) as f64;
    let scaled = (val.clamp(data_min, data_max) - data_min) / (data_max - data_min) * span;
    mapping.min_pitch + scaled.round() as MidiPitch
}

/// Maps a whole sequence onto the target pitch range.
///
/// The data range is computed from the sequence itself, never user-supplied,
/// so for values `a <= b` the mapped pitches satisfy `pitch(a) <= pitch(b)`
/// and every result lies in `[min_pitch, max_pitch]`.
pub fn map_pitches(seq: &NumericSequence, mapping: &PitchMapping) -> Vec<MidiPitch> {
    let (data_min, data_max) = seq.range();
    tracing::debug!(data_min, data_max, "mapping sequence onto pitch range");

    seq.values()
        .iter()
        .map(|&v| pitch(v, data_min, data_max, mapping))
        .collect()
}

/// Silences every mapped pitch strictly below the cutoff.
///
/// The filter compares mapped pitches, not raw values, so the same cutoff is
/// comparable across different mappings. Without a cutoff this is a
/// pass-through. Filtering here is final: later pipeline stages may adjust
/// amplitude but never revive a silenced event.
pub fn apply_bound(pitches: Vec<MidiPitch>, below_bound: Option<MidiPitch>) -> Vec<Option<MidiPitch>> {
    match below_bound {
        None => pitches.into_iter().map(Some).collect(),
        Some(bound) => pitches
            .into_iter()
            .map(|p| if p < bound { None } else { Some(p) })
            .collect(),
    }
}

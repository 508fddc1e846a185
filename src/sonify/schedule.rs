use super::types::{MidiPitch, NoteEvent, RestPolicy, Step, Track, Velocity};

/// Assembles a track from filtered pitches, inserting rests and assigning
/// uniform step timing.
///
/// Each source event occupies `note_duration` steps. With a rest policy, one
/// rest of `rest_duration` steps follows every `interval`-th source position,
/// including the boundary after the final event when the length is an exact
/// multiple. Rests are purely additive: they never remove or alter note
/// events, only extend the timeline. `interval >= len` inserts nothing.
pub fn build_track(
    pitches: Vec<Option<MidiPitch>>,
    policy: Option<&RestPolicy>,
    note_duration: Step,
    velocity: Velocity,
) -> Track {
    let source_len = pitches.len();
    let mut events = Vec::with_capacity(source_len + source_len / rest_count_hint(policy));
    let mut clock: Step = 0;

    for (i, pitch) in pitches.into_iter().enumerate() {
        events.push(NoteEvent {
            pitch,
            start: clock,
            duration: note_duration,
            velocity,
        });
        clock += note_duration;

        if let Some(policy) = policy {
            let interval = policy.interval.get();
            if interval < source_len && (i + 1) % interval == 0 {
                events.push(NoteEvent {
                    pitch: None,
                    start: clock,
                    duration: policy.rest_duration,
                    velocity: 0,
                });
                clock += policy.rest_duration;
            }
        }
    }

    Track::new(events, source_len)
}

fn rest_count_hint(policy: Option<&RestPolicy>) -> usize {
    policy.map(|p| p.interval.get()).unwrap_or(usize::MAX)
}

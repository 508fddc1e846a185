// Sonification engine tests
//
// These tests focus on the core mapping, filtering, rest-scheduling and
// matrix-interaction behavior, observed through the public API: data goes
// in, SMF bytes come out, and the note stream is parsed back for
// inspection.
//
// The tests cover:
// - Min-max feature mapping (endpoints, monotonicity, range containment)
// - The degenerate constant-sequence case
// - Below-bound filtering
// - Periodic rest insertion and its edge cases
// - Cross-track velocity interaction and alignment validation
// - Fail-fast configuration errors

use sonify_midi::sonify::{self, PitchMapping, SonifyError, SonifyOptions};

use test_utils::{floats_to_bytes, matrix_to_bytes, played_notes, single_track_notes, TICKS_PER_STEP};

const SAMPLE_DATA: [f64; 9] = [
    12.5, 12.92, 32.08, 73.4, 25.89, 36.81, 295.22, 16.37, 225.95,
];

/// Test min-max feature mapping on a known sequence.
///
/// This test verifies:
/// - The data minimum maps to min_pitch and the maximum to max_pitch
/// - The relative order of all mapped pitches matches the source order
/// - Every mapped pitch lies inside [min_pitch, max_pitch]
#[test]
fn test_feature_mapping_endpoints_and_order() {
    let opts = SonifyOptions::new(100, 30);
    let bytes = floats_to_bytes(&SAMPLE_DATA, &opts).expect("sonification should succeed");
    let notes = single_track_notes(&bytes);

    assert_eq!(notes.len(), SAMPLE_DATA.len());
    assert_eq!(notes[0].pitch, 30, "data_min must map to min_pitch");
    assert_eq!(notes[6].pitch, 100, "data_max must map to max_pitch");

    for i in 0..SAMPLE_DATA.len() {
        assert!((30..=100).contains(&notes[i].pitch));
        for j in 0..SAMPLE_DATA.len() {
            if SAMPLE_DATA[i] <= SAMPLE_DATA[j] {
                assert!(
                    notes[i].pitch <= notes[j].pitch,
                    "mapping must preserve value order: {} vs {}",
                    SAMPLE_DATA[i],
                    SAMPLE_DATA[j]
                );
            }
        }
    }
}

/// Test the degenerate constant-sequence case.
///
/// This test verifies:
/// - A constant sequence maps every value to min_pitch
/// - No division-by-zero error occurs
#[test]
fn test_constant_sequence_maps_to_min_pitch() {
    let opts = SonifyOptions::new(90, 40);
    let bytes = floats_to_bytes(&[5.0, 5.0, 5.0], &opts).expect("constant data is not an error");
    let notes = single_track_notes(&bytes);

    assert_eq!(notes.len(), 3);
    assert!(notes.iter().all(|n| n.pitch == 40));
}

/// Test the below-bound filter.
///
/// This test verifies:
/// - Every note with mapped pitch below the bound is silenced
/// - Every note at or above the bound passes unchanged
/// - Silenced notes still occupy their timeline slot (the gap is audible)
#[test]
fn test_below_bound_silences_low_pitches() {
    let mut opts = SonifyOptions::new(100, 30);
    opts.below_bound = Some(60);
    let bytes = floats_to_bytes(&SAMPLE_DATA, &opts).expect("sonification should succeed");
    let notes = single_track_notes(&bytes);

    // Compute the expected survivors with the public single-value mapper
    let mapping = PitchMapping::new(30, 100, Some(60)).unwrap();
    let expected: Vec<(u8, u32)> = SAMPLE_DATA
        .iter()
        .enumerate()
        .map(|(i, &v)| (sonify::pitch(v, 12.5, 295.22, &mapping), i as u32))
        .filter(|(p, _)| *p >= 60)
        .collect();

    assert_eq!(notes.len(), expected.len());
    for (note, (pitch, index)) in notes.iter().zip(&expected) {
        assert_eq!(note.pitch, *pitch);
        assert!(note.pitch >= 60);
        // the note keeps the timeline slot of its source index
        assert_eq!(note.tick, index * TICKS_PER_STEP);
    }
}

/// Test periodic rest insertion.
///
/// This test verifies:
/// - A rest follows every interval-th source event, exactly once
/// - Rests are additive: no note is removed and later notes shift in time
#[test]
fn test_rest_insertion_shifts_timeline() {
    let mut opts = SonifyOptions::new(100, 30);
    opts.rest_interval = Some(3);
    let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    let bytes = floats_to_bytes(&data, &opts).expect("sonification should succeed");
    let notes = single_track_notes(&bytes);

    // 7 notes survive; rests (2 steps each) follow source positions 3 and 6
    assert_eq!(notes.len(), 7);
    let expected_steps = [0u32, 1, 2, 5, 6, 7, 10];
    for (note, step) in notes.iter().zip(expected_steps) {
        assert_eq!(note.tick, step * TICKS_PER_STEP);
    }
}

/// Test the rest-interval edge case.
///
/// This test verifies:
/// - An interval equal to or larger than the sequence length inserts nothing
#[test]
fn test_rest_interval_at_least_length_inserts_nothing() {
    let mut opts = SonifyOptions::new(100, 30);
    opts.rest_interval = Some(5);
    let bytes =
        floats_to_bytes(&[1.0, 2.0, 3.0, 4.0, 5.0], &opts).expect("sonification should succeed");
    let notes = single_track_notes(&bytes);

    for (i, note) in notes.iter().enumerate() {
        assert_eq!(note.tick, i as u32 * TICKS_PER_STEP);
    }
}

/// Test co-occurrence emphasis across matrix tracks.
///
/// This test verifies:
/// - Notes sounding simultaneously in two tracks get a velocity boost
/// - Boosted velocities never exceed the MIDI ceiling of 127
#[test]
fn test_matrix_co_occurrence_boost() {
    let opts = SonifyOptions::new(100, 30);
    let rows = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]];
    let bytes = matrix_to_bytes(&rows, &opts).expect("matrix sonification should succeed");
    let tracks = played_notes(&bytes);

    assert_eq!(tracks.len(), 2);
    for track in &tracks {
        // every index has both tracks sounding, so every note is boosted
        assert!(track.iter().all(|n| n.velocity == 106));
        assert!(track.iter().all(|n| n.velocity <= 127));
    }
}

/// Test that interaction never revives filtered notes.
///
/// This test verifies:
/// - A below-bound-silenced event stays silent even when a sibling track
///   sounds a loud note at the same index
/// - Lone notes (no co-occurrence) keep the baseline velocity
#[test]
fn test_masking_is_never_reversed() {
    let mut opts = SonifyOptions::new(100, 30);
    opts.below_bound = Some(60);
    // each row maps over its own range: the low endpoint of each row falls
    // below the bound, at opposite indices
    let rows = vec![vec![0.0, 10.0], vec![10.0, 0.0]];
    let bytes = matrix_to_bytes(&rows, &opts).expect("matrix sonification should succeed");
    let tracks = played_notes(&bytes);

    for track in &tracks {
        assert_eq!(track.len(), 1, "one note per track must stay silenced");
        // no index has two sounding notes, so no boost applies
        assert_eq!(track[0].velocity, 90);
        assert_eq!(track[0].pitch, 100);
    }
}

/// Test matrix alignment validation.
///
/// This test verifies:
/// - Rows of unequal length are rejected with MismatchedTrackLength
/// - The error is raised before any output is produced
#[test]
fn test_mismatched_rows_are_rejected() {
    let opts = SonifyOptions::new(100, 30);
    let rows = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
    let err = matrix_to_bytes(&rows, &opts).unwrap_err();
    assert!(matches!(
        err,
        SonifyError::MismatchedTrackLength {
            expected: 3,
            actual: 2
        }
    ));
}

/// Test fail-fast configuration validation.
///
/// This test verifies:
/// - An inverted pitch range is InvalidRange
/// - A bound outside [min_pitch, max_pitch) is InvalidBound
/// - Empty input is EmptySequence
/// - Non-finite input is InvalidValue
/// - A tempo the 24-bit MIDI tempo field cannot carry is InvalidTempo
/// - A baseline velocity above 127 is InvalidVelocity
/// - No bytes are written on any configuration error
#[test]
fn test_configuration_errors_fail_fast() {
    let inverted = SonifyOptions::new(30, 100);
    let mut buf = Vec::new();
    {
        let mut sink = sonify_midi::sonify::SmfSink::new(&mut buf);
        let err = sonify::sonify_floats(&[1.0, 2.0], &inverted, &mut sink).unwrap_err();
        assert!(matches!(err, SonifyError::InvalidRange { min: 100, max: 30 }));
    }
    assert!(buf.is_empty(), "no partial output on configuration errors");

    let mut bad_bound = SonifyOptions::new(100, 30);
    bad_bound.below_bound = Some(100);
    let err = floats_to_bytes(&[1.0, 2.0], &bad_bound).unwrap_err();
    assert!(matches!(err, SonifyError::InvalidBound { bound: 100, .. }));

    let opts = SonifyOptions::new(100, 30);
    let err = floats_to_bytes(&[], &opts).unwrap_err();
    assert!(matches!(err, SonifyError::EmptySequence));

    let err = floats_to_bytes(&[1.0, f64::NAN], &opts).unwrap_err();
    assert!(matches!(err, SonifyError::InvalidValue(_)));

    let mut slow = SonifyOptions::new(100, 30);
    slow.tempo_bpm = 2;
    let err = floats_to_bytes(&[1.0, 2.0], &slow).unwrap_err();
    assert!(matches!(err, SonifyError::InvalidTempo(2)));

    let mut loud = SonifyOptions::new(100, 30);
    loud.velocity = 200;
    let err = floats_to_bytes(&[1.0, 2.0], &loud).unwrap_err();
    assert!(matches!(err, SonifyError::InvalidVelocity(200)));
}

/// Test matrix row compression.
///
/// This test verifies:
/// - Every group of N consecutive rows is averaged elementwise
/// - A trailing partial group is averaged over its own size
/// - Ragged rows are rejected instead of being averaged into an
///   aligned-looking matrix
#[test]
fn test_compress_rows_averages_groups() {
    let rows = vec![
        vec![0.0, 4.0],
        vec![2.0, 6.0],
        vec![4.0, 8.0],
        vec![6.0, 10.0],
        vec![10.0, 20.0],
    ];
    let compressed = sonify::compress_rows(&rows, 2).expect("aligned rows must compress");
    assert_eq!(
        compressed,
        vec![vec![1.0, 5.0], vec![5.0, 9.0], vec![10.0, 20.0]]
    );

    let ragged = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
    let err = sonify::compress_rows(&ragged, 2).unwrap_err();
    assert!(matches!(
        err,
        SonifyError::MismatchedTrackLength {
            expected: 3,
            actual: 2
        }
    ));
}

use super::types::{InteractionRule, SonifyError, Track, VelocityCeiling, MIDI_MAX};

/// An ordered collection of aligned tracks sharing one timeline, plus the
/// interaction rule applied when they sound together.
#[derive(Debug)]
pub struct Matrix {
    tracks: Vec<Track>,
    rule: InteractionRule,
}

impl Matrix {
    /// Validates alignment and builds a matrix.
    ///
    /// Cross-track interaction is defined by event index, so all tracks must
    /// come from equally long source sequences. Unequal lengths are rejected
    /// here rather than silently truncated.
    pub fn new(tracks: Vec<Track>, rule: InteractionRule) -> Result<Self, SonifyError> {
        let expected = tracks
            .first()
            .ok_or(SonifyError::EmptySequence)?
            .source_len();
        for track in &tracks {
            if track.source_len() != expected {
                return Err(SonifyError::MismatchedTrackLength {
                    expected,
                    actual: track.source_len(),
                });
            }
        }
        Ok(Matrix { tracks, rule })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Applies the interaction rule at every shared event index.
    ///
    /// Where two or more tracks sound a non-silent note at the same index,
    /// each such note's velocity is raised by the configured boost and held
    /// under the MIDI ceiling, making the temporal coincidence audible.
    /// Silent events (below-bound-filtered notes and rests) are never
    /// revived; interaction only ever adjusts amplitude.
    pub fn apply_interaction(&mut self) {
        let event_len = self
            .tracks
            .iter()
            .map(|t| t.events().len())
            .min()
            .unwrap_or(0);
        let mut boosted = 0usize;

        for i in 0..event_len {
            let sounding = self
                .tracks
                .iter()
                .filter(|t| !t.events()[i].is_silent())
                .count();
            if sounding < 2 {
                continue;
            }
            for track in &mut self.tracks {
                let event = &mut track.events_mut()[i];
                if !event.is_silent() {
                    event.velocity = raise(event.velocity, self.rule.boost, self.rule.ceiling);
                    boosted += 1;
                }
            }
        }

        tracing::debug!(boosted, "applied co-occurrence emphasis");
    }

    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }
}

fn raise(velocity: u8, boost: u8, ceiling: VelocityCeiling) -> u8 {
    match ceiling {
        VelocityCeiling::Clamp => velocity.saturating_add(boost).min(MIDI_MAX),
    }
}

/// Averages every `group` consecutive rows into one, elementwise, so a
/// matrix with more rows than is convenient to listen to (usually more than
/// five) collapses to fewer tracks. A trailing partial group is averaged
/// over its own size.
///
/// Rows of unequal width are rejected with `MismatchedTrackLength` rather
/// than averaged into an aligned-looking matrix.
pub fn compress_rows(rows: &[Vec<f64>], group: usize) -> Result<Vec<Vec<f64>>, SonifyError> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let width = first.len();
    for row in rows {
        if row.len() != width {
            return Err(SonifyError::MismatchedTrackLength {
                expected: width,
                actual: row.len(),
            });
        }
    }
    if group <= 1 {
        return Ok(rows.to_vec());
    }

    let compressed = rows
        .chunks(group)
        .map(|chunk| {
            let mut mean = vec![0.0; width];
            for row in chunk {
                for (acc, &v) in mean.iter_mut().zip(row) {
                    *acc += v;
                }
            }
            for acc in &mut mean {
                *acc /= chunk.len() as f64;
            }
            mean
        })
        .collect();
    Ok(compressed)
}

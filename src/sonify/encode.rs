use std::io::{self, Write};

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

use super::types::Track;

/// Ticks per quarter note in MIDI output; one timeline step is one quarter.
const TICKS_PER_QUARTER: u16 = 480;
const TICKS_PER_STEP: u32 = TICKS_PER_QUARTER as u32;

/// One-shot sink for an ordered set of sonified tracks.
///
/// A sink is written exactly once per sonification call, in event order. Any
/// error aborts the write; callers must treat a failed write as "output not
/// produced".
pub trait EventSink {
    fn write_tracks(&mut self, tempo_bpm: u32, tracks: &[Track]) -> Result<(), io::Error>;
}

/// Standard MIDI File sink backed by any `io::Write`.
///
/// Produces SMF Format 1 (parallel tracks) with metrical timing: track 0
/// carries the tempo, then one MIDI track per sonified track. Silent events
/// advance the delta clock without emitting any message.
pub struct SmfSink<W: Write> {
    writer: W,
}

impl<W: Write> SmfSink<W> {
    pub fn new(writer: W) -> Self {
        SmfSink { writer }
    }
}

impl<W: Write> EventSink for SmfSink<W> {
    fn write_tracks(&mut self, tempo_bpm: u32, tracks: &[Track]) -> Result<(), io::Error> {
        let smf = tracks_to_smf(tempo_bpm, tracks);
        smf.write_std(&mut self.writer)?;
        self.writer.flush()
    }
}

fn tracks_to_smf(tempo_bpm: u32, tracks: &[Track]) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let tempo_microseconds = 60_000_000 / tempo_bpm.max(1);
    let mut tempo_track: midly::Track<'static> = Vec::new();
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    tempo_track.push(end_of_track());
    smf.tracks.push(tempo_track);

    // One MIDI track per sonified track; channel per track, wrapping at 16
    for (i, track) in tracks.iter().enumerate() {
        smf.tracks.push(encode_track(track, (i % 16) as u8));
    }

    smf
}

fn encode_track(track: &Track, channel: u8) -> midly::Track<'static> {
    let channel = u4::new(channel);
    let mut out: midly::Track<'static> = Vec::new();
    let mut last_tick: u32 = 0;

    for event in track.events() {
        let Some(pitch) = event.pitch else {
            // silent events only widen the next delta
            continue;
        };
        let on_tick = event.start * TICKS_PER_STEP;
        let off_tick = (event.start + event.duration) * TICKS_PER_STEP;

        out.push(TrackEvent {
            delta: u28::new(on_tick - last_tick),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key: u7::new(pitch),
                    vel: u7::new(event.velocity),
                },
            },
        });
        out.push(TrackEvent {
            delta: u28::new(off_tick - on_tick),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: u7::new(pitch),
                    vel: u7::new(0),
                },
            },
        });
        last_tick = off_tick;
    }

    out.push(end_of_track());
    out
}

fn end_of_track() -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    }
}

//! Sonification of numeric data and text into MIDI files.
//!
//! The crate maps ordered numeric sequences onto MIDI pitch ranges using
//! min-max feature mapping, so that rising and falling trends in the data
//! become rising and falling melodic lines. Multi-row matrices become
//! multi-track MIDI files whose tracks interact through velocity emphasis,
//! and text becomes a token-frequency sequence fed through the same pipeline.
//!
//! The main entry points are [`sonify::sonify_floats`],
//! [`sonify::sonify_matrix`] and [`sonify::sonify_text`].

pub mod config;
pub mod sonify;
pub mod text;

use serde::Deserialize;
use std::fs::File;
use std::io::Read;

/// Runtime defaults for sonification output, loaded from sonify.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub midi: MidiConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
}

/// MIDI output defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    /// Playback tempo in beats per minute
    pub tempo_bpm: u32,
    /// Baseline note velocity before any interaction boost
    pub velocity: u8,
    /// Note length in timeline steps
    pub note_duration: u32,
    /// Rest length in timeline steps (a rest twice as long as a note reads
    /// clearly as a divider)
    pub rest_duration: u32,
}

/// Matrix interaction defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Additive velocity boost for co-occurring notes across tracks
    pub boost: u8,
}

impl Default for MidiConfig {
    fn default() -> Self {
        MidiConfig {
            tempo_bpm: 120,
            velocity: 90,
            note_duration: 1,
            rest_duration: 2,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig { boost: 16 }
    }
}

/// Load configuration from sonify.toml
pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Try to load from sonify.toml
    match File::open("sonify.toml") {
        Ok(mut file) => {
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            Ok(toml::from_str(&contents)?)
        }
        Err(_) => {
            // If file doesn't exist, return default config
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_missing_sections() {
        let config: Config = toml::from_str("[midi]\ntempo_bpm = 90\n").unwrap();
        assert_eq!(config.midi.tempo_bpm, 90);
        assert_eq!(config.midi.velocity, 90);
        assert_eq!(config.interaction.boost, 16);
    }
}

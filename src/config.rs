//! Game settings.
//!
//! Settings come from an optional JSON file; every field falls back to its
//! default when missing.  The two speeds can also be changed while a game
//! is running through [`crate::game::Game::set_word_speed`] and
//! [`crate::game::Game::set_player_speed`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::Sound;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: f32 },
}

/// Per-cue playback volume in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volumes {
    pub shoot: f32,
    pub explosion: f32,
    pub life_lost: f32,
    pub missile: f32,
}

impl Default for Volumes {
    fn default() -> Self {
        Self {
            shoot: 0.2,
            explosion: 0.2,
            life_lost: 0.4,
            missile: 0.3,
        }
    }
}

impl Volumes {
    pub fn for_sound(&self, sound: Sound) -> f32 {
        match sound {
            Sound::Shoot => self.shoot,
            Sound::Explosion => self.explosion,
            Sound::LifeLost => self.life_lost,
            Sound::MissileLaunch => self.missile,
        }
    }
}

/// Parameters handed to the speech port with every utterance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Voice {
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            rate: 1.0,
            pitch: 1.0,
            volume: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base fall speed of the words, units per tick.
    pub word_speed: f32,
    /// Horizontal distance covered by one move key press.
    pub player_speed: f32,
    pub initial_lives: u32,
    pub tick_ms: u64,
    /// Delay between a round start and the pronunciation of its word, so the
    /// word is not drowned by the explosion that ended the previous round.
    pub speech_delay_ms: u64,
    pub volumes: Volumes,
    pub voice: Voice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            word_speed: 1.0,
            player_speed: 20.0,
            initial_lives: 1,
            tick_ms: 16,
            speech_delay_ms: 1000,
            volumes: Volumes::default(),
            voice: Voice::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        check_speed("word_speed", self.word_speed)?;
        check_speed("player_speed", self.player_speed)?;
        if self.initial_lives == 0 {
            return Err(ConfigError::InvalidValue {
                name: "initial_lives",
                value: 0.0,
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                name: "tick_ms",
                value: 0.0,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn speech_delay(&self) -> Duration {
        Duration::from_millis(self.speech_delay_ms)
    }
}

/// Speeds must be finite and strictly positive.
pub fn check_speed(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { name, value })
    }
}

//! Word Shooter — an arcade vocabulary trainer.
//!
//! A source word is shown at the top of the field while three translations
//! fall towards the ship.  Shooting the right one starts the next round,
//! a wrong one speeds the rest up, and a word reaching the bottom costs a
//! life.  The core is device-free: drawing, sound and speech go through the
//! traits in [`ports`], and time is passed in explicitly.

pub mod compute;
pub mod config;
pub mod entities;
pub mod game;
pub mod input;
pub mod ports;
pub mod render;
pub mod round;
pub mod scheduler;
pub mod words;

pub use config::{ConfigError, Settings};
pub use game::Game;
pub use words::{WordListError, WordPool};

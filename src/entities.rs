/// All game entity types — pure data, no logic.

use std::collections::HashSet;

// ── Playfield geometry ────────────────────────────────────────────────────────

/// Logical surface size shared by the core and every render adapter.
pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;

pub const PLAYER_WIDTH: f32 = 20.0;
pub const PLAYER_HEIGHT: f32 = 50.0;

pub const BULLET_WIDTH: f32 = 5.0;
pub const BULLET_HEIGHT: f32 = 10.0;
pub const MISSILE_WIDTH: f32 = 10.0;
pub const MISSILE_HEIGHT: f32 = 20.0;
/// Units per tick, upward.
pub const PROJECTILE_SPEED: f32 = 5.0;

/// Height of a falling label's hit box, measured up from its baseline.
pub const WORD_HEIGHT: f32 = 24.0;
pub const WORD_COLUMNS: usize = 3;
pub const WORD_COLUMN_INSET: f32 = 50.0;

pub const CONSECUTIVE_HITS_FOR_MISSILE: u32 = 5;

pub const PARTICLE_COUNT: usize = 20;
pub const PARTICLE_LIFE: u32 = 30;

pub const STAR_COUNT: usize = 60;
pub const STAR_MIN_SIZE: f32 = 1.0;
pub const STAR_MAX_SIZE: f32 = 3.0;
pub const STAR_TWINKLE_SPEED: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    Ended,
}

/// Why the last game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every word in the pool was presented.
    Won,
    /// The last life was lost.
    Lost,
    /// The player ended the game by hand.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

// ── Words ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordPair {
    pub source: String,
    pub translation: String,
}

impl WordPair {
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: translation.into(),
        }
    }
}

/// A translation option falling down one of the three columns.
#[derive(Clone, Debug, PartialEq)]
pub struct FallingWord {
    pub text: String,
    pub x: f32,
    /// Baseline of the label.
    pub y: f32,
    pub is_correct: bool,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Bullet,
    /// Clears every falling word on impact.
    Missile,
}

impl ProjectileKind {
    pub fn size(self) -> (f32, f32) {
        match self {
            ProjectileKind::Bullet => (BULLET_WIDTH, BULLET_HEIGHT),
            ProjectileKind::Missile => (MISSILE_WIDTH, MISSILE_HEIGHT),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub kind: ProjectileKind,
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining ticks.
    pub life: u32,
    pub color: Rgb,
}

impl Particle {
    /// Opacity in `[0, 1]`, fading out with the remaining lifetime.
    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFE as f32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub brightness: f32,
    /// Signed; flips whenever brightness leaves `[0, 1]`.
    pub twinkle_speed: f32,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
}

impl Player {
    pub fn spawn() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
            y: FIELD_HEIGHT - PLAYER_HEIGHT - 10.0,
        }
    }
}

// ── Side effects requested by the core ───────────────────────────────────────

/// The four fire-and-forget sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Shoot,
    Explosion,
    LifeLost,
    MissileLaunch,
}

/// Side effects queued during a state update, drained by the game driver.
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    Play(Sound),
    /// Pronounce the round's source word after the configured delay.
    Pronounce(String),
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything that changes while a game is played.  Cloneable so pure update
/// functions can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct Session {
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub words: Vec<FallingWord>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    /// Source term currently shown in the HUD; empty between games.
    pub current_word: String,
    /// Source terms already presented this game.
    pub used_words: HashSet<String>,
    pub lives: u32,
    pub consecutive_hits: u32,
    pub missiles: u32,
    /// Word fall speed for the running round; reset to `base_word_speed`
    /// at every round start.
    pub word_speed: f32,
    pub base_word_speed: f32,
    pub player_speed: f32,
    pub status: GameStatus,
    pub outcome: Option<Outcome>,
    pub frame: u64,
    /// Side effects requested since the last drain.
    pub cues: Vec<Cue>,
}

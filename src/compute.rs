/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `Session` (and, where needed, an RNG handle or text metrics) and returns a
/// brand-new `Session`.  Side effects are limited to the injected RNG; sounds
/// and speech are only requested through the session's `cues` queue.

use std::collections::HashSet;
use std::f32::consts::TAU;

use rand::Rng;

use crate::config::Settings;
use crate::entities::{
    Cue, FallingWord, GameStatus, Particle, Player, Projectile, ProjectileKind, Rgb, Session,
    Sound, Star, CONSECUTIVE_HITS_FOR_MISSILE, FIELD_HEIGHT, FIELD_WIDTH, PARTICLE_COUNT,
    PARTICLE_LIFE, PLAYER_WIDTH, PROJECTILE_SPEED, STAR_COUNT, STAR_MAX_SIZE, STAR_MIN_SIZE,
    STAR_TWINKLE_SPEED, WORD_HEIGHT,
};
use crate::ports::TextMetrics;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the idle state shown before the first game.
pub fn init_state(settings: &Settings, rng: &mut impl Rng) -> Session {
    Session {
        player: Player::spawn(),
        projectiles: Vec::new(),
        words: Vec::new(),
        particles: Vec::new(),
        stars: init_stars(rng),
        current_word: String::new(),
        used_words: HashSet::new(),
        lives: settings.initial_lives,
        consecutive_hits: 0,
        missiles: 0,
        word_speed: settings.word_speed,
        base_word_speed: settings.word_speed,
        player_speed: settings.player_speed,
        status: GameStatus::NotStarted,
        outcome: None,
        frame: 0,
        cues: Vec::new(),
    }
}

pub fn init_stars(rng: &mut impl Rng) -> Vec<Star> {
    (0..STAR_COUNT)
        .map(|_| Star {
            x: rng.gen_range(0.0..FIELD_WIDTH),
            y: rng.gen_range(0.0..FIELD_HEIGHT),
            size: rng.gen_range(STAR_MIN_SIZE..STAR_MAX_SIZE),
            brightness: rng.gen::<f32>(),
            twinkle_speed: STAR_TWINKLE_SPEED * (0.5 + rng.gen::<f32>()),
        })
        .collect()
}

/// Fresh counters and empty stores for a new game.  Stars, speeds and the
/// pending cue queue carry over.
pub fn reset_for_game(state: &Session, initial_lives: u32) -> Session {
    Session {
        player: Player::spawn(),
        projectiles: Vec::new(),
        words: Vec::new(),
        particles: Vec::new(),
        current_word: String::new(),
        used_words: HashSet::new(),
        lives: initial_lives,
        consecutive_hits: 0,
        missiles: 0,
        word_speed: state.base_word_speed,
        outcome: None,
        frame: 0,
        ..state.clone()
    }
}

/// Drop everything that only lives during a game.
pub fn clear_field(state: &Session) -> Session {
    Session {
        projectiles: Vec::new(),
        words: Vec::new(),
        particles: Vec::new(),
        current_word: String::new(),
        ..state.clone()
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &Session) -> Session {
    let x = (state.player.x - state.player_speed).max(0.0);
    Session {
        player: Player {
            x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

pub fn move_player_right(state: &Session) -> Session {
    let x = (state.player.x + state.player_speed).min(FIELD_WIDTH - PLAYER_WIDTH);
    Session {
        player: Player {
            x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

fn launch(state: &Session, kind: ProjectileKind) -> Projectile {
    let (width, _) = kind.size();
    Projectile {
        x: state.player.x + PLAYER_WIDTH / 2.0 - width / 2.0,
        y: state.player.y,
        kind,
    }
}

/// Fire a bullet from the ship's nose.  There is no cap on bullets in flight.
pub fn player_shoot(state: &Session) -> Session {
    let mut projectiles = state.projectiles.clone();
    projectiles.push(launch(state, ProjectileKind::Bullet));
    let mut cues = state.cues.clone();
    cues.push(Cue::Play(Sound::Shoot));
    Session {
        projectiles,
        cues,
        ..state.clone()
    }
}

/// Fire a missile if one is in stock; otherwise nothing changes.
pub fn fire_missile(state: &Session) -> Session {
    if state.missiles == 0 {
        return state.clone();
    }
    let mut projectiles = state.projectiles.clone();
    projectiles.push(launch(state, ProjectileKind::Missile));
    let mut cues = state.cues.clone();
    cues.push(Cue::Play(Sound::MissileLaunch));
    Session {
        projectiles,
        missiles: state.missiles - 1,
        cues,
        ..state.clone()
    }
}

// ── Effects ──────────────────────────────────────────────────────────────────

/// A ring of particles in yellow-to-orange hues.
pub fn explosion(x: f32, y: f32, rng: &mut impl Rng) -> Vec<Particle> {
    (0..PARTICLE_COUNT)
        .map(|i| {
            let angle = TAU / PARTICLE_COUNT as f32 * i as f32;
            let speed = rng.gen_range(2.0..4.0);
            Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life: PARTICLE_LIFE,
                color: hsl_to_rgb(rng.gen_range(30.0..90.0), 1.0, 0.5),
            }
        })
        .collect()
}

/// HSL with hue in degrees, saturation and lightness in `[0, 1]`.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(channel(r), channel(g), channel(b))
}

pub fn advance_particles(particles: &[Particle]) -> Vec<Particle> {
    particles
        .iter()
        .filter_map(|p| {
            let life = p.life.saturating_sub(1);
            if life == 0 {
                None
            } else {
                Some(Particle {
                    x: p.x + p.vx,
                    y: p.y + p.vy,
                    life,
                    ..p.clone()
                })
            }
        })
        .collect()
}

/// Triangle-wave twinkle: brightness drifts by the star's speed and the speed
/// changes sign once brightness has left `[0, 1]`.
pub fn twinkle_stars(stars: &[Star]) -> Vec<Star> {
    stars
        .iter()
        .map(|s| {
            let brightness = s.brightness + s.twinkle_speed;
            let twinkle_speed = if !(0.0..=1.0).contains(&brightness) {
                -s.twinkle_speed
            } else {
                s.twinkle_speed
            };
            Star {
                brightness,
                twinkle_speed,
                ..s.clone()
            }
        })
        .collect()
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Axis-aligned overlap between a projectile and a label drawn on its
/// baseline at `word.y`.
pub fn hits(projectile: &Projectile, word: &FallingWord, metrics: &impl TextMetrics) -> bool {
    let (width, height) = projectile.kind.size();
    let word_width = metrics.text_width(&word.text);
    projectile.x < word.x + word_width
        && projectile.x + width > word.x
        && projectile.y < word.y
        && projectile.y + height > word.y - WORD_HEIGHT
}

/// How the current round ended during a tick, if it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEnd {
    /// A missile cleared the field.
    Cleared,
    /// The correct translation was shot.
    Answered,
    /// A word reached the bottom and a life remains.
    Missed,
    /// A word reached the bottom and took the last life.
    OutOfLives,
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.
///
/// Words are handled in list order.  The first event that ends the round
/// (missile hit, correct hit, landing) settles the tick and the remaining
/// words of that round go with it, so a tick produces at most one round
/// transition.  The caller starts the next round, or ends the game on
/// [`RoundEnd::OutOfLives`].
pub fn tick(
    state: &Session,
    metrics: &impl TextMetrics,
    rng: &mut impl Rng,
) -> (Session, Option<RoundEnd>) {
    let frame = state.frame + 1;

    // ── 1. Move projectiles ──────────────────────────────────────────────────
    let mut projectiles: Vec<Projectile> = state
        .projectiles
        .iter()
        .map(|p| Projectile {
            y: p.y - PROJECTILE_SPEED,
            ..p.clone()
        })
        .filter(|p| p.y >= 0.0)
        .collect();

    // ── 2. Particles ─────────────────────────────────────────────────────────
    let mut particles = advance_particles(&state.particles);

    // ── 3. Words fall, collide, land ─────────────────────────────────────────
    let mut cues = state.cues.clone();
    let mut word_speed = state.word_speed;
    let mut consecutive_hits = state.consecutive_hits;
    let mut missiles = state.missiles;
    let mut lives = state.lives;
    let mut words: Vec<FallingWord> = Vec::with_capacity(state.words.len());
    let mut round_end = None;

    let falling: Vec<FallingWord> = state
        .words
        .iter()
        .map(|w| FallingWord {
            y: w.y + state.word_speed,
            ..w.clone()
        })
        .collect();

    for (wi, word) in falling.iter().enumerate() {
        let missile_hit = projectiles
            .iter()
            .position(|p| p.kind == ProjectileKind::Missile && hits(p, word, metrics));
        let hit = missile_hit.or_else(|| projectiles.iter().position(|p| hits(p, word, metrics)));
        if let Some(pi) = hit {
            let projectile = projectiles.remove(pi);
            match projectile.kind {
                ProjectileKind::Missile => {
                    let survivors = words.iter().chain(falling[wi + 1..].iter());
                    particles.extend(explosion(word.x, word.y, rng));
                    cues.push(Cue::Play(Sound::Explosion));
                    for other in survivors {
                        particles.extend(explosion(other.x, other.y, rng));
                        cues.push(Cue::Play(Sound::Explosion));
                    }
                    round_end = Some(RoundEnd::Cleared);
                }
                ProjectileKind::Bullet if word.is_correct => {
                    particles.extend(explosion(word.x, word.y, rng));
                    cues.push(Cue::Play(Sound::Explosion));
                    consecutive_hits += 1;
                    if consecutive_hits >= CONSECUTIVE_HITS_FOR_MISSILE {
                        missiles += 1;
                        consecutive_hits = 0;
                    }
                    round_end = Some(RoundEnd::Answered);
                }
                ProjectileKind::Bullet => {
                    consecutive_hits = 0;
                    word_speed *= 2.0;
                    continue;
                }
            }
            break;
        }

        if word.y > FIELD_HEIGHT {
            lives = lives.saturating_sub(1);
            cues.push(Cue::Play(Sound::LifeLost));
            round_end = Some(if lives == 0 {
                RoundEnd::OutOfLives
            } else {
                RoundEnd::Missed
            });
            break;
        }

        words.push(word.clone());
    }

    if round_end.is_some() {
        words.clear();
    }
    if round_end == Some(RoundEnd::OutOfLives) {
        projectiles.clear();
    }

    let next = Session {
        projectiles,
        words,
        particles,
        lives,
        consecutive_hits,
        missiles,
        word_speed,
        frame,
        cues,
        ..state.clone()
    };
    (next, round_end)
}

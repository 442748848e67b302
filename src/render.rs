/// Scene composition — turns a `Session` into draw calls on a `Renderer`.
///
/// No game logic is performed here; the same frame can be drawn by the
/// terminal frontend or by a recording adapter in tests.

use crate::entities::{
    FallingWord, GameStatus, Outcome, Projectile, ProjectileKind, Rgb, Session, Star,
    FIELD_HEIGHT, FIELD_WIDTH, PLAYER_HEIGHT, PLAYER_WIDTH,
};
use crate::ports::{Align, Paint, Point, Renderer};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TEXT: Rgb = Rgb(255, 255, 255);
const C_LIVES: Rgb = Rgb(255, 0, 0);
const C_STREAK: Rgb = Rgb(255, 255, 0);
const C_HINT: Rgb = Rgb(160, 160, 160);
const C_BODY: Rgb = Rgb(255, 255, 255);
const C_WING: Rgb = Rgb(0x60, 0xA5, 0xFA);
const C_TAIL: Rgb = Rgb(0xF9, 0x73, 0x16);
const C_BULLET: Rgb = Rgb(255, 255, 0);
const C_MISSILE: Rgb = Rgb(255, 0, 0);
const C_STAR: Rgb = Rgb(255, 255, 255);

const WORD_FONT: f32 = 28.0;
const HUD_FONT: f32 = 24.0;
const SOURCE_FONT: f32 = 32.0;
const PARTICLE_RADIUS: f32 = 2.0;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn draw_frame<R: Renderer + ?Sized>(out: &mut R, state: &Session) -> std::io::Result<()> {
    out.clear();
    draw_stars(out, &state.stars);

    match state.status {
        GameStatus::NotStarted => draw_title(out),
        GameStatus::Running => {
            draw_hud(out, state);
            draw_player(out, state);
            for projectile in &state.projectiles {
                draw_projectile(out, projectile);
            }
            for particle in &state.particles {
                out.fill_circle(
                    Point::new(particle.x, particle.y),
                    PARTICLE_RADIUS,
                    Paint::faded(particle.color, particle.alpha()),
                );
            }
            for word in &state.words {
                draw_word(out, word);
            }
        }
        GameStatus::Ended => draw_end_screen(out, state.outcome),
    }

    out.present()
}

// ── Background ────────────────────────────────────────────────────────────────

fn draw_stars<R: Renderer + ?Sized>(out: &mut R, stars: &[Star]) {
    for star in stars {
        out.fill_circle(
            Point::new(star.x, star.y),
            star.size,
            Paint::faded(C_STAR, star.brightness),
        );
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<R: Renderer + ?Sized>(out: &mut R, state: &Session) {
    out.text(
        Point::new(30.0, 50.0),
        &state.current_word,
        SOURCE_FONT,
        Align::Left,
        Paint::solid(C_TEXT),
    );
    out.text(
        Point::new(10.0, 80.0),
        &"♥".repeat(state.lives as usize),
        HUD_FONT,
        Align::Left,
        Paint::solid(C_LIVES),
    );
    out.text(
        Point::new(10.0, 110.0),
        &"▲".repeat(state.missiles as usize),
        HUD_FONT,
        Align::Left,
        Paint::solid(C_MISSILE),
    );
    if state.consecutive_hits > 0 {
        out.text(
            Point::new(10.0, 140.0),
            &"✦".repeat(state.consecutive_hits as usize),
            HUD_FONT,
            Align::Left,
            Paint::solid(C_STREAK),
        );
    }
    out.text(
        Point::new(FIELD_WIDTH - 200.0, 30.0),
        &format!("speed x{:.1}", state.word_speed),
        HUD_FONT * 0.75,
        Align::Left,
        Paint::solid(C_HINT),
    );
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<R: Renderer + ?Sized>(out: &mut R, state: &Session) {
    let x = state.player.x;
    let y = state.player.y;
    let w = PLAYER_WIDTH;
    let h = PLAYER_HEIGHT;

    out.fill_rect(x, y, w, h, Paint::solid(C_BODY));
    // Nose
    out.fill_triangle(
        [
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w / 2.0, y - 20.0),
        ],
        Paint::solid(C_BODY),
    );
    // Wings
    out.fill_triangle(
        [
            Point::new(x, y + 20.0),
            Point::new(x - 30.0, y + 30.0),
            Point::new(x, y + 10.0),
        ],
        Paint::solid(C_WING),
    );
    out.fill_triangle(
        [
            Point::new(x + w, y + 20.0),
            Point::new(x + w + 30.0, y + 30.0),
            Point::new(x + w, y + 10.0),
        ],
        Paint::solid(C_WING),
    );
    // Tail fins
    out.fill_triangle(
        [
            Point::new(x, y + h - 10.0),
            Point::new(x - 15.0, y + h),
            Point::new(x, y + h),
        ],
        Paint::solid(C_TAIL),
    );
    out.fill_triangle(
        [
            Point::new(x + w, y + h - 10.0),
            Point::new(x + w + 15.0, y + h),
            Point::new(x + w, y + h),
        ],
        Paint::solid(C_TAIL),
    );
}

fn draw_projectile<R: Renderer + ?Sized>(out: &mut R, projectile: &Projectile) {
    let (w, h) = projectile.kind.size();
    let color = match projectile.kind {
        ProjectileKind::Bullet => C_BULLET,
        ProjectileKind::Missile => C_MISSILE,
    };
    out.fill_rect(projectile.x, projectile.y, w, h, Paint::solid(color));
}

fn draw_word<R: Renderer + ?Sized>(out: &mut R, word: &FallingWord) {
    out.text(
        Point::new(word.x, word.y),
        &word.text,
        WORD_FONT,
        Align::Left,
        Paint::solid(C_TEXT),
    );
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn draw_title<R: Renderer + ?Sized>(out: &mut R) {
    let cx = FIELD_WIDTH / 2.0;
    let cy = FIELD_HEIGHT / 2.0;
    out.text(
        Point::new(cx, cy - 30.0),
        "WORD SHOOTER",
        30.0,
        Align::Center,
        Paint::solid(C_TEXT),
    );
    out.text(
        Point::new(cx, cy + 10.0),
        "Press Enter to start",
        20.0,
        Align::Center,
        Paint::solid(C_TEXT),
    );
    out.text(
        Point::new(cx, cy + 50.0),
        "← → move   A shoot   SPACE missile",
        16.0,
        Align::Center,
        Paint::solid(C_HINT),
    );
}

fn draw_end_screen<R: Renderer + ?Sized>(out: &mut R, outcome: Option<Outcome>) {
    let cx = FIELD_WIDTH / 2.0;
    let cy = FIELD_HEIGHT / 2.0;
    let title = match outcome {
        Some(Outcome::Won) => "ALL WORDS CLEARED!",
        Some(Outcome::Lost) => "GAME OVER",
        Some(Outcome::Stopped) | None => "GAME ENDED",
    };
    out.text(
        Point::new(cx, cy - 30.0),
        title,
        30.0,
        Align::Center,
        Paint::solid(C_TEXT),
    );
    out.text(
        Point::new(cx, cy + 10.0),
        "R - Play Again  Q - Back to Menu",
        20.0,
        Align::Center,
        Paint::solid(C_HINT),
    );
}

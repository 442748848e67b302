//! Seams between the core and the outside world.
//!
//! The core never touches a device directly: drawing goes through
//! [`Renderer`], sound through [`AudioPort`], pronunciation through
//! [`SpeechPort`].  The `Recording*` adapters keep every call so tests can
//! assert on the side effects of a state change.

use crate::config::Voice;
use crate::entities::{Rgb, Sound};

/// Width of a label in the active font, in logical units.
pub trait TextMetrics {
    fn text_width(&self, text: &str) -> f32;
}

/// Fixed-advance metrics: East Asian wide glyphs take `wide`, everything
/// else takes `narrow`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMetrics {
    pub narrow: f32,
    pub wide: f32,
}

impl Default for GlyphMetrics {
    /// Sized for the 28-unit label font.
    fn default() -> Self {
        Self {
            narrow: 15.0,
            wide: 28.0,
        }
    }
}

impl TextMetrics for GlyphMetrics {
    fn text_width(&self, text: &str) -> f32 {
        text.chars()
            .map(|c| if is_wide(c) { self.wide } else { self.narrow })
            .sum()
    }
}

/// True for characters that occupy two terminal cells / a full em.
pub fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1FAFF
        | 0x20000..=0x3FFFD)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Colour plus opacity in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    pub alpha: f32,
}

impl Paint {
    pub fn solid(color: Rgb) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub fn faded(color: Rgb, alpha: f32) -> Self {
        Self {
            color,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Drawing surface of `FIELD_WIDTH × FIELD_HEIGHT` logical units.
pub trait Renderer: TextMetrics {
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint);
    fn fill_triangle(&mut self, points: [Point; 3], paint: Paint);
    fn fill_circle(&mut self, center: Point, radius: f32, paint: Paint);
    /// Draw `text` with its baseline at `at.y`.
    fn text(&mut self, at: Point, text: &str, size: f32, align: Align, paint: Paint);
    /// Push the finished frame to the device.
    fn present(&mut self) -> std::io::Result<()>;
}

/// Fire-and-forget sound effects.  Playing a cue that is still sounding
/// restarts it from the beginning.
pub trait AudioPort {
    fn play(&mut self, sound: Sound, volume: f32);
}

pub trait SpeechPort {
    fn speak(&mut self, text: &str, voice: &Voice);
}

// ── Recording adapters ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<(Sound, f32)>,
}

impl RecordingAudio {
    pub fn sounds(&self) -> Vec<Sound> {
        self.played.iter().map(|(s, _)| *s).collect()
    }
}

impl AudioPort for RecordingAudio {
    fn play(&mut self, sound: Sound, volume: f32) {
        self.played.push((sound, volume));
    }
}

#[derive(Debug, Default)]
pub struct RecordingSpeech {
    pub spoken: Vec<(String, Voice)>,
}

impl SpeechPort for RecordingSpeech {
    fn speak(&mut self, text: &str, voice: &Voice) {
        self.spoken.push((text.to_string(), voice.clone()));
    }
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    Rect { x: f32, y: f32, w: f32, h: f32 },
    Triangle,
    Circle { center: Point, radius: f32, alpha: f32 },
    Text { at: Point, text: String },
    Present,
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub metrics: GlyphMetrics,
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    /// Every string drawn since the last clear.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TextMetrics for RecordingRenderer {
    fn text_width(&self, text: &str) -> f32 {
        self.metrics.text_width(text)
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, _paint: Paint) {
        self.calls.push(DrawCall::Rect { x, y, w, h });
    }

    fn fill_triangle(&mut self, _points: [Point; 3], _paint: Paint) {
        self.calls.push(DrawCall::Triangle);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: Paint) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            alpha: paint.alpha,
        });
    }

    fn text(&mut self, at: Point, text: &str, _size: f32, _align: Align, _paint: Paint) {
        self.calls.push(DrawCall::Text {
            at,
            text: text.to_string(),
        });
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.calls.push(DrawCall::Present);
        Ok(())
    }
}
